//! Instruction set of the 24-bit word machine: operations and their
//! operand rules, registers, addressing modes and the word layout.

pub mod directive;
pub mod mode;
pub mod op;
pub mod reg;
pub mod reserved;
pub mod word;

/// First code address; the data segment follows the code segment.
pub const BASE_ADDR: u32 = 100;

/// Longest label or macro name.
pub const MAX_LABEL_LEN: usize = 31;
