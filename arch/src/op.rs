use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::mode::ModeSet;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr, Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Mnemonic {
    Mov,
    Cmp,
    Add,
    Sub,
    Lea,
    Clr,
    Not,
    Inc,
    Dec,
    Jmp,
    Bne,
    Jsr,
    Red,
    Prn,
    Rts,
    Stop,
}

impl Mnemonic {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }

    pub fn syntax(self) -> &'static OpSyntax {
        &OPS[self as usize]
    }
}

/// Operand layout of an operation, derived from its mode masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    NoOperand,
    Dst,
    SrcDst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpSyntax {
    pub mnemonic: Mnemonic,
    pub opcode: u8,
    pub funct: u8,
    pub src: ModeSet,
    pub dst: ModeSet,
}

impl OpSyntax {
    pub fn shape(&self) -> Shape {
        match (self.src.is_empty(), self.dst.is_empty()) {
            (true, true) => Shape::NoOperand,
            (true, false) => Shape::Dst,
            _ => Shape::SrcDst,
        }
    }

    /// Reverse lookup used when decoding an instruction word.
    pub fn by_code(opcode: u8, funct: u8) -> Option<&'static OpSyntax> {
        OPS.iter().find(|s| s.opcode == opcode && s.funct == funct)
    }
}

const IMM: ModeSet = ModeSet::IMM;
const DIR: ModeSet = ModeSet::DIR;
const REL: ModeSet = ModeSet::REL;
const REG: ModeSet = ModeSet::REG;
const NONE: ModeSet = ModeSet::NONE;

macro_rules! op {
    ($mn:ident, $opcode:expr, $funct:expr, $src:expr, $dst:expr) => {
        OpSyntax {
            mnemonic: Mnemonic::$mn,
            opcode: $opcode,
            funct: $funct,
            src: $src,
            dst: $dst,
        }
    };
}

/// Indexed by `Mnemonic as usize`.
pub static OPS: [OpSyntax; 16] = [
    op!(Mov, 0, 0, IMM.union(DIR).union(REG), DIR.union(REG)),
    op!(Cmp, 1, 0, IMM.union(DIR).union(REG), IMM.union(DIR).union(REG)),
    op!(Add, 2, 1, IMM.union(DIR).union(REG), DIR.union(REG)),
    op!(Sub, 2, 2, IMM.union(DIR).union(REG), DIR.union(REG)),
    op!(Lea, 4, 0, DIR, DIR.union(REG)),
    op!(Clr, 5, 1, NONE, DIR.union(REG)),
    op!(Not, 5, 2, NONE, DIR.union(REG)),
    op!(Inc, 5, 3, NONE, DIR.union(REG)),
    op!(Dec, 5, 4, NONE, DIR.union(REG)),
    op!(Jmp, 9, 1, NONE, DIR.union(REL)),
    op!(Bne, 9, 2, NONE, DIR.union(REL)),
    op!(Jsr, 9, 3, NONE, DIR.union(REL)),
    op!(Red, 12, 0, NONE, DIR.union(REG)),
    op!(Prn, 13, 0, NONE, IMM.union(DIR).union(REG)),
    op!(Rts, 14, 0, NONE, NONE),
    op!(Stop, 15, 0, NONE, NONE),
];
