use color_print::cformat;
use thiserror::Error;

use crate::{
    mode::AddrMode,
    op::{OpSyntax, Shape},
    reg::Reg,
};

pub const WORD_BITS: u32 = 24;
pub const WORD_MASK: u32 = (1 << WORD_BITS) - 1;

// ----------------------------------------------------------------------------
// Field layout (opcode highest, flags lowest)

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub offset: u32,
    pub width: u32,
}

impl Field {
    const fn new(offset: u32, width: u32) -> Self {
        Field { offset, width }
    }

    pub const fn mask(self) -> u32 {
        ((1 << self.width) - 1) << self.offset
    }

    pub fn get(self, bits: u32) -> u32 {
        (bits & self.mask()) >> self.offset
    }

    pub fn set(self, bits: u32, value: u32) -> u32 {
        (bits & !self.mask()) | ((value << self.offset) & self.mask())
    }
}

pub const E: Field = Field::new(0, 1);
pub const R: Field = Field::new(1, 1);
pub const A: Field = Field::new(2, 1);
pub const FUNCT: Field = Field::new(3, 5);
pub const DST_REG: Field = Field::new(8, 3);
pub const DST_MODE: Field = Field::new(11, 2);
pub const SRC_REG: Field = Field::new(13, 3);
pub const SRC_MODE: Field = Field::new(16, 2);
pub const OPCODE: Field = Field::new(18, 6);
pub const VALUE: Field = Field::new(3, 21);

pub const VALUE_MIN: i32 = -(1 << (VALUE.width - 1));
pub const VALUE_MAX: i32 = (1 << (VALUE.width - 1)) - 1;
pub const DATA_MIN: i32 = -(1 << (WORD_BITS - 1));
pub const DATA_MAX: i32 = (1 << (WORD_BITS - 1)) - 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("No operation with opcode {0} and funct {1}")]
    UnknownCode(u8, u8),

    #[error("Expected exactly one of the A/R/E flags, found {0:03b}")]
    BadFlags(u8),
}

// ----------------------------------------------------------------------------
// A/R/E

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Are {
    Absolute,
    Relocatable,
    External,
}

impl Are {
    fn field(self) -> Field {
        match self {
            Are::Absolute => A,
            Are::Relocatable => R,
            Are::External => E,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Are::Absolute => 'A',
            Are::Relocatable => 'R',
            Are::External => 'E',
        }
    }
}

// ----------------------------------------------------------------------------
// Operand slot of an instruction

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub mode: AddrMode,
    pub reg: Reg,
}

impl Slot {
    /// Unused slot; encodes as all zero bits.
    pub const EMPTY: Slot = Slot {
        mode: AddrMode::Immediate,
        reg: Reg::R0,
    };

    pub fn mode(mode: AddrMode) -> Self {
        Slot { mode, reg: Reg::R0 }
    }

    pub fn reg(reg: Reg) -> Self {
        Slot {
            mode: AddrMode::Register,
            reg,
        }
    }
}

// ----------------------------------------------------------------------------
// Instruction word fields

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inst {
    pub syntax: &'static OpSyntax,
    pub src: Slot,
    pub dst: Slot,
    pub are: Are,
}

impl Inst {
    pub fn new(syntax: &'static OpSyntax, src: Slot, dst: Slot) -> Self {
        Inst {
            syntax,
            src,
            dst,
            are: Are::Absolute,
        }
    }

    pub fn cformat(&self) -> String {
        let slot = |s: &Slot| match s.mode {
            AddrMode::Register => cformat!("<b>{}</>", s.reg),
            AddrMode::Immediate => cformat!("<y>#</>"),
            AddrMode::Direct => cformat!("<g>@</>"),
            AddrMode::Relative => cformat!("<g>&</>"),
        };
        let name: &'static str = self.syntax.mnemonic.into();
        match self.syntax.shape() {
            Shape::NoOperand => cformat!("<r>{:<5}</>", name),
            Shape::Dst => cformat!("<r>{:<5}</>{}", name, slot(&self.dst)),
            Shape::SrcDst => cformat!(
                "<r>{:<5}</>{}, {}",
                name,
                slot(&self.src),
                slot(&self.dst)
            ),
        }
    }
}

// ----------------------------------------------------------------------------
// Word

/// One 24-bit memory cell. The bits carry no tag; the caller knows from
/// the instruction boundaries which shape a word has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Word(u32);

impl Word {
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn from_bits(bits: u32) -> Self {
        Word(bits & WORD_MASK)
    }

    pub fn inst(inst: &Inst) -> Self {
        let mut bits = 0;
        bits = OPCODE.set(bits, inst.syntax.opcode as u32);
        bits = FUNCT.set(bits, inst.syntax.funct as u32);
        bits = SRC_MODE.set(bits, u8::from(inst.src.mode) as u32);
        bits = SRC_REG.set(bits, u8::from(inst.src.reg) as u32);
        bits = DST_MODE.set(bits, u8::from(inst.dst.mode) as u32);
        bits = DST_REG.set(bits, u8::from(inst.dst.reg) as u32);
        bits = inst.are.field().set(bits, 1);
        Word(bits)
    }

    /// Operand word. `value` is truncated to 21 bits.
    pub fn operand(value: i32, are: Are) -> Self {
        let bits = VALUE.set(0, value as u32);
        Word(are.field().set(bits, 1))
    }

    /// Raw `.data` word, truncated to 24 bits.
    pub fn data(value: i32) -> Self {
        Word::from_bits(value as u32)
    }

    pub fn char(c: u8) -> Self {
        Word(c as u32)
    }

    pub fn to_inst(self) -> Result<Inst, DecodeError> {
        let opcode = OPCODE.get(self.0) as u8;
        let funct = FUNCT.get(self.0) as u8;
        let syntax =
            OpSyntax::by_code(opcode, funct).ok_or(DecodeError::UnknownCode(opcode, funct))?;
        Ok(Inst {
            syntax,
            src: Slot {
                mode: decode_mode(SRC_MODE.get(self.0)),
                reg: decode_reg(SRC_REG.get(self.0)),
            },
            dst: Slot {
                mode: decode_mode(DST_MODE.get(self.0)),
                reg: decode_reg(DST_REG.get(self.0)),
            },
            are: self.are()?,
        })
    }

    pub fn are(self) -> Result<Are, DecodeError> {
        match (A.get(self.0), R.get(self.0), E.get(self.0)) {
            (1, 0, 0) => Ok(Are::Absolute),
            (0, 1, 0) => Ok(Are::Relocatable),
            (0, 0, 1) => Ok(Are::External),
            _ => Err(DecodeError::BadFlags((self.0 & 0b111) as u8)),
        }
    }

    /// Sign-extended 21-bit operand value.
    pub fn operand_value(self) -> i32 {
        let raw = VALUE.get(self.0);
        let shift = 32 - VALUE.width;
        ((raw << shift) as i32) >> shift
    }

    /// Sign-extended 24-bit data value.
    pub fn data_value(self) -> i32 {
        let shift = 32 - WORD_BITS;
        ((self.0 << shift) as i32) >> shift
    }
}

// Two-bit and three-bit fields cover every enum value.
fn decode_mode(bits: u32) -> AddrMode {
    match bits {
        0 => AddrMode::Immediate,
        1 => AddrMode::Direct,
        2 => AddrMode::Relative,
        _ => AddrMode::Register,
    }
}

fn decode_reg(bits: u32) -> Reg {
    Reg::try_from(bits as u8).unwrap_or(Reg::R0)
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::Mnemonic;
    use strum::IntoEnumIterator;

    #[test]
    fn field_masks_tile_the_word() {
        let fields = [E, R, A, FUNCT, DST_REG, DST_MODE, SRC_REG, SRC_MODE, OPCODE];
        let mut seen = 0;
        for f in fields {
            assert_eq!(seen & f.mask(), 0);
            seen |= f.mask();
        }
        assert_eq!(seen, WORD_MASK);
        assert_eq!(VALUE.mask() | A.mask() | R.mask() | E.mask(), WORD_MASK);
    }

    #[test]
    fn mov_r3_r4() {
        let inst = Inst::new(
            Mnemonic::Mov.syntax(),
            Slot::reg(Reg::R3),
            Slot::reg(Reg::R4),
        );
        let word = Word::inst(&inst);
        // opcode 0 | src 3/3 | dst 3/4 | funct 0 | A
        assert_eq!(word.bits(), 0b000000_11_011_11_100_00000_100);
        assert_eq!(word.to_string(), "037c04");
    }

    #[test]
    fn operand_sign() {
        let w = Word::operand(-1, Are::Absolute);
        assert_eq!(w.to_string(), "fffffc");
        assert_eq!(w.operand_value(), -1);
        assert_eq!(w.are(), Ok(Are::Absolute));
        let w = Word::operand(105, Are::Relocatable);
        assert_eq!(w.operand_value(), 105);
        assert_eq!(w.are(), Ok(Are::Relocatable));
        let w = Word::operand(0, Are::External);
        assert_eq!(w.bits(), 1);
    }

    #[test]
    fn data_sign() {
        assert_eq!(Word::data(-5).to_string(), "fffffb");
        assert_eq!(Word::data(-5).data_value(), -5);
        assert_eq!(Word::data(DATA_MAX).data_value(), DATA_MAX);
        assert_eq!(Word::data(DATA_MIN).data_value(), DATA_MIN);
        assert_eq!(Word::char(b'h').bits(), 0x68);
    }

    #[test]
    fn bad_flags() {
        assert_eq!(Word::from_bits(0).are(), Err(DecodeError::BadFlags(0)));
        assert_eq!(Word::from_bits(0b011).are(), Err(DecodeError::BadFlags(3)));
    }

    fn slots(set: crate::mode::ModeSet) -> Vec<Slot> {
        let mut out = vec![];
        for mode in set.modes() {
            match mode {
                AddrMode::Register => out.extend(Reg::iter().map(Slot::reg)),
                _ => out.push(Slot::mode(mode)),
            }
        }
        if out.is_empty() {
            out.push(Slot::EMPTY);
        }
        out
    }

    #[test]
    fn round_trip_every_legal_combination() {
        for mn in Mnemonic::iter() {
            let syntax = mn.syntax();
            for src in slots(syntax.src) {
                for dst in slots(syntax.dst) {
                    let inst = Inst::new(syntax, src, dst);
                    let back = Word::inst(&inst).to_inst();
                    assert_eq!(back, Ok(inst), "{mn} {src:?} {dst:?}");
                }
            }
        }
    }

    macro_rules! test_inst {
        ($($name:ident: $mn:ident, $src:expr, $dst:expr, $bits:expr,)*) => {
            $(
                #[test]
                fn $name() {
                    let inst = Inst::new(Mnemonic::$mn.syntax(), $src, $dst);
                    let word = Word::inst(&inst);
                    assert_eq!(word.bits(), $bits);
                    assert_eq!(word.to_inst(), Ok(inst));
                }
            )*
        }
    }

    test_inst! {
        enc_stop: Stop, Slot::EMPTY, Slot::EMPTY, 0x3c0004,
        enc_rts: Rts, Slot::EMPTY, Slot::EMPTY, 0x380004,
        enc_clr_r2: Clr, Slot::EMPTY, Slot::reg(Reg::R2), 0x141a0c,
        enc_jmp_rel: Jmp, Slot::EMPTY, Slot::mode(AddrMode::Relative), 0x24100c,
        enc_sub_imm_dir: Sub, Slot::mode(AddrMode::Immediate), Slot::mode(AddrMode::Direct), 0x080814,
        enc_lea_dir_r6: Lea, Slot::mode(AddrMode::Direct), Slot::reg(Reg::R6), 0x111e04,
    }

    #[test]
    fn shapes_have_empty_unused_slots() {
        let inst = Inst::new(Mnemonic::Prn.syntax(), Slot::EMPTY, Slot::reg(Reg::R1));
        assert_eq!(inst.syntax.shape(), Shape::Dst);
        let word = Word::inst(&inst);
        assert_eq!(SRC_MODE.get(word.bits()), 0);
        assert_eq!(SRC_REG.get(word.bits()), 0);
    }
}
