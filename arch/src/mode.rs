use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter};

/// Addressing mode of an operand, numbered as it is stored in the
/// two-bit mode fields of an instruction word.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Display, EnumIter,
)]
#[repr(u8)]
pub enum AddrMode {
    /// `#5`
    Immediate = 0,
    /// `LABEL`
    Direct = 1,
    /// `&LABEL`
    Relative = 2,
    /// `r3`
    Register = 3,
}

impl AddrMode {
    /// Number of extra words the operand occupies after the instruction word.
    pub fn extra_words(self) -> usize {
        match self {
            AddrMode::Register => 0,
            _ => 1,
        }
    }

    fn bit(self) -> u8 {
        1 << u8::from(self)
    }
}

/// Set of addressing modes accepted by one operand slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeSet(u8);

impl ModeSet {
    pub const NONE: ModeSet = ModeSet(0);
    pub const IMM: ModeSet = ModeSet(1 << 0);
    pub const DIR: ModeSet = ModeSet(1 << 1);
    pub const REL: ModeSet = ModeSet(1 << 2);
    pub const REG: ModeSet = ModeSet(1 << 3);

    pub const fn union(self, other: ModeSet) -> ModeSet {
        ModeSet(self.0 | other.0)
    }

    pub fn contains(self, mode: AddrMode) -> bool {
        self.0 & mode.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn modes(self) -> impl Iterator<Item = AddrMode> {
        use strum::IntoEnumIterator;
        AddrMode::iter().filter(move |m| self.contains(*m))
    }
}

impl std::fmt::Display for ModeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.modes().map(|m| m.to_string()).collect();
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join("/"))
        }
    }
}
