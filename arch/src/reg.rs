use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum Reg {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Reg {
    /// Parses an exact register name (`r0` .. `r7`). Case-sensitive, so
    /// `R3` or `r3d` are left for the caller to treat as labels.
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }
}
