use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Assembler directives, written with a leading `.` in source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, IntoStaticStr, Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Directive {
    Data,
    String,
    Entry,
    Extern,
}

impl Directive {
    /// `name` without the leading dot.
    pub fn parse(name: &str) -> Option<Self> {
        name.parse::<Self>().ok()
    }
}
