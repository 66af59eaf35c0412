use std::collections::HashSet;

use once_cell::sync::Lazy;
use strum::IntoEnumIterator;

use crate::{directive::Directive, op::Mnemonic, reg::Reg};

pub const MACRO_START: &str = "mcro";
pub const MACRO_END: &str = "mcroend";

static RESERVED: Lazy<HashSet<String>> = Lazy::new(|| {
    let mut words = HashSet::new();
    words.extend(Reg::iter().map(|r| r.to_string()));
    words.extend(Mnemonic::iter().map(|m| m.to_string()));
    words.extend(Directive::iter().map(|d| format!(".{d}")));
    words.insert(MACRO_START.to_string());
    words.insert(MACRO_END.to_string());
    words
});

/// Registers, mnemonics, dotted directive names and the macro keywords.
/// None of them may name a label or a macro.
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(name)
}
