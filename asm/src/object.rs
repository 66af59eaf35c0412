use std::fmt::Write;

use arch::BASE_ADDR;

use crate::first_pass::Assembly;

/// Contents of the `.ob` file: a `<code length> <data length>` header, then
/// one `address word` line per code word and per data word.
pub fn render_object(asm: &Assembly) -> String {
    let mut out = format!("{} {}\n", asm.code.len(), asm.data.len());
    let data_base = asm.ic();
    let code = asm.code.iter().zip(BASE_ADDR..);
    let data = asm.data.iter().zip(data_base..);
    for (word, addr) in code.chain(data) {
        let _ = writeln!(out, "{:07} {}", addr, word);
    }
    out
}

/// Contents of a `.ent` or `.ext` file.
pub fn render_symbols(symbols: &[(String, u32)]) -> String {
    let mut out = String::new();
    for (name, addr) in symbols {
        let _ = writeln!(out, "{} {:07}", name, addr);
    }
    out
}
