use arch::{
    word::{Are, Word},
    BASE_ADDR,
};

use crate::{
    error::Error,
    first_pass::Assembly,
    label::RefKind,
    msg::Report,
};

/// Symbol lines for the `.ent` and `.ext` files.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Linked {
    pub entries: Vec<(String, u32)>,
    pub externals: Vec<(String, u32)>,
}

/// Relocates data labels, patches every label operand and resolves the
/// entry list.
pub fn second_pass(asm: &mut Assembly, report: &mut Report) -> Linked {
    let mut linked = Linked::default();
    let ic = asm.ic();
    asm.labels.relocate_data(ic);

    for r in &asm.refs {
        let Some(label) = asm.labels.get(&r.name) else {
            report.error(r.line, Error::UndefinedLabel(r.name.clone()));
            continue;
        };
        let word = match r.kind {
            RefKind::Immediate if label.is_extern() => {
                linked.externals.push((r.name.clone(), r.addr));
                Word::operand(0, Are::External)
            }
            RefKind::Immediate => Word::operand(label.value as i32, Are::Relocatable),
            RefKind::Relative if label.is_extern() => {
                report.error(r.line, Error::RelativeExtern(r.name.clone()));
                continue;
            }
            RefKind::Relative => {
                Word::operand(label.value as i32 - r.addr as i32 + 1, Are::Absolute)
            }
        };
        if let Some(slot) = asm.code.get_mut((r.addr - BASE_ADDR) as usize) {
            *slot = word;
        }
    }

    for entry in asm.entries.iter() {
        match asm.labels.get(&entry.name) {
            None => report.error(entry.line, Error::UndefinedEntry(entry.name.clone())),
            Some(label) if label.is_extern() => {
                report.error(entry.line, Error::EntryIsExtern(entry.name.clone()))
            }
            Some(label) => linked.entries.push((entry.name.clone(), label.value)),
        }
    }

    log::debug!(
        "second pass: {} entries, {} external uses",
        linked.entries.len(),
        linked.externals.len()
    );
    linked
}
