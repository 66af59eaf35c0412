use arch::reserved::{is_reserved, MACRO_END, MACRO_START};

use crate::{error::Error, msg::Report, parser::split_token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    pub name: String,
    pub body: Vec<String>,
    /// Line of the `mcro` header in the source.
    pub line: usize,
}

#[derive(Debug, Default)]
pub struct Macros(Vec<Macro>);

impl Macros {
    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.0.iter().find(|m| m.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Expanded {
    pub lines: Vec<String>,
    pub macros: Macros,
}

struct Open {
    mac: Macro,
    /// Cleared when the header was rejected; the body is still swallowed.
    keep: bool,
}

/// Collects macro definitions and replaces every invocation line with the
/// body. Errors go to `report` with line numbers of `lines`.
pub fn preprocess(lines: &[String], report: &mut Report) -> Expanded {
    let mut out = Expanded::default();
    let mut open: Option<Open> = None;

    for (idx, raw) in lines.iter().enumerate() {
        let line = idx + 1;
        let (first, tail) = split_token(raw);

        if let Some(cur) = open.as_mut() {
            if first != MACRO_END {
                cur.mac.body.push(raw.clone());
                continue;
            }
            let tail = tail.trim();
            if !tail.is_empty() {
                report.error(line, Error::ExtraCharsAfterMacroEnd(tail.to_string()));
            }
            if let Some(done) = open.take() {
                if done.keep {
                    log::debug!(
                        "macro `{}`: {} line(s)",
                        done.mac.name,
                        done.mac.body.len()
                    );
                    out.macros.0.push(done.mac);
                }
            }
            continue;
        }

        if first == MACRO_START {
            open = Some(open_macro(line, tail, &out.macros, report));
            continue;
        }

        match out.macros.get(raw.trim()) {
            Some(mac) => out.lines.extend(mac.body.iter().cloned()),
            None => out.lines.push(raw.clone()),
        }
    }

    if let Some(cur) = open {
        report.error(cur.mac.line, Error::UnterminatedMacro(cur.mac.name));
    }
    out
}

fn open_macro(line: usize, tail: &str, macros: &Macros, report: &mut Report) -> Open {
    let (name, extra) = split_token(tail);
    let mut keep = true;
    if name.is_empty() {
        report.error(line, Error::MissingMacroName);
        keep = false;
    } else if macros.contains(name) {
        report.error(line, Error::DuplicateMacro(name.to_string()));
        keep = false;
    } else if is_reserved(name) {
        report.error(line, Error::ReservedMacroName(name.to_string()));
    }
    let extra = extra.trim();
    if !extra.is_empty() {
        report.error(line, Error::ExtraCharsAfterMacro(extra.to_string()));
    }
    Open {
        mac: Macro {
            name: name.to_string(),
            body: vec![],
            line,
        },
        keep,
    }
}
