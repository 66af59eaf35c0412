use arch::{directive::Directive, word::Word, BASE_ADDR};

use crate::{
    encode::parse_operation,
    error::{Error, Warn},
    label::{Entries, Label, Labels, Reference},
    msg::Report,
    parser::{
        check_name, is_blank, is_comment, parse_directive, parse_label, parse_linking,
        parse_numbers, parse_string,
    },
    preprocess::Macros,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Code,
    Data,
}

/// Words produced by one source line, kept for the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stmt {
    pub line: usize,
    pub seg: Segment,
    /// Index of the first word in its segment image.
    pub offset: usize,
    pub len: usize,
}

#[derive(Debug, Default)]
pub struct Assembly {
    pub labels: Labels,
    pub refs: Vec<Reference>,
    pub entries: Entries,
    pub code: Vec<Word>,
    pub data: Vec<Word>,
    pub stmts: Vec<Stmt>,
}

impl Assembly {
    /// Instruction counter: next free code address.
    pub fn ic(&self) -> u32 {
        BASE_ADDR + self.code.len() as u32
    }

    /// Data counter: number of data words so far.
    pub fn dc(&self) -> u32 {
        self.data.len() as u32
    }

    fn bind(&mut self, report: &mut Report, line: usize, name: Option<&str>, label: Label) {
        if let Some(name) = name {
            if let Err(e) = self.labels.insert(name, label) {
                report.error(line, e);
            }
        }
    }

    fn push_data(&mut self, line: usize, words: impl IntoIterator<Item = Word>) {
        let offset = self.data.len();
        self.data.extend(words);
        self.stmts.push(Stmt {
            line,
            seg: Segment::Data,
            offset,
            len: self.data.len() - offset,
        });
    }
}

/// Builds the code and data images and the symbol tables from the
/// expanded source.
pub fn first_pass(lines: &[String], macros: &Macros, report: &mut Report) -> Assembly {
    let mut asm = Assembly::default();
    for (idx, raw) in lines.iter().enumerate() {
        if is_blank(raw) || is_comment(raw) {
            continue;
        }
        statement(&mut asm, macros, report, idx + 1, raw);
    }
    log::debug!(
        "first pass: IC={} DC={} labels={} refs={} entries={}",
        asm.ic(),
        asm.dc(),
        asm.labels.len(),
        asm.refs.len(),
        asm.entries.len()
    );
    asm
}

fn statement(asm: &mut Assembly, macros: &Macros, report: &mut Report, line: usize, raw: &str) {
    let (name, body) = match parse_label(raw) {
        Some((_, rest)) if is_blank(rest) || is_comment(rest) => {
            return report.error(line, Error::MissingStatement);
        }
        Some((name, rest)) => (Some(name), rest),
        None => (None, raw),
    };
    let directive = parse_directive(body);

    // A label on `.extern`/`.entry` is never bound, so only collisions matter.
    let linking = matches!(
        directive,
        Some(Ok((Directive::Extern | Directive::Entry, _)))
    );
    let label = name.and_then(|name| check_label(asm, macros, report, line, name, !linking));

    let (dir, args) = match directive {
        None => return operation(asm, report, line, label, body),
        Some(Err(e)) => return report.error(line, e),
        Some(Ok(found)) => found,
    };

    match dir {
        Directive::Data => {
            asm.bind(report, line, label, Label::data(asm.dc(), line));
            match parse_numbers(args) {
                Ok(nums) => asm.push_data(line, nums.into_iter().map(Word::data)),
                Err(e) => report.error(line, e),
            }
        }
        Directive::String => {
            asm.bind(report, line, label, Label::data(asm.dc(), line));
            match parse_string(args) {
                Ok(text) => asm.push_data(
                    line,
                    text.bytes().chain(std::iter::once(0)).map(Word::char),
                ),
                Err(e) => report.error(line, e),
            }
        }
        Directive::Extern => {
            if label.is_some() {
                report.warn(line, Warn::LabeledLinking(dir));
            }
            match parse_linking(dir, args) {
                Ok(name) => declare_extern(asm, macros, report, line, &name),
                Err(e) => report.error(line, e),
            }
        }
        Directive::Entry => {
            if label.is_some() {
                report.warn(line, Warn::LabeledLinking(dir));
            }
            match parse_linking(dir, args) {
                Ok(name) => {
                    if !asm.entries.push(&name, line) {
                        report.warn(line, Warn::RepeatedEntry(name));
                    }
                }
                Err(e) => report.error(line, e),
            }
        }
    }
}

/// Returns the name only if it may be bound. `strict` adds the length and
/// reserved-word rules.
fn check_label<'a>(
    asm: &Assembly,
    macros: &Macros,
    report: &mut Report,
    line: usize,
    name: &'a str,
    strict: bool,
) -> Option<&'a str> {
    let res = if strict { check_name(name) } else { Ok(()) }.and_then(|()| {
        if macros.contains(name) {
            Err(Error::LabelIsMacro(name.to_string()))
        } else if let Some(prev) = asm.labels.get(name) {
            Err(Error::RedefinedLabel(name.to_string(), prev.line))
        } else {
            Ok(())
        }
    });
    match res {
        Ok(()) => Some(name),
        Err(e) => {
            report.error(line, e);
            None
        }
    }
}

fn declare_extern(
    asm: &mut Assembly,
    macros: &Macros,
    report: &mut Report,
    line: usize,
    name: &str,
) {
    if macros.contains(name) {
        return report.error(line, Error::LabelIsMacro(name.to_string()));
    }
    // Declaring the same extern twice is harmless.
    let declared = asm.labels.get(name).is_some_and(Label::is_extern);
    if !declared {
        asm.bind(report, line, Some(name), Label::external(line));
    }
}

fn operation(
    asm: &mut Assembly,
    report: &mut Report,
    line: usize,
    label: Option<&str>,
    body: &str,
) {
    let ic = asm.ic();
    asm.bind(report, line, label, Label::code(ic, line));
    let enc = match parse_operation(body) {
        Ok(enc) => enc,
        Err(e) => return report.error(line, e),
    };
    for r in enc.refs {
        asm.refs.push(Reference {
            name: r.name,
            kind: r.kind,
            addr: ic + r.offset as u32,
            line,
        });
    }
    asm.stmts.push(Stmt {
        line,
        seg: Segment::Code,
        offset: asm.code.len(),
        len: enc.words.len(),
    });
    asm.code.extend(enc.words);
}
