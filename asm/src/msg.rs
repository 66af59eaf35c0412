use color_print::cprintln;

use crate::error::{Error, Warn};

#[derive(Debug)]
pub enum Msg {
    Error(Error),
    Warn(Warn),
}

/// A message tied to a 1-based source line.
#[derive(Debug)]
pub struct Diag {
    pub msg: Msg,
    pub line: usize,
}

/// Diagnostics collected for one file (`.as` for the preprocessor, `.am`
/// for the two passes).
#[derive(Debug)]
pub struct Report {
    file: String,
    diags: Vec<Diag>,
}

impl Report {
    pub fn new(file: impl Into<String>) -> Self {
        Report {
            file: file.into(),
            diags: vec![],
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn error(&mut self, line: usize, err: Error) {
        log::debug!("{}:{}: {}", self.file, line, err);
        self.diags.push(Diag {
            msg: Msg::Error(err),
            line,
        });
    }

    pub fn warn(&mut self, line: usize, warn: Warn) {
        log::debug!("{}:{}: {}", self.file, line, warn);
        self.diags.push(Diag {
            msg: Msg::Warn(warn),
            line,
        });
    }

    pub fn diags(&self) -> &[Diag] {
        &self.diags
    }

    pub fn errors(&self) -> impl Iterator<Item = &Error> {
        self.diags.iter().filter_map(|d| match &d.msg {
            Msg::Error(e) => Some(e),
            Msg::Warn(_) => None,
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Warn> {
        self.diags.iter().filter_map(|d| match &d.msg {
            Msg::Warn(w) => Some(w),
            Msg::Error(_) => None,
        })
    }

    pub fn has_error(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Prints every message with the offending line taken from `lines`.
    pub fn print(&self, lines: &[String]) {
        for diag in &self.diags {
            match &diag.msg {
                Msg::Error(e) => cprintln!("<red,bold>error</>: {}", e),
                Msg::Warn(w) => cprintln!("<yellow,bold>warn</>: {}", w),
            }
            let raw = diag
                .line
                .checked_sub(1)
                .and_then(|idx| lines.get(idx))
                .map(|s| s.as_str())
                .unwrap_or("");
            cprintln!("     <blue>--></> <underline>{}:{}</>", self.file, diag.line);
            cprintln!("      <blue>|</>");
            cprintln!(" <blue>{:>4} |</> {}", diag.line, raw);
            cprintln!("      <blue>|</>");
        }
    }
}
