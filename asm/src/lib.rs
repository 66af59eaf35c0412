pub mod encode;
pub mod error;
pub mod first_pass;
pub mod label;
pub mod msg;
pub mod object;
pub mod parser;
pub mod preprocess;
pub mod second_pass;
pub mod util;

use std::{
    fs,
    io::{BufRead, BufReader, ErrorKind, Write},
};

use error::Error;
use first_pass::{first_pass, Assembly};
use msg::Report;
use object::{render_object, render_symbols};
use preprocess::{preprocess, Expanded};
use second_pass::second_pass;

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Print the memory image next to the expanded source.
    pub dump: bool,
}

/// Rendered output files. `None` means the file must not exist.
#[derive(Debug)]
pub struct Files {
    pub object: String,
    pub entries: Option<String>,
    pub externals: Option<String>,
}

#[derive(Debug)]
pub struct Assembled {
    /// Source after macro expansion (the `.am` contents).
    pub expanded: Vec<String>,
    /// Preprocessor diagnostics, numbered by `.as` lines.
    pub pre: Report,
    /// Assembler diagnostics, numbered by `.am` lines.
    pub report: Report,
    pub assembly: Assembly,
    /// `None` if any error was reported.
    pub files: Option<Files>,
}

impl Assembled {
    pub fn has_error(&self) -> bool {
        self.pre.has_error() || self.report.has_error()
    }
}

/// Runs every stage on one in-memory source. `base` only names the
/// diagnostics.
pub fn assemble_source(base: &str, lines: &[String]) -> Assembled {
    let mut pre = Report::new(format!("{base}.as"));
    let Expanded { lines: expanded, macros } = preprocess(lines, &mut pre);
    log::debug!("{} macro(s), {} expanded line(s)", macros.len(), expanded.len());

    let mut report = Report::new(format!("{base}.am"));
    let mut assembly = first_pass(&expanded, &macros, &mut report);
    drop(macros);

    let files = if pre.has_error() || report.has_error() {
        log::info!("{base}: errors found, skipping second pass");
        None
    } else {
        let linked = second_pass(&mut assembly, &mut report);
        (!report.has_error()).then(|| Files {
            object: render_object(&assembly),
            entries: (!linked.entries.is_empty()).then(|| render_symbols(&linked.entries)),
            externals: (!linked.externals.is_empty()).then(|| render_symbols(&linked.externals)),
        })
    };

    Assembled {
        expanded,
        pre,
        report,
        assembly,
        files,
    }
}

/// Assembles `<base>.as` and writes `.am`, `.ob`, `.ent` and `.ext` next to
/// it. Returns `Ok(false)` when the source had errors; `Err` only for
/// problems with the files themselves.
pub fn assemble_file(base: &str, opts: &Options) -> Result<bool, Error> {
    if base.ends_with(".as") {
        return Err(Error::FileExtension(base.to_string()));
    }
    let src_path = format!("{base}.as");
    log::info!("reading {}", src_path);
    let lines = read_lines(&src_path)?;

    let out = assemble_source(base, &lines);

    let am_path = format!("{base}.am");
    log::info!("writing {}", am_path);
    write_file(&am_path, &join_lines(&out.expanded))?;

    out.pre.print(&lines);
    out.report.print(&out.expanded);
    if opts.dump {
        util::print_dump(out.report.file(), &out.expanded, &out.assembly);
    }

    let Some(files) = &out.files else {
        log::warn!("{base}: no output files written");
        for ext in ["ob", "ent", "ext"] {
            write_or_remove(&format!("{base}.{ext}"), None)?;
        }
        return Ok(false);
    };
    write_file(&format!("{base}.ob"), &files.object)?;
    write_or_remove(&format!("{base}.ent"), files.entries.as_deref())?;
    write_or_remove(&format!("{base}.ext"), files.externals.as_deref())?;
    log::info!(
        "{base}: {} code word(s), {} data word(s)",
        out.assembly.code.len(),
        out.assembly.data.len()
    );
    Ok(true)
}

/// Bytes that are not UTF-8 become U+FFFD instead of failing the file.
fn read_lines(path: &str) -> Result<Vec<String>, Error> {
    let file = fs::File::open(path).map_err(|e| Error::FileOpen(path.to_string(), e))?;
    BufReader::new(file)
        .split(b'\n')
        .map(|line| {
            let mut line = line.map_err(|e| Error::FileRead(path.to_string(), e))?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            Ok(String::from_utf8_lossy(&line).into_owned())
        })
        .collect()
}

fn join_lines(lines: &[String]) -> String {
    lines.iter().fold(String::new(), |mut out, line| {
        out.push_str(line);
        out.push('\n');
        out
    })
}

fn write_file(path: &str, contents: &str) -> Result<(), Error> {
    log::debug!("writing {} ({} bytes)", path, contents.len());
    let mut file = fs::File::create(path).map_err(|e| Error::FileCreate(path.to_string(), e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| Error::FileWrite(path.to_string(), e))
}

fn write_or_remove(path: &str, contents: Option<&str>) -> Result<(), Error> {
    match contents {
        Some(contents) => write_file(path, contents),
        None => match fs::remove_file(path) {
            Ok(()) => {
                log::info!("removed stale {}", path);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::FileRemove(path.to_string(), e)),
        },
    }
}
