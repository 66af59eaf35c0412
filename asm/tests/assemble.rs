use std::{fs, path::PathBuf};

use asm24::{assemble_file, assemble_source, error::Error, Assembled, Options};

fn assemble(src: &str) -> Assembled {
    let lines: Vec<String> = src.lines().map(String::from).collect();
    let out = assemble_source("prog", &lines);
    for (idx, line) in out.expanded.iter().enumerate() {
        println!("{:>3}: {}", idx + 1, line);
    }
    for diag in out.pre.diags().iter().chain(out.report.diags()) {
        println!("{:?}", diag);
    }
    out
}

const PROGRAM: &str = "\
; sample
.entry MAIN
.extern W
mcro m_stop
 stop
mcroend
MAIN: mov #3, r1
 lea STR, r2
 jsr W
 bne &MAIN
 m_stop
STR: .string \"ab\"
N: .data -1
";

#[test]
fn full_program() {
    let out = assemble(PROGRAM);
    assert!(!out.has_error());
    assert_eq!(out.expanded.len(), 10);
    assert_eq!(out.expanded[7], " stop");

    let files = out.files.expect("output files");
    let expected = "\
9 4
0000100 001904
0000101 00001c
0000102 111a04
0000103 00036a
0000104 24081c
0000105 000001
0000106 241014
0000107 ffffd4
0000108 3c0004
0000109 000061
0000110 000062
0000111 000000
0000112 ffffff
";
    assert_eq!(files.object, expected);
    assert_eq!(files.entries.as_deref(), Some("MAIN 0000100\n"));
    assert_eq!(files.externals.as_deref(), Some("W 0000105\n"));
}

#[test]
fn no_symbol_files_when_unused() {
    let out = assemble("stop");
    let files = out.files.expect("output files");
    assert_eq!(files.object, "1 0\n0000100 3c0004\n");
    assert!(files.entries.is_none());
    assert!(files.externals.is_none());
}

#[test]
fn warnings_keep_output() {
    let out = assemble("X: .extern W\nprn W\nstop");
    assert!(!out.has_error());
    assert_eq!(out.report.warnings().count(), 1);
    assert!(out.files.is_some());
}

#[test]
fn preprocessor_errors_still_run_first_pass() {
    let out = assemble("mcro mov\nstop\nmcroend\nmov r1\n");
    assert!(out.pre.has_error());
    assert!(matches!(out.report.errors().next(), Some(Error::MissingOperand)));
    assert!(out.files.is_none());
}

#[test]
fn first_pass_errors_skip_second_pass() {
    let out = assemble("jmp NOWHERE\nstop x");
    // NOWHERE would be an undefined label, but resolution never runs.
    let errs: Vec<_> = out.report.errors().collect();
    assert!(matches!(errs[..], [Error::ExtraOperands(_)]));
    assert!(out.files.is_none());
}

#[test]
fn every_error_is_reported() {
    let out = assemble("A: .data 1,,2\nA: stop\nmov #1\n.string hi\nfoo r1\n.blah");
    let errs: Vec<_> = out.report.errors().collect();
    assert!(matches!(
        errs[..],
        [
            Error::MissingNumber,
            Error::RedefinedLabel(_, 1),
            Error::MissingOperand,
            Error::MissingQuote,
            Error::UnknownOperation(_),
            Error::InvalidDirective(_),
        ]
    ));
    let lines: Vec<_> = out.report.diags().iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![1, 2, 3, 4, 5, 6]);
}

fn check(src: &str) -> Vec<String> {
    let out = assemble(src);
    out.pre
        .errors()
        .chain(out.report.errors())
        .map(|e| e.to_string())
        .collect()
}

macro_rules! case {
    ($name:ident, $src:expr, $pat:pat) => {
        #[test]
        fn $name() {
            let out = assemble($src);
            let errs: Vec<&Error> = out.pre.errors().chain(out.report.errors()).collect();
            assert!(matches!(errs[..], [$pat]), "{:?}", errs);
            assert!(out.files.is_none());
        }
    };
}

case!(undefined_label, "jmp NOWHERE\nstop", Error::UndefinedLabel(_));
case!(undefined_entry, ".entry FOO\nstop", Error::UndefinedEntry(_));
case!(entry_is_extern, ".extern X\n.entry X\nstop", Error::EntryIsExtern(_));
case!(relative_extern, ".extern X\njmp &X", Error::RelativeExtern(_));
case!(label_is_macro, "mcro m\nstop\nmcroend\nm: rts", Error::LabelIsMacro(_));
case!(unterminated_macro, "mcro m\nstop", Error::UnterminatedMacro(_));
case!(lea_immediate, "lea #1, r1", Error::OperandNotAllowed { .. });
case!(data_out_of_range, ".data 9999999", Error::NumberOutOfRange(_));
case!(immediate_out_of_range, "prn #2000000", Error::ImmediateOutOfRange(_));
case!(string_tail, ".string \"a\" b", Error::ExtraCharsAfterString(_));
case!(extern_extra, ".extern A B", Error::ExtraCharsAfterLinking(_));

#[test]
fn messages_name_the_culprit() {
    let errs = check("jmp NOWHERE");
    assert_eq!(errs, vec!["Undefined label: `NOWHERE`"]);
}

// ----------------------------------------------------------------------------
// Files on disk

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("asm24-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        TempDir(dir)
    }

    fn base(&self, stem: &str) -> String {
        self.0.join(stem).to_string_lossy().into_owned()
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

#[test]
fn writes_output_files() {
    let dir = TempDir::new("write");
    let base = dir.base("prog");
    fs::write(format!("{base}.as"), PROGRAM).unwrap();

    assert!(assemble_file(&base, &Options::default()).unwrap());
    let am = fs::read_to_string(format!("{base}.am")).unwrap();
    assert!(am.contains(" stop\nSTR:"));
    assert!(!am.contains("mcro"));
    let ob = fs::read_to_string(format!("{base}.ob")).unwrap();
    assert!(ob.starts_with("9 4\n0000100 001904\n"));
    assert_eq!(fs::read_to_string(format!("{base}.ent")).unwrap(), "MAIN 0000100\n");
    assert_eq!(fs::read_to_string(format!("{base}.ext")).unwrap(), "W 0000105\n");
}

#[test]
fn undefined_entry_writes_nothing() {
    let dir = TempDir::new("undef");
    let base = dir.base("prog");
    fs::write(format!("{base}.as"), ".entry FOO\nstop\n").unwrap();

    assert!(!assemble_file(&base, &Options::default()).unwrap());
    assert!(fs::metadata(format!("{base}.am")).is_ok());
    assert!(fs::metadata(format!("{base}.ob")).is_err());
    assert!(fs::metadata(format!("{base}.ent")).is_err());
    assert!(fs::metadata(format!("{base}.ext")).is_err());
}

#[test]
fn stale_symbol_files_are_removed() {
    let dir = TempDir::new("stale");
    let base = dir.base("prog");
    fs::write(format!("{base}.as"), ".entry MAIN\nMAIN: stop\n").unwrap();
    assert!(assemble_file(&base, &Options::default()).unwrap());
    assert!(fs::metadata(format!("{base}.ent")).is_ok());

    fs::write(format!("{base}.as"), "MAIN: stop\n").unwrap();
    assert!(assemble_file(&base, &Options::default()).unwrap());
    assert!(fs::metadata(format!("{base}.ent")).is_err());
}

#[test]
fn failed_rebuild_removes_old_outputs() {
    let dir = TempDir::new("rebuild");
    let base = dir.base("prog");
    fs::write(format!("{base}.as"), PROGRAM).unwrap();
    assert!(assemble_file(&base, &Options::default()).unwrap());
    for ext in ["ob", "ent", "ext"] {
        assert!(fs::metadata(format!("{base}.{ext}")).is_ok(), "{ext}");
    }

    let broken = PROGRAM.replace(" jsr W", " jsr NOWHERE");
    fs::write(format!("{base}.as"), broken).unwrap();
    assert!(!assemble_file(&base, &Options::default()).unwrap());
    assert!(fs::metadata(format!("{base}.am")).is_ok());
    for ext in ["ob", "ent", "ext"] {
        assert!(fs::metadata(format!("{base}.{ext}")).is_err(), "{ext}");
    }
}

#[test]
fn non_utf8_comment_is_not_fatal() {
    let dir = TempDir::new("latin1");
    let base = dir.base("prog");
    fs::write(format!("{base}.as"), b"; caf\xe9\r\nstop\n").unwrap();

    assert!(assemble_file(&base, &Options::default()).unwrap());
    let am = fs::read_to_string(format!("{base}.am")).unwrap();
    assert_eq!(am, "; caf\u{fffd}\nstop\n");
    let ob = fs::read_to_string(format!("{base}.ob")).unwrap();
    assert_eq!(ob, "1 0\n0000100 3c0004\n");
}

#[test]
fn file_errors() {
    let dir = TempDir::new("missing");
    let base = dir.base("absent");
    assert!(matches!(
        assemble_file(&base, &Options::default()),
        Err(Error::FileOpen(..))
    ));
    assert!(matches!(
        assemble_file("prog.as", &Options::default()),
        Err(Error::FileExtension(_))
    ));
}
