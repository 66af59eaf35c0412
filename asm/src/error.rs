use arch::{directive::Directive, mode::AddrMode, op::Mnemonic};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // File access. These abort the current source file.
    #[error("File names should not include the extension: `{0}`")]
    FileExtension(String),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read line: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),

    #[error("Failed to remove stale file: {0}")]
    FileRemove(String, #[source] std::io::Error),

    // Macros
    #[error("Macro cannot have a reserved name: `{0}`")]
    ReservedMacroName(String),

    #[error("Missing macro name")]
    MissingMacroName,

    #[error("Macro `{0}` is already defined")]
    DuplicateMacro(String),

    #[error("Extra characters after macro definition: `{0}`")]
    ExtraCharsAfterMacro(String),

    #[error("Extra characters after end of macro: `{0}`")]
    ExtraCharsAfterMacroEnd(String),

    #[error("Macro `{0}` is never closed")]
    UnterminatedMacro(String),

    // Labels
    #[error("Label too long: `{0}`")]
    LabelTooLong(String),

    #[error("Label cannot have a reserved name: `{0}`")]
    ReservedLabel(String),

    #[error("Label `{0}` already defined at line {1}")]
    RedefinedLabel(String, usize),

    #[error("Label `{0}` already defined as macro")]
    LabelIsMacro(String),

    #[error("Invalid label name: `{0}`")]
    InvalidLabelName(String),

    #[error("Missing statement after label")]
    MissingStatement,

    // Directives
    #[error("Invalid directive name: `.{0}`")]
    InvalidDirective(String),

    #[error("Missing parameter for `.{0}`")]
    MissingParameter(Directive),

    #[error("Missing string")]
    MissingQuote,

    #[error("Unterminated string")]
    UnterminatedString,

    #[error("String must contain printable ASCII characters only")]
    NonAsciiString,

    #[error("Extra characters after string: `{0}`")]
    ExtraCharsAfterString(String),

    #[error("Extra characters after extern or entry name: `{0}`")]
    ExtraCharsAfterLinking(String),

    #[error("Missing number or extraneous comma")]
    MissingNumber,

    #[error("Missing comma")]
    MissingComma,

    #[error("Invalid number: `{0}`")]
    InvalidNumber(String),

    #[error("Number out of range: `{0}`")]
    NumberOutOfRange(String),

    // Operations
    #[error("Unknown operation: `{0}`")]
    UnknownOperation(String),

    #[error("Missing operand")]
    MissingOperand,

    #[error("Extra characters after operands: `{0}`")]
    ExtraOperands(String),

    #[error("Invalid immediate value: `{0}`")]
    InvalidImmediate(String),

    #[error("Immediate value out of range: `{0}`")]
    ImmediateOutOfRange(String),

    #[error("Invalid operand: `{0}`")]
    InvalidOperand(String),

    #[error("Operand type {mode} is not allowed as {slot} operand of `{op}`")]
    OperandNotAllowed {
        op: Mnemonic,
        slot: &'static str,
        mode: AddrMode,
    },

    // Resolution
    #[error("Undefined label: `{0}`")]
    UndefinedLabel(String),

    #[error("External label `{0}` cannot be used with relative addressing")]
    RelativeExtern(String),

    #[error("Entry `{0}` is not defined in this file")]
    UndefinedEntry(String),

    #[error("Label `{0}` cannot be both entry and extern")]
    EntryIsExtern(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Warn {
    #[error("Labeling a .{0} directive has no meaning")]
    LabeledLinking(Directive),

    #[error("`{0}` is already declared as entry")]
    RepeatedEntry(String),
}
