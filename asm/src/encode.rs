use arch::{
    mode::{AddrMode, ModeSet},
    op::{Mnemonic, OpSyntax, Shape},
    reg::Reg,
    word::{Are, Inst, Slot, Word, VALUE_MAX, VALUE_MIN},
};

use crate::{
    error::Error,
    label::RefKind,
    parser::{is_identifier, parse_int, split_token},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Immediate(i32),
    Register(Reg),
    Direct(String),
    Relative(String),
}

impl Operand {
    pub fn mode(&self) -> AddrMode {
        match self {
            Operand::Immediate(_) => AddrMode::Immediate,
            Operand::Register(_) => AddrMode::Register,
            Operand::Direct(_) => AddrMode::Direct,
            Operand::Relative(_) => AddrMode::Relative,
        }
    }

    fn slot(&self) -> Slot {
        match self {
            Operand::Register(r) => Slot::reg(*r),
            other => Slot::mode(other.mode()),
        }
    }
}

pub fn extract_operand(s: &str) -> Result<Operand, Error> {
    if let Some(num) = s.strip_prefix('#') {
        return match parse_int(num, VALUE_MIN, VALUE_MAX) {
            Ok(n) => Ok(Operand::Immediate(n)),
            Err(Error::NumberOutOfRange(_)) => Err(Error::ImmediateOutOfRange(s.to_string())),
            Err(_) => Err(Error::InvalidImmediate(s.to_string())),
        };
    }
    if let Some(reg) = Reg::parse(s) {
        return Ok(Operand::Register(reg));
    }
    if let Some(name) = s.strip_prefix('&') {
        if is_identifier(name) {
            return Ok(Operand::Relative(name.to_string()));
        }
        return Err(Error::InvalidOperand(s.to_string()));
    }
    if is_identifier(s) {
        return Ok(Operand::Direct(s.to_string()));
    }
    Err(Error::InvalidOperand(s.to_string()))
}

/// Label operand whose word is patched in the second pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRef {
    pub name: String,
    pub kind: RefKind,
    /// Index of the placeholder word inside `Encoded::words`.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub words: Vec<Word>,
    pub refs: Vec<PendingRef>,
}

/// Encodes one operation statement (everything after the label).
pub fn parse_operation(line: &str) -> Result<Encoded, Error> {
    let (name, rest) = split_token(line);
    if name.is_empty() {
        return Err(Error::MissingStatement);
    }
    let mnemonic =
        Mnemonic::parse(name).ok_or_else(|| Error::UnknownOperation(name.to_string()))?;
    let syntax = mnemonic.syntax();

    let (src, dst) = match syntax.shape() {
        Shape::NoOperand => {
            let rest = rest.trim();
            if !rest.is_empty() {
                return Err(Error::ExtraOperands(rest.to_string()));
            }
            (None, None)
        }
        Shape::Dst => (None, Some(single_operand(rest)?)),
        Shape::SrcDst => {
            let (src, dst) = operand_pair(rest)?;
            (Some(src), Some(dst))
        }
    };

    if let Some(op) = &src {
        check_mode(syntax, syntax.src, "source", op)?;
    }
    if let Some(op) = &dst {
        check_mode(syntax, syntax.dst, "destination", op)?;
    }

    let inst = Inst::new(
        syntax,
        src.as_ref().map_or(Slot::EMPTY, Operand::slot),
        dst.as_ref().map_or(Slot::EMPTY, Operand::slot),
    );
    let mut enc = Encoded {
        words: vec![Word::inst(&inst)],
        refs: vec![],
    };
    for op in src.iter().chain(dst.iter()) {
        push_operand(&mut enc, op);
    }
    Ok(enc)
}

fn single_operand(rest: &str) -> Result<Operand, Error> {
    let (op, tail) = split_token(rest);
    if op.is_empty() {
        return Err(Error::MissingOperand);
    }
    let tail = tail.trim();
    if !tail.is_empty() {
        return Err(Error::ExtraOperands(tail.to_string()));
    }
    extract_operand(op)
}

fn operand_pair(rest: &str) -> Result<(Operand, Operand), Error> {
    let Some((src, dst)) = rest.split_once(',') else {
        return match rest.split_whitespace().count() {
            0 | 1 => Err(Error::MissingOperand),
            _ => Err(Error::MissingComma),
        };
    };
    let src = src.trim();
    if src.is_empty() {
        return Err(Error::MissingOperand);
    }
    if src.split_whitespace().count() > 1 {
        return Err(Error::MissingComma);
    }
    if let Some((_, extra)) = dst.split_once(',') {
        return Err(Error::ExtraOperands(extra.trim().to_string()));
    }
    let src = extract_operand(src)?;
    let dst = single_operand(dst)?;
    Ok((src, dst))
}

fn check_mode(
    syntax: &OpSyntax,
    allowed: ModeSet,
    slot: &'static str,
    op: &Operand,
) -> Result<(), Error> {
    if allowed.contains(op.mode()) {
        Ok(())
    } else {
        Err(Error::OperandNotAllowed {
            op: syntax.mnemonic,
            slot,
            mode: op.mode(),
        })
    }
}

fn push_operand(enc: &mut Encoded, op: &Operand) {
    let (name, kind) = match op {
        Operand::Register(_) => return,
        Operand::Immediate(n) => {
            enc.words.push(Word::operand(*n, Are::Absolute));
            return;
        }
        Operand::Direct(name) => (name, RefKind::Immediate),
        Operand::Relative(name) => (name, RefKind::Relative),
    };
    enc.refs.push(PendingRef {
        name: name.clone(),
        kind,
        offset: enc.words.len(),
    });
    enc.words.push(Word::default());
}
