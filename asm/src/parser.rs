use arch::{
    directive::Directive,
    reserved::is_reserved,
    word::{DATA_MAX, DATA_MIN},
    MAX_LABEL_LEN,
};

use crate::error::Error;

// ----------------------------------------------------------------------------
// Line filters

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with(';')
}

/// Splits off the first whitespace-delimited token.
pub fn split_token(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    s.split_at(end)
}

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// Length and reserved-word rules shared by labels and extern/entry names.
pub fn check_name(name: &str) -> Result<(), Error> {
    if name.len() > MAX_LABEL_LEN {
        return Err(Error::LabelTooLong(name.to_string()));
    }
    if is_reserved(name) {
        return Err(Error::ReservedLabel(name.to_string()));
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Label

/// `NAME:` at the start of the line. Returns the name and the text after
/// the colon. Anything else, including a name with a bad character, is not
/// a label.
pub fn parse_label(line: &str) -> Option<(&str, &str)> {
    let s = line.trim_start();
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    for (idx, c) in chars {
        if c == ':' {
            return Some((&s[..idx], &s[idx + 1..]));
        }
        if !(c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
    }
    None
}

// ----------------------------------------------------------------------------
// Directive

/// `None` if the line is not a directive. An unknown directive name is an
/// error but still consumes the line.
pub fn parse_directive(line: &str) -> Option<Result<(Directive, &str), Error>> {
    let body = line.trim_start().strip_prefix('.')?;
    let (name, rest) = body.split_at(body.find(char::is_whitespace).unwrap_or(body.len()));
    Some(match Directive::parse(name) {
        Some(dir) => Ok((dir, rest)),
        None => Err(Error::InvalidDirective(name.to_string())),
    })
}

/// Argument of `.string`.
pub fn parse_string(args: &str) -> Result<String, Error> {
    let s = args.trim();
    if s.is_empty() {
        return Err(Error::MissingParameter(Directive::String));
    }
    let body = s.strip_prefix('"').ok_or(Error::MissingQuote)?;
    let end = body.find('"').ok_or(Error::UnterminatedString)?;
    let (text, tail) = (&body[..end], body[end + 1..].trim());
    if !tail.is_empty() {
        return Err(Error::ExtraCharsAfterString(tail.to_string()));
    }
    if !text.bytes().all(|b| b.is_ascii_graphic() || b == b' ') {
        return Err(Error::NonAsciiString);
    }
    Ok(text.to_string())
}

/// Arguments of `.data`: comma separated decimal integers.
pub fn parse_numbers(args: &str) -> Result<Vec<i32>, Error> {
    let s = args.trim();
    if s.is_empty() {
        return Err(Error::MissingParameter(Directive::Data));
    }
    let mut nums = vec![];
    for item in s.split(',') {
        let item = item.trim();
        if item.is_empty() {
            return Err(Error::MissingNumber);
        }
        if item.split_whitespace().count() > 1 {
            return Err(Error::MissingComma);
        }
        nums.push(parse_int(item, DATA_MIN, DATA_MAX)?);
    }
    Ok(nums)
}

/// Decimal integer with an optional sign, checked against `min..=max`.
pub fn parse_int(s: &str, min: i32, max: i32) -> Result<i32, Error> {
    let digits = s.strip_prefix(['+', '-']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidNumber(s.to_string()));
    }
    match s.parse::<i64>() {
        Ok(n) if (min as i64..=max as i64).contains(&n) => Ok(n as i32),
        _ => Err(Error::NumberOutOfRange(s.to_string())),
    }
}

/// Argument of `.extern` / `.entry`.
pub fn parse_linking(dir: Directive, args: &str) -> Result<String, Error> {
    let (name, tail) = split_token(args);
    if name.is_empty() {
        return Err(Error::MissingParameter(dir));
    }
    let tail = tail.trim();
    if !tail.is_empty() {
        return Err(Error::ExtraCharsAfterLinking(tail.to_string()));
    }
    if !is_identifier(name) {
        return Err(Error::InvalidLabelName(name.to_string()));
    }
    check_name(name)?;
    Ok(name.to_string())
}
