//! SISL quoted-string escape handling.
//!
//! The writer side uses the minimal canonical set (`\"` `\\` `\r` `\n` `\t`,
//! everything else verbatim). The reader side additionally accepts `\xHH`,
//! `\uHHHH` and `\UHHHHHHHH`, all denoting Unicode scalar values.

/// Escape a string payload for canonical SISL output.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Resolve the escape sequences of a raw quoted-string body.
///
/// Errors carry a message only; the lexer attaches the input position.
pub fn unescape(input: &str) -> Result<String, String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('x') => out.push(take_codepoint(&mut chars, 2)?),
            Some('u') => out.push(take_codepoint(&mut chars, 4)?),
            Some('U') => out.push(take_codepoint(&mut chars, 8)?),
            Some(other) => return Err(format!("invalid escape sequence '\\{other}'")),
            None => return Err("unexpected end of input in escape sequence".to_string()),
        }
    }
    Ok(out)
}

/// Read exactly `count` hex digits and convert them to a `char`.
fn take_codepoint(chars: &mut std::str::Chars<'_>, count: usize) -> Result<char, String> {
    let mut value: u32 = 0;
    for _ in 0..count {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| format!("escape sequence requires {count} hex digits"))?;
        value = (value << 4) | digit;
    }
    char::from_u32(value).ok_or_else(|| format!("invalid Unicode codepoint U+{value:04X}"))
}
