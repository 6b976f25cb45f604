//! RTF text escaping.

use crate::error::{Error, Result};

/// Escape the RTF metacharacters `\`, `{` and `}`.
///
/// Everything else, newlines included, is passed through; callers emit
/// `\line` and `\par` themselves.
pub fn escape_rtf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

/// Append `text` to `out`, escaped.
pub fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '\\' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
}

/// Rewrite characters outside the Basic Multilingual Plane as `\uN?` pairs.
pub fn encode_surrogates(text: &str) -> Result<String> {
    let units: Vec<u16> = text.encode_utf16().collect();
    encode_surrogate_units(&units)
}

/// Rewrite every UTF-16 surrogate pair in `units` as two signed `\uN?`
/// tokens.
///
/// A low surrogate with nothing before it is malformed input and fails the
/// whole conversion. Other unpaired surrogates become a single token.
pub fn encode_surrogate_units(units: &[u16]) -> Result<String> {
    if units.first().is_some_and(|u| is_low_surrogate(*u)) {
        return Err(Error::UnpairedSurrogate { position: 0 });
    }

    let mut out = String::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        if is_high_surrogate(unit) && units.get(i + 1).is_some_and(|u| is_low_surrogate(*u)) {
            push_unicode_token(&mut out, unit);
            push_unicode_token(&mut out, units[i + 1]);
            i += 2;
            continue;
        }
        match char::from_u32(u32::from(unit)) {
            Some(c) => out.push(c),
            None => push_unicode_token(&mut out, unit),
        }
        i += 1;
    }
    Ok(out)
}

fn push_unicode_token(out: &mut String, unit: u16) {
    // RTF reads \u as a signed 16-bit value
    out.push_str(&format!("\\u{}?", unit as i16));
}

pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}
