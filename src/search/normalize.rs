//! Normalization of search keys, queries, display names and scopes.
//!
//! Generators escape every non-alphanumeric byte of a key as `_xx` (lowercase hex) and
//! append a `_NNNN` serial to keep keys unique, so `ObjectArena< void * >` becomes
//! `objectarena_3c_20void_20_2a_20_3e_6336`. Display names arrive HTML-escaped.

use std::borrow::Cow;

/// A generator key split into its searchable text and serial number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedKey {
    /// Lowercase, unescaped key text
    pub key: String,
    /// Trailing `_NNNN` serial, if the key carried one
    pub serial: Option<u32>,
}

/// Normalizes user input the same way keys are normalized: trimmed and lowercased.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Decodes a generator key.
///
/// Invalid escape runs are kept verbatim, so plain keys such as `vec` pass through
/// unchanged apart from lowercasing.
pub fn decode_key(raw: &str) -> DecodedKey {
    let (stem, serial) = match raw.rsplit_once('_') {
        Some((stem, digits)) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            match digits.parse() {
                Ok(serial) => (stem, Some(serial)),
                Err(_) => (raw, None),
            }
        }
        _ => (raw, None),
    };

    let key = unescape_key(stem).map_or_else(
        || stem.trim().to_lowercase(),
        |s| s.trim().to_lowercase(),
    );
    DecodedKey { key, serial }
}

/// Replaces `_xx` escapes with the bytes they encode. Returns `None` when the decoded
/// bytes are not valid UTF-8.
fn unescape_key(stem: &str) -> Option<String> {
    if !stem.contains('_') {
        return Some(stem.to_string());
    }

    let bytes = stem.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'_'
            && let Some(pair) = bytes.get(i + 1..i + 3)
            && let (Some(high), Some(low)) = (lower_hex(pair[0]), lower_hex(pair[1]))
        {
            out.push((high << 4) | low);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out).ok()
}

const fn lower_hex(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

/// Decodes the HTML character references generators use in display names.
///
/// Unknown references are left as written.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];

        let decoded = candidate
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| entity_char(&candidate[1..end]).map(|c| (c, end)));

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

fn entity_char(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Splits a scope label into its nesting path.
///
/// C++ scopes use `::`; Java and Python scopes written by the same generators use `.`.
pub fn split_scope(label: &str) -> Vec<String> {
    let separator = if label.contains("::") { "::" } else { "." };
    label
        .split(separator)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect()
}
