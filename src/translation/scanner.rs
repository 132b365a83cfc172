/// Lexical context of the byte currently being scanned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    Bracketed,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

/// Parse the run of ASCII digits starting at `start`.
///
/// Returns the index one past the last digit and the parsed number, which is
/// `None` when the run does not fit in a `usize`. No digits at all yields `None`.
pub(super) fn scan_number(bytes: &[u8], start: usize) -> Option<(usize, Option<usize>)> {
    let end = bytes[start.min(bytes.len())..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |offset| start + offset);
    if end == start {
        return None;
    }
    let number = std::str::from_utf8(&bytes[start..end])
        .ok()
        .and_then(|digits| digits.parse().ok());
    Some((end, number))
}

pub(super) fn starts_with_at(bytes: &[u8], idx: usize, pat: &[u8]) -> bool {
    bytes.get(idx..idx + pat.len()) == Some(pat)
}

/// Recognise a `$tag$` opener at `start`, returning the tag and the index of
/// its closing `$`.
pub(super) fn dollar_quote_tag(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        idx += 1;
    }
    if idx >= bytes.len() {
        return None;
    }
    let tag = &bytes[start + 1..idx];
    // `$1$` is a placeholder followed by a dollar, not a tag
    if tag.first().is_some_and(u8::is_ascii_digit) {
        return None;
    }
    String::from_utf8(tag.to_vec()).ok().map(|tag| (tag, idx))
}

/// True when `$tag$` closes at `idx`.
pub(super) fn closes_dollar_quote(bytes: &[u8], idx: usize, tag: &str) -> bool {
    bytes.get(idx) == Some(&b'$')
        && starts_with_at(bytes, idx + 1, tag.as_bytes())
        && bytes.get(idx + 1 + tag.len()) == Some(&b'$')
}
