use std::borrow::Cow;
use std::fmt::Write;

mod scanner;

use scanner::{State, closes_dollar_quote, dollar_quote_tag, scan_number, starts_with_at};

/// Target placeholder style for translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
    /// SQLite-style placeholders like `?1`.
    Sqlite,
    /// SQL Server (tiberius) placeholders like `@P1`.
    Mssql,
    /// `MySQL` positional placeholders: a bare `?`.
    Mysql,
}

impl PlaceholderStyle {
    fn write(self, out: &mut String, index: usize) {
        // writing into a String cannot fail
        let _ = match self {
            PlaceholderStyle::Postgres => write!(out, "${index}"),
            PlaceholderStyle::Sqlite => write!(out, "?{index}"),
            PlaceholderStyle::Mssql => write!(out, "@P{index}"),
            PlaceholderStyle::Mysql => write!(out, "?"),
        };
    }
}

/// Rewrite the placeholders of one clause fragment into `target` style.
///
/// Fragments use `?` for positional parameters. `?N` and `$N` are accepted as
/// explicit positions within the fragment. `offset` is the number of parameters
/// bound before this fragment, so fragments can be concatenated into one
/// statement: the first `?` of a fragment with `offset = 2` becomes `$3`.
/// `MySQL` has no numbered form, so explicit positions must appear in order there.
///
/// Placeholders inside quoted strings, bracketed identifiers, comments and
/// dollar-quoted blocks are left alone. A borrowed `Cow` is returned when
/// nothing changes.
///
/// ```rust
/// use sql_tableset::translation::{PlaceholderStyle, translate_placeholders};
///
/// let sql = translate_placeholders("age > ? and name = ?", PlaceholderStyle::Postgres, 1);
/// assert_eq!(sql, "age > $2 and name = $3");
/// ```
#[must_use]
pub fn translate_placeholders(sql: &str, target: PlaceholderStyle, offset: usize) -> Cow<'_, str> {
    let bytes = sql.as_bytes();
    let mut out: Option<String> = None;
    let mut state = State::Normal;
    let mut ordinal = 0usize;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        let mut replaced_until = None;
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'[' if target == PlaceholderStyle::Mssql => state = State::Bracketed,
                _ if starts_with_at(bytes, idx, b"--") => state = State::LineComment,
                _ if starts_with_at(bytes, idx, b"/*") => state = State::BlockComment(1),
                b'?' => {
                    replaced_until = Some(match scan_number(bytes, idx + 1) {
                        Some((end, n)) => (end, n.and_then(|n| offset.checked_add(n))),
                        None => {
                            ordinal += 1;
                            (idx + 1, offset.checked_add(ordinal))
                        }
                    });
                }
                b'$' => {
                    if let Some((tag, close)) = dollar_quote_tag(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        if let Some(buf) = out.as_mut() {
                            buf.push_str(&sql[idx..=close]);
                        }
                        idx = close + 1;
                        continue;
                    } else if let Some((end, n)) = scan_number(bytes, idx + 1) {
                        replaced_until = Some((end, n.and_then(|n| offset.checked_add(n))));
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        if let Some(buf) = out.as_mut() {
                            buf.push('\'');
                        }
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        if let Some(buf) = out.as_mut() {
                            buf.push('"');
                        }
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::Bracketed => {
                if b == b']' {
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if starts_with_at(bytes, idx, b"/*") {
                    state = State::BlockComment(depth + 1);
                } else if starts_with_at(bytes, idx, b"*/") {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                }
            }
            State::DollarQuoted(ref tag) => {
                if closes_dollar_quote(bytes, idx, tag) {
                    let end = idx + tag.len() + 2;
                    if let Some(buf) = out.as_mut() {
                        buf.push_str(&sql[idx..end]);
                    }
                    state = State::Normal;
                    idx = end;
                    continue;
                }
            }
        }

        if let Some((end, index)) = replaced_until {
            match index {
                Some(index) => {
                    let buf = out.get_or_insert_with(|| sql[..idx].to_string());
                    target.write(buf, index);
                }
                // position out of range: leave it for the driver to reject
                None => {
                    if let Some(buf) = out.as_mut() {
                        buf.push_str(&sql[idx..end]);
                    }
                }
            }
            idx = end;
            continue;
        }

        let ch_len = utf8_len(b);
        if let Some(buf) = out.as_mut() {
            buf.push_str(&sql[idx..idx + ch_len]);
        }
        idx += ch_len;
    }

    match out {
        Some(buf) => Cow::Owned(buf),
        None => Cow::Borrowed(sql),
    }
}

fn utf8_len(first: u8) -> usize {
    match first {
        0xF0..=0xFF => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}
