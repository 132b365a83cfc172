//! Decoding for column types with no direct `RowValues` counterpart.

use std::error::Error;
use std::fmt::Write;

use tokio_postgres::types::{FromSql, Kind, Type};

use crate::types::RowValues;

type DecodeError = Box<dyn Error + Sync + Send>;

/// A `numeric` value rendered as decimal text, so no precision is lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgNumeric(pub String);

impl<'a> FromSql<'a> for PgNumeric {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, DecodeError> {
        decode_numeric(raw).map(PgNumeric)
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::NUMERIC
    }
}

/// The binary payload of any other column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgRaw(pub Vec<u8>);

impl<'a> FromSql<'a> for PgRaw {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, DecodeError> {
        Ok(PgRaw(raw.to_vec()))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}

impl PgRaw {
    /// Text-like types and enums travel as UTF-8; everything else stays bytes.
    #[must_use]
    pub fn into_value(self, ty: &Type) -> RowValues {
        let textual = <String as FromSql>::accepts(ty)
            || *ty == Type::XML
            || matches!(ty.kind(), Kind::Enum(_));
        if !textual {
            return RowValues::Blob(self.0);
        }
        match String::from_utf8(self.0) {
            Ok(text) => RowValues::Text(text),
            Err(e) => RowValues::Blob(e.into_bytes()),
        }
    }
}

const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

fn read_u16(raw: &[u8], at: usize) -> Result<u16, DecodeError> {
    raw.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| "truncated numeric value".into())
}

/// Decode the binary `numeric` layout: digit count, weight, sign and display
/// scale, followed by base-10000 digits.
///
/// # Errors
/// Returns an error if the payload is shorter than its header claims.
pub fn decode_numeric(raw: &[u8]) -> Result<String, DecodeError> {
    let ndigits = usize::from(read_u16(raw, 0)?);
    #[allow(clippy::cast_possible_wrap)]
    let weight = i32::from(read_u16(raw, 2)? as i16);
    let sign = read_u16(raw, 4)?;
    let dscale = usize::from(read_u16(raw, 6)?);
    match sign {
        NUMERIC_NAN => return Ok("NaN".to_string()),
        NUMERIC_PINF => return Ok("Infinity".to_string()),
        NUMERIC_NINF => return Ok("-Infinity".to_string()),
        _ => {}
    }
    let digits = (0..ndigits)
        .map(|i| read_u16(raw, 8 + 2 * i))
        .collect::<Result<Vec<_>, _>>()?;
    let digit_at = |pos: i32| {
        usize::try_from(pos)
            .ok()
            .and_then(|p| digits.get(p).copied())
            .unwrap_or(0)
    };

    // writing into a String cannot fail
    let mut out = String::new();
    if sign == NUMERIC_NEG {
        out.push('-');
    }
    if weight < 0 {
        out.push('0');
    } else {
        for pos in 0..=weight {
            let _ = if pos == 0 {
                write!(out, "{}", digit_at(pos))
            } else {
                write!(out, "{:04}", digit_at(pos))
            };
        }
    }
    if dscale > 0 {
        let mut fraction = String::with_capacity(dscale + 4);
        let mut pos = weight + 1;
        while fraction.len() < dscale {
            let _ = write!(fraction, "{:04}", digit_at(pos));
            pos += 1;
        }
        fraction.truncate(dscale);
        out.push('.');
        out.push_str(&fraction);
    }
    Ok(out)
}
