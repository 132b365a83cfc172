use chrono::{Datelike, Timelike};
use mysql_async::Value;

use crate::types::RowValues;

/// Convert a single `RowValues` into a `mysql_async` value.
#[must_use]
pub fn row_value_to_mysql_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Int(*i),
        RowValues::Float(f) => Value::Double(*f),
        RowValues::Text(s) => Value::Bytes(s.as_bytes().to_vec()),
        RowValues::Bool(b) => Value::Int(i64::from(*b)),
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        RowValues::Timestamp(dt) => Value::Date(
            u16::try_from(dt.year()).unwrap_or(0),
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.nanosecond() / 1_000,
        ),
        RowValues::Null => Value::NULL,
        RowValues::JSON(json) => Value::Bytes(json.to_string().into_bytes()),
        RowValues::Blob(bytes) => Value::Bytes(bytes.clone()),
    }
}

/// Positional `MySQL` parameters.
#[derive(Debug, Clone, Default)]
pub struct Params(pub Vec<Value>);

impl Params {
    #[must_use]
    pub fn convert(params: &[RowValues]) -> Self {
        Params(params.iter().map(row_value_to_mysql_value).collect())
    }

    /// Parameters in the form `exec` expects; an empty list binds nothing.
    #[must_use]
    pub fn into_params(self) -> mysql_async::Params {
        if self.0.is_empty() {
            mysql_async::Params::Empty
        } else {
            mysql_async::Params::Positional(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn converts_values() {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_micro_opt(7, 8, 9, 10)
            .unwrap();
        let params = Params::convert(&[
            RowValues::Bool(false),
            RowValues::Text("a".into()),
            RowValues::Timestamp(ts),
        ]);
        assert_eq!(
            params.0,
            vec![
                Value::Int(0),
                Value::Bytes(b"a".to_vec()),
                Value::Date(2024, 5, 6, 7, 8, 9, 10),
            ]
        );
    }

    #[test]
    fn empty_binds_nothing() {
        assert!(matches!(
            Params::convert(&[]).into_params(),
            mysql_async::Params::Empty
        ));
    }
}
