use std::error::Error;

use chrono::{NaiveDate, NaiveDateTime};
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_util::bytes;

use crate::types::RowValues;

/// Borrowed Postgres parameter list.
pub struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    #[must_use]
    pub fn convert(params: &'a [RowValues]) -> Params<'a> {
        let mut references = Vec::with_capacity(params.len());
        for p in params {
            references.push(p as &(dyn ToSql + Sync));
        }
        Params { references }
    }

    #[must_use]
    pub fn as_refs(&self) -> &[&(dyn ToSql + Sync)] {
        &self.references
    }
}

impl ToSql for RowValues {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut bytes::BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            // narrow to the width of the bound column
            RowValues::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                Type::FLOAT4 => (*i as f32).to_sql(ty, out),
                Type::FLOAT8 => (*i as f64).to_sql(ty, out),
                Type::BOOL => (*i != 0).to_sql(ty, out),
                _ => (*i).to_sql(ty, out),
            },
            RowValues::Float(f) => match *ty {
                Type::FLOAT4 => (*f as f32).to_sql(ty, out),
                _ => (*f).to_sql(ty, out),
            },
            RowValues::Text(s) => match *ty {
                Type::UUID => uuid::Uuid::parse_str(s)?.to_sql(ty, out),
                Type::DATE | Type::TIMESTAMP | Type::TIMESTAMPTZ => {
                    let parsed = self
                        .as_timestamp()
                        .or_else(|| {
                            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                                .ok()
                                .map(NaiveDateTime::from)
                        })
                        .ok_or_else(|| format!("cannot bind {s:?} as {ty}"))?;
                    RowValues::Timestamp(parsed).to_sql(ty, out)
                }
                _ => s.to_sql(ty, out),
            },
            RowValues::Bool(b) => (*b).to_sql(ty, out),
            RowValues::Timestamp(dt) => match *ty {
                Type::TIMESTAMPTZ => dt.and_utc().to_sql(ty, out),
                Type::DATE => dt.date().to_sql(ty, out),
                _ => dt.to_sql(ty, out),
            },
            RowValues::Null => Ok(IsNull::Yes),
            RowValues::JSON(jsval) => jsval.to_sql(ty, out),
            RowValues::Blob(bytes) => bytes.to_sql(ty, out),
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::NAME
                | Type::UNKNOWN
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::DATE
                | Type::UUID
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}
