use tiberius::Query;

use crate::types::RowValues;

/// Bind parameters onto a tiberius query, in order, as `@P1..@Pn`.
///
/// The query owns the bound data, so the values are cloned.
#[must_use]
pub fn bind_query_params<'a>(query: &'a str, params: &[RowValues]) -> Query<'a> {
    let mut query_builder = Query::new(query);

    for param in params {
        match param {
            RowValues::Int(i) => query_builder.bind(*i),
            RowValues::Float(f) => query_builder.bind(*f),
            RowValues::Text(s) => query_builder.bind(s.clone()),
            RowValues::Bool(b) => query_builder.bind(*b),
            RowValues::Timestamp(dt) => query_builder.bind(*dt),
            RowValues::Null => query_builder.bind(Option::<String>::None),
            RowValues::JSON(json) => query_builder.bind(json.to_string()),
            RowValues::Blob(bytes) => query_builder.bind(bytes.clone()),
        }
    }

    query_builder
}
