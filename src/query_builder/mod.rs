use crate::dialect::Dialect;
use crate::error::TableSetError;
use crate::translation::translate_placeholders;
use crate::types::RowValues;

mod dml;
mod select;

/// One user-supplied clause fragment and the arguments for its `?` markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub expr: String,
    pub args: Vec<RowValues>,
}

impl Clause {
    #[must_use]
    pub fn new(expr: impl Into<String>, args: Vec<RowValues>) -> Self {
        Self {
            expr: expr.into(),
            args,
        }
    }
}

/// SQL text ready for a backend plus its parameters in binding order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedQuery {
    pub sql: String,
    pub params: Vec<RowValues>,
}

/// Clause state accumulated by a table accessor.
///
/// Expressions are stored verbatim and only rewritten for the target dialect
/// when a statement is rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    table: String,
    selects: Vec<Clause>,
    filters: Vec<Clause>,
    orders: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Statement {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn set_table(&mut self, table: impl Into<String>) {
        self.table = table.into();
    }

    #[must_use]
    pub fn selects(&self) -> &[Clause] {
        &self.selects
    }

    #[must_use]
    pub fn filters(&self) -> &[Clause] {
        &self.filters
    }

    #[must_use]
    pub fn orders(&self) -> &[String] {
        &self.orders
    }

    #[must_use]
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn push_select(&mut self, clause: Clause) {
        self.selects.push(clause);
    }

    pub fn push_filter(&mut self, clause: Clause) {
        self.filters.push(clause);
    }

    pub fn push_order(&mut self, expr: impl Into<String>) {
        self.orders.push(expr.into());
    }

    pub fn set_limit(&mut self, limit: Option<u64>) {
        self.limit = limit;
    }

    pub fn set_offset(&mut self, offset: Option<u64>) {
        self.offset = offset;
    }

    fn quoted_table(&self, dialect: Dialect) -> Result<String, TableSetError> {
        if self.table.trim().is_empty() {
            return Err(TableSetError::ConfigError("table name is not set".to_string()));
        }
        Ok(dialect.quote_identifier(&self.table))
    }

    /// Append ` WHERE ...` for `leading` conditions followed by the accumulated filters.
    ///
    /// `leading` conditions are already rendered and their parameters already
    /// pushed. Filters are parenthesized when more than one condition is joined.
    fn push_where(
        &self,
        dialect: Dialect,
        leading: Vec<String>,
        sql: &mut String,
        params: &mut Vec<RowValues>,
    ) {
        let mut conditions = leading;
        for clause in &self.filters {
            conditions.push(render_fragment(dialect, clause, params));
        }
        if conditions.is_empty() {
            return;
        }
        sql.push_str(" WHERE ");
        if conditions.len() == 1 {
            sql.push_str(&conditions[0]);
        } else {
            let joined = conditions
                .iter()
                .map(|c| format!("({c})"))
                .collect::<Vec<_>>()
                .join(" AND ");
            sql.push_str(&joined);
        }
    }
}

/// Translate one fragment for `dialect`, numbering its placeholders after
/// the parameters already collected, and collect its arguments.
fn render_fragment(dialect: Dialect, clause: &Clause, params: &mut Vec<RowValues>) -> String {
    let sql = translate_placeholders(&clause.expr, dialect.placeholder_style(), params.len())
        .into_owned();
    params.extend(clause.args.iter().cloned());
    sql
}

/// `count` placeholders numbered after `offset` existing parameters.
fn placeholders(dialect: Dialect, count: usize, offset: usize) -> Vec<String> {
    (0..count)
        .map(|i| translate_placeholders("?", dialect.placeholder_style(), offset + i).into_owned())
        .collect()
}
