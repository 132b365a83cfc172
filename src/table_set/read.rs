use super::{TableSet, log_statement};
use crate::error::TableSetError;
use crate::page::{PageList, page_offset};
use crate::query_builder::Statement;
use crate::record::{FromRowValue, Record};
use crate::results::ResultSet;

impl<T: Record> TableSet<T> {
    async fn fetch(&mut self, statement: &Statement) -> Result<ResultSet, TableSetError> {
        let (dialect, mut conn) = self.connection().await?;
        let rendered = statement.render_select(dialect)?;
        log_statement("select", &rendered);
        conn.select(&rendered.sql, &rendered.params).await
    }

    fn records(result_set: &ResultSet) -> Result<Vec<T>, TableSetError> {
        result_set.results.iter().map(T::from_row).collect()
    }

    /// Every record matching the accumulated clauses.
    ///
    /// # Errors
    /// Returns open, execution and row conversion errors.
    pub async fn to_list(&mut self) -> Result<Vec<T>, TableSetError> {
        let statement = self.statement.clone();
        let result_set = self.fetch(&statement).await?;
        Self::records(&result_set)
    }

    /// One page of matching records plus the total match count.
    ///
    /// `page_index` is 1-based; 0 reads as the first page. The page and the
    /// count are two separate statements.
    ///
    /// # Errors
    /// Returns open, execution and row conversion errors.
    pub async fn to_page_list(
        &mut self,
        page_size: u64,
        page_index: u64,
    ) -> Result<PageList<T>, TableSetError> {
        let items = if page_size == 0 {
            Vec::new()
        } else {
            let mut page = self.statement.clone();
            page.set_limit(Some(page_size));
            page.set_offset(Some(page_offset(page_size, page_index)));
            let result_set = self.fetch(&page).await?;
            Self::records(&result_set)?
        };
        let total_count = self.count().await?;
        Ok(PageList::new(items, total_count))
    }

    /// The first matching record, if any.
    ///
    /// Without an order clause the backend decides which row is first.
    ///
    /// # Errors
    /// Returns open, execution and row conversion errors.
    pub async fn to_entity(&mut self) -> Result<Option<T>, TableSetError> {
        let mut first = self.statement.clone();
        first.set_limit(Some(1));
        let result_set = self.fetch(&first).await?;
        result_set.results.first().map(T::from_row).transpose()
    }

    /// Number of rows matching the accumulated filters.
    ///
    /// # Errors
    /// Returns open and execution errors.
    pub async fn count(&mut self) -> Result<i64, TableSetError> {
        let (dialect, mut conn) = self.connection().await?;
        let rendered = self.statement.render_count(dialect)?;
        log_statement("count", &rendered);
        let result_set = conn.select(&rendered.sql, &rendered.params).await?;
        result_set
            .first_value()
            .map_or(Ok(0), i64::from_row_value)
    }

    /// Whether any row matches the accumulated filters.
    ///
    /// # Errors
    /// Returns open and execution errors.
    pub async fn is_exists(&mut self) -> Result<bool, TableSetError> {
        Ok(self.count().await? > 0)
    }
}
