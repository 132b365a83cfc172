use serde::Serialize;

/// One page of records plus the number of rows matching the filters overall.
///
/// Serializes as `{ "items": [...], "total_count": n }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageList<T> {
    pub items: Vec<T>,
    pub total_count: i64,
}

impl<T> PageList<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total_count: i64) -> Self {
        Self { items, total_count }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pages of `page_size` needed for `total_count` rows.
    #[must_use]
    pub fn page_count(&self, page_size: u64) -> u64 {
        if page_size == 0 {
            return 0;
        }
        u64::try_from(self.total_count).unwrap_or(0).div_ceil(page_size)
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Row offset of the 1-based `page_index`; page 0 reads as page 1.
#[must_use]
pub fn page_offset(page_size: u64, page_index: u64) -> u64 {
    page_index.saturating_sub(1).saturating_mul(page_size)
}
