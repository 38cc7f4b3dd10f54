//! Offset pagination over an ordered result.

use serde::{Deserialize, Serialize};

/// Slice of an ordered result to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageRequest {
    /// Number of leading items to skip
    #[serde(default)]
    pub offset: usize,
    /// Maximum number of items to return; `None` returns the remainder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl PageRequest {
    /// Everything, unpaged.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    /// 1-based page number of `size` items. Page `0` is treated as page `1`.
    pub fn page(number: usize, size: usize) -> Self {
        Self::new(number.saturating_sub(1) * size, size)
    }

    /// Apply this request to `items`, returning the slice and its metadata.
    pub fn apply<T>(&self, items: Vec<T>) -> (Vec<T>, Page) {
        let total_items = items.len();
        let page: Vec<T> = items
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();

        let meta = Page {
            total_items,
            offset: self.offset,
            limit: self.limit,
            returned: page.len(),
        };
        (page, meta)
    }
}

/// Metadata describing a returned page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Page {
    /// Items available before slicing
    pub total_items: usize,
    pub offset: usize,
    pub limit: Option<usize>,
    /// Items actually returned
    pub returned: usize,
}

impl Page {
    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(self.returned) < self.total_items
    }

    pub fn has_previous(&self) -> bool {
        self.offset > 0 && self.total_items > 0
    }

    /// 1-based page number.
    pub fn number(&self) -> usize {
        match self.limit {
            Some(limit) if limit > 0 => self.offset / limit + 1,
            _ => 1,
        }
    }

    pub fn total_pages(&self) -> usize {
        match self.limit {
            Some(limit) if limit > 0 => self.total_items.div_ceil(limit),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_numbers() {
        assert_eq!(PageRequest::page(1, 100), PageRequest::new(0, 100));
        assert_eq!(PageRequest::page(3, 25), PageRequest::new(50, 25));
        assert_eq!(PageRequest::page(0, 25), PageRequest::new(0, 25));
    }

    #[test]
    fn test_apply_middle_page() {
        let (items, page) = PageRequest::page(2, 3).apply((0..8).collect());
        assert_eq!(items, vec![3, 4, 5]);
        assert_eq!(page.total_items, 8);
        assert_eq!(page.returned, 3);
        assert_eq!(page.number(), 2);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_apply_last_and_past_end() {
        let (items, page) = PageRequest::page(3, 3).apply((0..8).collect());
        assert_eq!(items, vec![6, 7]);
        assert!(!page.has_next());

        let (items, page) = PageRequest::new(20, 5).apply((0..8).collect::<Vec<_>>());
        assert!(items.is_empty());
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_unpaged() {
        let (items, page) = PageRequest::all().apply(vec!['a', 'b']);
        assert_eq!(items, vec!['a', 'b']);
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }
}
