//! Offset-based pagination primitives.
//!
//! A `PageRequest` is constructed per request and validated before any store
//! access. `Page<T>` carries one bounded slice of a result set together with
//! the total number of matching records, which never depends on the window.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Pagination parameters for list queries.
///
/// Fields are signed so that out-of-range input coming from a boundary layer
/// can be represented and rejected here instead of being silently wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Offset into the full result set (0-based).
    pub offset: i64,
    /// Maximum number of records to return.
    pub limit: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
        }
    }
}

impl PageRequest {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }

    /// `offset >= 0 && limit > 0`.
    pub fn is_valid(&self) -> bool {
        self.offset >= 0 && self.limit > 0
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "invalid pagination parameters (offset={}, limit={})",
                self.offset, self.limit
            )))
        }
    }

    /// Index range of this window over a result set of `len` records.
    ///
    /// Returns an empty range when the offset lies past the end. Callers must
    /// validate first; negative values are treated as zero.
    pub fn window(&self, len: usize) -> core::ops::Range<usize> {
        let start = usize::try_from(self.offset.max(0)).unwrap_or(usize::MAX).min(len);
        let take = usize::try_from(self.limit.max(0)).unwrap_or(usize::MAX);
        start..start.saturating_add(take).min(len)
    }
}

/// One page of a filtered result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of records matching the filters, before pagination.
    pub total: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    pub fn empty(total: u64) -> Self {
        Self {
            items: Vec::new(),
            total,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_first_ten() {
        let page = PageRequest::default();
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, 10);
        assert!(page.is_valid());
    }

    #[test]
    fn negative_offset_is_rejected() {
        let DomainError::Validation(msg) = PageRequest::new(-1, 10).validate().unwrap_err();
        assert!(msg.contains("offset=-1"));
    }

    #[test]
    fn non_positive_limit_is_rejected() {
        assert!(PageRequest::new(0, 0).validate().is_err());
        assert!(PageRequest::new(0, -5).validate().is_err());
    }

    #[test]
    fn window_past_end_is_empty() {
        let range = PageRequest::new(5, 10).window(2);
        assert!(range.is_empty());
    }

    #[test]
    fn window_is_truncated_at_end() {
        assert_eq!(PageRequest::new(2, 3).window(4), 2..4);
        assert_eq!(PageRequest::new(0, 3).window(10), 0..3);
    }

    #[test]
    fn page_map_keeps_total() {
        let page = Page::new(vec![1, 2, 3], 7).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20, 30]);
        assert_eq!(page.total, 7);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a window never exceeds the limit nor the underlying length.
            #[test]
            fn window_is_bounded(offset in 0i64..500, limit in 1i64..200, len in 0usize..300) {
                let range = PageRequest::new(offset, limit).window(len);
                prop_assert!(range.len() as i64 <= limit);
                prop_assert!(range.end <= len);
                prop_assert!(range.start <= range.end);
            }

            /// Property: validity is exactly `offset >= 0 && limit > 0`.
            #[test]
            fn validity_matches_rule(offset in -100i64..100, limit in -100i64..100) {
                let page = PageRequest::new(offset, limit);
                prop_assert_eq!(page.validate().is_ok(), offset >= 0 && limit > 0);
            }
        }
    }
}
