//! Fixed-size pagination over ordered collections.
//!
//! Pages are 1-indexed. A page past the end is not an error: it comes back
//! with no items and the usual metadata.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: NonZeroU64 = match NonZeroU64::new(10) {
    Some(size) => size,
    None => unreachable!(),
};

/// A requested page number, always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageNumber(u64);

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(1);

    /// Zero is lifted to the first page.
    pub fn new(number: u64) -> Self {
        Self(number.max(1))
    }

    /// Parse a raw `?page=` value. Absent, malformed, zero and negative
    /// values all mean the first page.
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .map(|n| Self(n as u64))
            .unwrap_or(Self::FIRST)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl From<Option<u64>> for PageNumber {
    fn from(number: Option<u64>) -> Self {
        number.map(Self::new).unwrap_or(Self::FIRST)
    }
}

/// Offset/limit pair for storage-side slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

/// A bounded slice of an ordered collection plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert the items while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Slices ordered collections into pages of a configured size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: NonZeroU64,
}

impl Paginator {
    pub fn new(page_size: NonZeroU64) -> Self {
        Self { page_size }
    }

    pub fn page_size(&self) -> u64 {
        self.page_size.get()
    }

    /// Storage window for the given page.
    pub fn window(&self, page: PageNumber) -> PageWindow {
        PageWindow {
            offset: (page.get() - 1).saturating_mul(self.page_size()),
            limit: self.page_size(),
        }
    }

    /// Number of pages for a collection; an empty collection still has one.
    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.page_size()).max(1)
    }

    /// Build a page from items already sliced by storage.
    pub fn assemble<T>(&self, page: PageNumber, items: Vec<T>, total_items: u64) -> Page<T> {
        Page {
            items,
            number: page.get(),
            page_size: self.page_size(),
            total_items,
            total_pages: self.total_pages(total_items),
        }
    }

    /// Slice an in-memory ordered sequence.
    pub fn paginate<T: Clone>(&self, items: &[T], page: PageNumber) -> Page<T> {
        let window = self.window(page);
        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);

        let slice = items.iter().skip(offset).take(limit).cloned().collect();

        self.assemble(page, slice, items.len() as u64)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn test_thirteen_items_split_ten_three_zero() {
        let paginator = Paginator::default();
        let items = items(13);

        let first = paginator.paginate(&items, PageNumber::new(1));
        let second = paginator.paginate(&items, PageNumber::new(2));
        let third = paginator.paginate(&items, PageNumber::new(3));

        assert_eq!(first.len(), 10);
        assert_eq!(second.items, vec![11, 12, 13]);
        assert!(third.is_empty());
        assert_eq!(third.total_pages, 2);
        assert_eq!(third.total_items, 13);
    }

    #[test]
    fn test_navigation_flags() {
        let paginator = Paginator::default();
        let items = items(13);

        let first = paginator.paginate(&items, PageNumber::FIRST);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let last = paginator.paginate(&items, PageNumber::new(2));
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let page = Paginator::default().paginate::<u32>(&[], PageNumber::FIRST);

        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
    }

    #[test]
    fn test_paginate_is_idempotent() {
        let paginator = Paginator::new(NonZeroU64::new(4).unwrap());
        let items = items(11);

        let a = paginator.paginate(&items, PageNumber::new(2));
        let b = paginator.paginate(&items, PageNumber::new(2));

        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_page_number() {
        assert_eq!(PageNumber::parse(None), PageNumber::FIRST);
        assert_eq!(PageNumber::parse(Some("")), PageNumber::FIRST);
        assert_eq!(PageNumber::parse(Some("abc")), PageNumber::FIRST);
        assert_eq!(PageNumber::parse(Some("0")), PageNumber::FIRST);
        assert_eq!(PageNumber::parse(Some("-3")), PageNumber::FIRST);
        assert_eq!(PageNumber::parse(Some("2")).get(), 2);
        assert_eq!(PageNumber::new(0), PageNumber::FIRST);
    }

    #[test]
    fn test_window_offsets() {
        let paginator = Paginator::default();

        assert_eq!(
            paginator.window(PageNumber::new(3)),
            PageWindow {
                offset: 20,
                limit: 10
            }
        );
    }
}
