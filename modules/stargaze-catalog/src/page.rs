use crate::error::PageError;

pub const DEFAULT_PAGE_SIZE: usize = 6;

/// One window of a result list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub index: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Fixed-size pagination over a result slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Paginator {
    pub fn new(page_size: usize) -> Result<Self, PageError> {
        if page_size == 0 {
            return Err(PageError::ZeroPageSize);
        }
        Ok(Self { page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size)
    }

    /// Page `index` of `items`. Index 0 is always valid; any other index
    /// past the last page is rejected.
    pub fn paginate<'a, T>(&self, items: &'a [T], index: usize) -> Result<Page<'a, T>, PageError> {
        let total_pages = self.total_pages(items.len());
        if index > 0 && index >= total_pages {
            return Err(PageError::OutOfRange { index, total_pages });
        }

        let start = index * self.page_size;
        let end = (start + self.page_size).min(items.len());
        Ok(Page {
            items: &items[start..end],
            index,
            total_pages,
            total_items: items.len(),
            has_previous: index > 0,
            has_next: end < items.len(),
        })
    }

    /// Like [`Paginator::paginate`], but an index past the end yields the
    /// last page.
    pub fn clamp<'a, T>(&self, items: &'a [T], index: usize) -> Page<'a, T> {
        let last = self.total_pages(items.len()).saturating_sub(1);
        let index = index.min(last);
        let start = index * self.page_size;
        let end = (start + self.page_size).min(items.len());
        Page {
            items: &items[start..end],
            index,
            total_pages: self.total_pages(items.len()),
            total_items: items.len(),
            has_previous: index > 0,
            has_next: end < items.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourteen_items_in_pages_of_six() {
        let items: Vec<usize> = (0..14).collect();
        let p = Paginator::new(6).unwrap();
        assert_eq!(p.total_pages(items.len()), 3);

        let first = p.paginate(&items, 0).unwrap();
        assert_eq!(first.items, &[0, 1, 2, 3, 4, 5]);
        assert!(!first.has_previous);
        assert!(first.has_next);

        let last = p.paginate(&items, 2).unwrap();
        assert_eq!(last.items, &[12, 13]);
        assert!(last.has_previous);
        assert!(!last.has_next);

        assert_eq!(
            p.paginate(&items, 3).unwrap_err(),
            PageError::OutOfRange {
                index: 3,
                total_pages: 3
            }
        );
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_page() {
        let items: Vec<usize> = (0..12).collect();
        let p = Paginator::new(6).unwrap();
        let second = p.paginate(&items, 1).unwrap();
        assert_eq!(second.items.len(), 6);
        assert!(!second.has_next);
        assert!(p.paginate(&items, 2).is_err());
    }

    #[test]
    fn empty_result_has_a_single_empty_page_zero() {
        let items: Vec<usize> = Vec::new();
        let page = Paginator::default().paginate(&items, 0).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_previous && !page.has_next);
    }

    #[test]
    fn clamp_returns_last_page() {
        let items: Vec<usize> = (0..14).collect();
        let page = Paginator::new(6).unwrap().clamp(&items, 99);
        assert_eq!(page.index, 2);
        assert_eq!(page.items, &[12, 13]);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert_eq!(Paginator::new(0).unwrap_err(), PageError::ZeroPageSize);
    }
}
