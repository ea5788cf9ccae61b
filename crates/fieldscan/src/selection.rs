//! Page selections resolved against a document's page count.

use fieldscan_core::ScanError;

/// A set of 0-based page ranges chosen before the document is open.
///
/// Ranges are stored as given and only expanded by [`resolve`](Self::resolve),
/// after they have been checked against the real page count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSelection {
    ranges: Vec<(usize, usize)>,
}

impl PageSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the inclusive range `first..=last`. Bounds given in reverse are
    /// swapped.
    pub fn push_range(&mut self, first: usize, last: usize) {
        self.ranges.push((first.min(last), first.max(last)));
    }

    pub fn push_page(&mut self, page: usize) {
        self.push_range(page, page);
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Sorted, deduplicated page indices of a document with `page_count`
    /// pages.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidOptions`] naming the first 1-based page
    /// past the end of the document.
    pub fn resolve(&self, page_count: usize) -> Result<Vec<usize>, ScanError> {
        if let Some(bad) = self
            .ranges
            .iter()
            .filter(|&&(_, last)| last >= page_count)
            .map(|&(first, _)| first.max(page_count))
            .min()
        {
            return Err(ScanError::InvalidOptions(format!(
                "page {} out of range (document has {page_count} pages)",
                bad.saturating_add(1)
            )));
        }
        let mut pages: Vec<usize> = self
            .ranges
            .iter()
            .flat_map(|&(first, last)| first..=last)
            .collect();
        pages.sort_unstable();
        pages.dedup();
        Ok(pages)
    }
}

impl FromIterator<usize> for PageSelection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut selection = Self::new();
        for page in iter {
            selection.push_page(page);
        }
        selection
    }
}
