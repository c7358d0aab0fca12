//! Enumeration position over a catalog that shrinks while it is read.

/// Where the next `Browse` page starts.
///
/// Every object deleted after being yielded shifts the remaining objects one
/// position left, so requests start at `next_request_offset - deleted_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationCursor {
    next_request_offset: u32,
    deleted_count: u32,
    total_items_hint: Option<u32>,
}

impl EnumerationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of `NumberReturned` over all pages so far.
    pub fn next_request_offset(&self) -> u32 {
        self.next_request_offset
    }

    pub fn deleted_count(&self) -> u32 {
        self.deleted_count
    }

    /// `TotalMatches` from the first page, if one was received.
    pub fn total_items_hint(&self) -> Option<u32> {
        self.total_items_hint
    }

    /// Offset to request next, corrected for deletions.
    pub fn effective_offset(&self) -> u32 {
        self.next_request_offset.saturating_sub(self.deleted_count)
    }

    pub fn is_first_page(&self) -> bool {
        self.next_request_offset == 0 && self.total_items_hint.is_none()
    }

    pub(crate) fn record_total(&mut self, total: u32) {
        if self.total_items_hint.is_none() {
            self.total_items_hint = Some(total);
        }
    }

    pub(crate) fn advance(&mut self, number_returned: u32) {
        self.next_request_offset = self.next_request_offset.saturating_add(number_returned);
    }

    pub(crate) fn record_deleted(&mut self) {
        self.deleted_count = self.deleted_count.saturating_add(1);
    }
}
