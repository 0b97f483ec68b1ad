// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Page buttons rendered at once.
pub const PAGE_WINDOW: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub page: u32,
    pub active: bool,
}

/// Current page (1-indexed) and, when the backend reports it, the page count.
/// Without a count the controller keeps the legacy unbounded behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: u32,
    total_pages: Option<u32>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: None,
        }
    }
}

impl Pagination {
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    pub const fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Moves to `page`, clamped to the valid range. Returns whether the page
    /// changed; only a change warrants a refetch.
    pub fn select(&mut self, page: u32) -> bool {
        let target = self.clamp(page);
        if target == self.current_page {
            return false;
        }
        self.current_page = target;
        true
    }

    pub fn next(&mut self) -> bool {
        self.select(self.current_page.saturating_add(1))
    }

    pub fn prev(&mut self) -> bool {
        self.select(self.current_page.saturating_sub(1))
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        match self.total_pages {
            Some(total) => self.current_page < total.max(1),
            None => true,
        }
    }

    /// Records the page count from a response. Returns true when the current
    /// page fell out of range and was pulled back.
    pub fn set_total_pages(&mut self, total_pages: Option<u32>) -> bool {
        self.total_pages = total_pages;
        let clamped = self.clamp(self.current_page);
        if clamped == self.current_page {
            return false;
        }
        self.current_page = clamped;
        true
    }

    pub fn window(&self) -> Vec<PageButton> {
        let start = ((self.current_page - 1) / PAGE_WINDOW) * PAGE_WINDOW + 1;
        let mut end = start + PAGE_WINDOW - 1;
        if let Some(total) = self.total_pages {
            end = end.min(total.max(1));
        }
        (start..=end)
            .map(|page| PageButton {
                page,
                active: page == self.current_page,
            })
            .collect()
    }

    fn clamp(&self, page: u32) -> u32 {
        let page = page.max(1);
        match self.total_pages {
            Some(total) => page.min(total.max(1)),
            None => page,
        }
    }
}
