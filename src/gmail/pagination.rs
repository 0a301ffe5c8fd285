//! Bookkeeping for the identifier listing loop

/// Remaining-count budget for paginated listing. `None` means unbounded:
/// keep going until the provider stops handing out continuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBudget {
    remaining: Option<i64>,
    max_page_size: u32,
}

impl PageBudget {
    pub fn new(limit: Option<i64>, max_page_size: u32) -> Self {
        Self {
            remaining: limit,
            max_page_size: max_page_size.max(1),
        }
    }

    pub fn remaining(&self) -> Option<i64> {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.remaining, Some(n) if n <= 0)
    }

    /// `maxResults` for the next request.
    pub fn next_page_size(&self) -> u32 {
        match self.remaining {
            Some(n) if n < i64::from(self.max_page_size) => n.max(0) as u32,
            _ => self.max_page_size,
        }
    }

    pub fn consume(&mut self, received: usize) {
        if let Some(n) = self.remaining.as_mut() {
            *n -= received as i64;
        }
    }

    /// Decides whether another page should be requested after one that
    /// yielded `received` ids. An empty page ends the stream even when a
    /// continuation token came with it.
    pub fn should_continue(&self, received: usize, next_page_token: Option<&str>) -> bool {
        !self.is_exhausted() && received > 0 && next_page_token.is_some_and(|t| !t.is_empty())
    }

    /// Cap for the accumulated ids when the provider over-delivers.
    pub fn limit_cap(limit: Option<i64>) -> Option<usize> {
        limit.map(|l| l.max(0) as usize)
    }
}
