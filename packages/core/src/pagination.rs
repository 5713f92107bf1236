// ABOUTME: Offset-to-page translation for list requests
// ABOUTME: Callers page by skip/limit while the record backend pages by 1-based page number

use thiserror::Error;

/// Minimum page number (1-indexed)
pub const MIN_PAGE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("Page size must be greater than zero")]
    ZeroLimit,
}

/// Translate an offset into the 1-based page that contains it:
/// `floor(skip / limit) + 1`.
pub fn page_number(skip: u32, limit: u32) -> Result<u32, PaginationError> {
    if limit == 0 {
        return Err(PaginationError::ZeroLimit);
    }
    Ok(skip / limit + MIN_PAGE)
}

/// Offset of the first row of `page`. Page 0 is treated as page 1.
pub fn skip_for_page(page: u32, limit: u32) -> u32 {
    page.max(MIN_PAGE).saturating_sub(1).saturating_mul(limit)
}

/// Offset-style pagination parameters as supplied by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub skip: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    /// Build the request that addresses a 1-based page directly
    pub fn for_page(page: u32, limit: u32) -> Self {
        Self {
            skip: skip_for_page(page, limit),
            limit,
        }
    }

    /// Page number sent on the wire
    pub fn page(&self) -> Result<u32, PaginationError> {
        page_number(self.skip, self.limit)
    }

    /// Whether `skip` falls on a page boundary. Misaligned offsets are served
    /// from the page that contains them.
    pub fn is_aligned(&self) -> bool {
        self.limit != 0 && self.skip % self.limit == 0
    }
}
