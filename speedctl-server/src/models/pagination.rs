//! Pagination for the `/list` endpoint

use serde::{Deserialize, Serialize};

/// Default page number
pub const DEFAULT_PAGE: i64 = 1;

/// Default items per page
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Requested page window.
///
/// No clamping happens here: `page_size` has no upper bound and negative
/// values are handed to the store as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (1-indexed)
    pub page: i64,
    /// Items per page
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// SQL OFFSET value, `(page - 1) * page_size`, saturating.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Raw query parameters for `/list`.
///
/// Kept as strings so that junk input falls back to defaults instead of
/// being rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
}

impl From<PageParams> for PageRequest {
    fn from(params: PageParams) -> Self {
        Self::new(
            parse_or_default(params.page.as_deref(), DEFAULT_PAGE),
            parse_or_default(params.page_size.as_deref(), DEFAULT_PAGE_SIZE),
        )
    }
}

/// Parse an integer parameter from its leading digits.
///
/// An optional sign and the digits after it are read and anything that
/// follows is ignored, so `"1.5"` is 1 and `"3abc"` is 3. No digits, or a
/// value of zero, yields `default`.
fn parse_or_default(raw: Option<&str>, default: i64) -> i64 {
    match raw.and_then(leading_integer) {
        Some(0) | None => default,
        Some(n) => n,
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let mut value: i64 = 0;
    for b in unsigned[..digits].bytes() {
        let digit = i64::from(b - b'0');
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(digit)
        } else {
            value.saturating_add(digit)
        };
    }
    Some(value)
}

/// Paginated response body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary<T> {
    pub total_rows: i64,
    pub total_pages: i64,
    pub remaining_pages: i64,
    pub data: Vec<T>,
}

impl<T> PageSummary<T> {
    pub fn new(total_rows: i64, request: PageRequest, data: Vec<T>) -> Self {
        let total_pages = total_pages(total_rows, request.page_size);
        Self {
            total_rows,
            total_pages,
            remaining_pages: total_pages.saturating_sub(request.page),
            data,
        }
    }
}

/// `ceil(total_rows / page_size)`.
///
/// Computed in floating point so that negative sizes follow plain
/// arithmetic rather than panicking.
pub fn total_pages(total_rows: i64, page_size: i64) -> i64 {
    (total_rows as f64 / page_size as f64).ceil() as i64
}
