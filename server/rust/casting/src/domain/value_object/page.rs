//! ページネーション。
//!
//! `page` の既定値は 1、`per_page` の既定値は 20 で、エンドポイントごとの上限で切り詰める。
//! 整数として解釈できない値や 1 未満の値は存在しないページとして扱う。

use serde::Deserialize;

/// PageQuery はクエリ文字列の page / per_page（未解釈）。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// PageRequest は解釈済みのページ指定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 20;

impl PageRequest {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// クエリから PageRequest を作る。per_page は max_per_page で切り詰める。
    /// 不正な指定は None。
    pub fn from_query(query: &PageQuery, max_per_page: u32) -> Option<Self> {
        let page = parse_positive(query.page.as_deref(), DEFAULT_PAGE)?;
        let per_page = parse_int(query.per_page.as_deref(), DEFAULT_PER_PAGE)?
            .min(i64::from(max_per_page));
        let per_page = u32::try_from(per_page).ok().filter(|n| *n >= 1)?;
        Some(Self { page, per_page })
    }

    /// クエリの page のみを使い、per_page は固定値とする。
    pub fn with_fixed_size(query: &PageQuery, per_page: u32) -> Option<Self> {
        let page = parse_positive(query.page.as_deref(), DEFAULT_PAGE)?;
        Some(Self { page, per_page })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

fn parse_int(value: Option<&str>, default: i64) -> Option<i64> {
    match value {
        None => Some(default),
        Some(v) => v.trim().parse::<i64>().ok(),
    }
}

fn parse_positive(value: Option<&str>, default: i64) -> Option<u32> {
    parse_int(value, default)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n >= 1)
}

/// Page は 1 ページ分の結果。
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.per_page))
    }

    /// 1 ページ目以外で結果が空ならページ範囲外。
    pub fn is_out_of_range(&self) -> bool {
        self.items.is_empty() && self.page != 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, per_page: Option<&str>) -> PageQuery {
        PageQuery {
            page: page.map(str::to_string),
            per_page: per_page.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_are_capped() {
        let req = PageRequest::from_query(&PageQuery::default(), 10).unwrap();
        assert_eq!(req, PageRequest::new(1, 10));
    }

    #[test]
    fn test_explicit_values() {
        let req = PageRequest::from_query(&query(Some("3"), Some("2")), 10).unwrap();
        assert_eq!(req, PageRequest::new(3, 2));
        assert_eq!(req.offset(), 4);
        assert_eq!(req.limit(), 2);
    }

    #[test]
    fn test_invalid_values() {
        assert!(PageRequest::from_query(&query(Some("abc"), None), 10).is_none());
        assert!(PageRequest::from_query(&query(Some("0"), None), 10).is_none());
        assert!(PageRequest::from_query(&query(Some("-1"), None), 10).is_none());
        assert!(PageRequest::from_query(&query(None, Some("0")), 10).is_none());
        assert!(PageRequest::from_query(&query(None, Some("x")), 10).is_none());
        assert!(PageRequest::from_query(&query(Some(""), None), 10).is_none());
    }

    #[test]
    fn test_fixed_size_ignores_per_page() {
        let req = PageRequest::with_fixed_size(&query(Some("2"), Some("1")), 10).unwrap();
        assert_eq!(req, PageRequest::new(2, 10));
    }

    #[test]
    fn test_total_pages() {
        let req = PageRequest::new(1, 2);
        assert_eq!(Page::<u8>::new(vec![], 0, req).total_pages(), 0);
        assert_eq!(Page::new(vec![1u8, 2], 3, req).total_pages(), 2);
        assert_eq!(Page::new(vec![1u8, 2], 4, req).total_pages(), 2);
    }

    #[test]
    fn test_out_of_range() {
        assert!(!Page::<u8>::new(vec![], 0, PageRequest::new(1, 10)).is_out_of_range());
        assert!(Page::<u8>::new(vec![], 3, PageRequest::new(3, 2)).is_out_of_range());
    }
}
