// ABOUTME: Page envelope and list query parameters shared by every list endpoint
// ABOUTME: Mirrors the backend's zero-based page contract field for field

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// First page index (pages are zero-based on the wire)
pub const MIN_PAGE: u32 = 0;

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("Invalid sort order: {}. Must be asc or desc", other)),
        }
    }
}

/// Sort key plus direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub by: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn asc(by: impl Into<String>) -> Self {
        Self {
            by: by.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(by: impl Into<String>) -> Self {
        Self {
            by: by.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Query string for a list endpoint.
///
/// The entity filter is flattened next to the paging keys, so
/// `ListQuery { page: 1, size: 10, filter: ProjectFilter { status: Some(..), .. } }`
/// goes out as `?page=1&size=10&status=IN_PROGRESS`. Absent filters are skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery<F> {
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(flatten)]
    pub filter: F,
}

impl<F: Default> Default for ListQuery<F> {
    fn default() -> Self {
        Self {
            page: MIN_PAGE,
            size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_order: None,
            filter: F::default(),
        }
    }
}

impl<F> ListQuery<F> {
    /// Create a query for one page with the given filter
    pub fn new(page: u32, size: u32, filter: F) -> Self {
        Self {
            page,
            size,
            sort_by: None,
            sort_order: None,
            filter,
        }
    }

    /// Attach (or clear) a sort key
    pub fn with_sort(mut self, sort: Option<Sort>) -> Self {
        match sort {
            Some(sort) => {
                self.sort_by = Some(sort.by);
                self.sort_order = Some(sort.order);
            }
            None => {
                self.sort_by = None;
                self.sort_order = None;
            }
        }
        self
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, at most `size` of them
    pub content: Vec<T>,

    /// Total number of items across all pages
    pub total_elements: u64,

    /// Total number of pages
    pub total_pages: u32,

    /// Requested page size
    pub size: u32,

    /// Zero-based index of this page
    pub number: u32,

    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    /// An empty first page, used before anything has been fetched
    pub fn empty(size: u32) -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            size,
            number: MIN_PAGE,
            first: true,
            last: true,
        }
    }

    /// Whether there is a page after this one
    pub fn has_next(&self) -> bool {
        !self.last
    }

    /// Whether there is a page before this one
    pub fn has_previous(&self) -> bool {
        !self.first
    }

    /// Map the items while keeping the paging metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            size: self.size,
            number: self.number,
            first: self.first,
            last: self.last,
        }
    }
}

impl<T: Clone> Page<T> {
    /// Cut one page out of a full result set the way the backend does.
    ///
    /// `size` is clamped to `1..=MAX_PAGE_SIZE` and `page` to the last valid
    /// page, so `number` may differ from the requested index.
    pub fn from_slice(all: &[T], page: u32, size: u32) -> Self {
        let size = size.clamp(1, MAX_PAGE_SIZE);
        let total_elements = all.len() as u64;
        let total_pages = all.len().div_ceil(size as usize) as u32;
        let number = page.min(total_pages.saturating_sub(1));

        let start = (number as usize * size as usize).min(all.len());
        let end = (start + size as usize).min(all.len());

        Self {
            content: all[start..end].to_vec(),
            total_elements,
            total_pages,
            size,
            number,
            first: number == MIN_PAGE,
            last: total_pages == 0 || number + 1 >= total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Default, PartialEq, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Filter {
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        project_id: Option<i64>,
    }

    #[test]
    fn test_page_from_slice_partial_last_page() {
        let items: Vec<u32> = (0..25).collect();

        let sizes: Vec<usize> = (0..3)
            .map(|p| Page::from_slice(&items, p, 10).content.len())
            .collect();
        assert_eq!(sizes, vec![10, 10, 5]);

        let last = Page::from_slice(&items, 2, 10);
        assert_eq!(last.total_elements, 25);
        assert_eq!(last.total_pages, 3);
        assert!(last.last);
        assert!(!last.first);
        assert!(!Page::from_slice(&items, 1, 10).last);
    }

    #[test]
    fn test_page_from_slice_clamps_page_and_size() {
        let items: Vec<u32> = (0..25).collect();

        let page = Page::from_slice(&items, 9, 10);
        assert_eq!(page.number, 2);
        assert_eq!(page.content.len(), 5);

        let page = Page::from_slice(&items, 0, 0);
        assert_eq!(page.size, 1);
        assert_eq!(page.content, vec![0]);

        let page = Page::from_slice(&items, 0, 1_000);
        assert_eq!(page.size, MAX_PAGE_SIZE);
        assert_eq!(page.content.len(), 25);
    }

    #[test]
    fn test_page_from_empty_slice() {
        let page: Page<u32> = Page::from_slice(&[], 3, 10);
        assert_eq!(page.number, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.first && page.last);
        assert!(page.content.is_empty());
    }

    #[test]
    fn test_page_wire_field_names() {
        let page = Page::from_slice(&["a".to_string()], 0, 10);
        let json = serde_json::to_value(&page).unwrap();

        for key in ["content", "totalElements", "totalPages", "size", "number", "first", "last"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_page_decodes_spring_envelope_with_extra_fields() {
        let json = r#"{
            "content": [1, 2],
            "totalElements": 12,
            "totalPages": 6,
            "size": 2,
            "number": 0,
            "first": true,
            "last": false,
            "numberOfElements": 2,
            "empty": false
        }"#;

        let page: Page<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content, vec![1, 2]);
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_list_query_flattens_filter_and_skips_absent_keys() {
        let query = ListQuery::new(
            1,
            20,
            Filter {
                status: Some("OPEN".to_string()),
                project_id: None,
            },
        )
        .with_sort(Some(Sort::desc("createdAt")));

        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "page": 1,
                "size": 20,
                "sortBy": "createdAt",
                "sortOrder": "desc",
                "status": "OPEN"
            })
        );
    }

    #[test]
    fn test_default_list_query() {
        let query: ListQuery<Filter> = ListQuery::default();
        assert_eq!(query.page, MIN_PAGE);
        assert_eq!(query.size, DEFAULT_PAGE_SIZE);
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            serde_json::json!({ "page": 0, "size": 10 })
        );
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
