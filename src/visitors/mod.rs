//! Visitor directory: free-text search and fixed-size pagination.

use serde::Serialize;

use crate::model::VisitorRecord;

pub const PAGE_SIZE: usize = 10;
pub const PAGE_WINDOW: usize = 5;

fn searchable_fields(v: &VisitorRecord) -> [Option<&str>; 6] {
    [
        v.name.as_deref(),
        v.church.as_deref(),
        v.family.as_deref(),
        v.host_family.as_deref(),
        v.table.as_deref(),
        v.role.as_deref(),
    ]
}

pub fn matches_query(visitor: &VisitorRecord, needle: &str) -> bool {
    searchable_fields(visitor)
        .iter()
        .map(|field| field.unwrap_or("").to_lowercase())
        .any(|field| field.contains(needle))
}

/// Case-insensitive substring search over name, church, family, hosting
/// family, table and role. An empty query keeps every record in order.
pub fn filter_visitors<'a>(visitors: &'a [VisitorRecord], query: &str) -> Vec<&'a VisitorRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return visitors.iter().collect();
    }
    visitors
        .iter()
        .filter(|v| matches_query(v, &needle))
        .collect()
}

pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE).max(1)
}

pub fn clamp_page(page: usize, count: usize) -> usize {
    page.clamp(1, total_pages(count))
}

/// Up to five page numbers around `current`, shifted to stay inside
/// `[1, total_pages]`.
pub fn page_window(current: usize, total_pages: usize) -> std::ops::RangeInclusive<usize> {
    let total_pages = total_pages.max(1);
    let current = current.clamp(1, total_pages);
    let mut start = current.saturating_sub(PAGE_WINDOW / 2).max(1);
    let end = (start + PAGE_WINDOW - 1).min(total_pages);
    if end + 1 - start < PAGE_WINDOW {
        start = (end + 1).saturating_sub(PAGE_WINDOW).max(1);
    }
    start..=end
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Previous,
    Page,
    Next,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageControl {
    pub kind: ControlKind,
    pub label: String,
    pub target: usize,
    pub disabled: bool,
    pub active: bool,
}

fn build_controls(current: usize, total_pages: usize) -> Vec<PageControl> {
    let mut controls = Vec::with_capacity(PAGE_WINDOW + 2);
    controls.push(PageControl {
        kind: ControlKind::Previous,
        label: "«".to_string(),
        target: current.saturating_sub(1).max(1),
        disabled: current == 1,
        active: false,
    });
    for page in page_window(current, total_pages) {
        controls.push(PageControl {
            kind: ControlKind::Page,
            label: page.to_string(),
            target: page,
            disabled: false,
            active: page == current,
        });
    }
    controls.push(PageControl {
        kind: ControlKind::Next,
        label: "»".to_string(),
        target: (current + 1).min(total_pages),
        disabled: current == total_pages,
        active: false,
    });
    controls
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VisitorPage {
    pub items: Vec<VisitorRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub from: usize,
    pub to: usize,
    pub controls: Vec<PageControl>,
    pub show_controls: bool,
}

impl VisitorPage {
    pub fn range_label(&self) -> String {
        format!("Mostrando {}–{} de {}", self.from, self.to, self.total)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageView {
    Empty,
    Page(VisitorPage),
}

impl PageView {
    pub fn page(&self) -> Option<&VisitorPage> {
        match self {
            Self::Empty => None,
            Self::Page(p) => Some(p),
        }
    }
}

pub fn paginate(filtered: &[&VisitorRecord], page: usize) -> PageView {
    let total = filtered.len();
    if total == 0 {
        return PageView::Empty;
    }
    let total_pages = total_pages(total);
    let page = clamp_page(page, total);
    let start = (page - 1) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(total);
    PageView::Page(VisitorPage {
        items: filtered[start..end].iter().map(|v| (*v).clone()).collect(),
        page,
        total_pages,
        total,
        from: start + 1,
        to: end,
        controls: build_controls(page, total_pages),
        show_controls: total > PAGE_SIZE,
    })
}

/// Search box and current page of the visitor directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub query: String,
    pub page: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
        }
    }
}

impl PaginationState {
    pub fn new(query: impl Into<String>, page: usize) -> Self {
        Self {
            query: query.into(),
            page: page.max(1),
        }
    }

    /// A new query always starts again from the first page.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    pub fn goto(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn next(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Computes the visible page and writes the clamped page number back.
    pub fn view(&mut self, visitors: &[VisitorRecord]) -> PageView {
        let filtered = filter_visitors(visitors, &self.query);
        self.page = clamp_page(self.page, filtered.len());
        paginate(&filtered, self.page)
    }
}
