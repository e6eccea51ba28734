//! Task query pipeline
//!
//! Turns the full task collection plus a [`ViewState`] into the page of tasks
//! the user should see. Stages always run in the same order:
//! filter, search, sort, paginate. Every function here is pure.

use serde::{Deserialize, Serialize};

use crate::filter::{SortOrder, StatusFilter};
use crate::task::Task;

/// Number of tasks shown per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Ephemeral view selections controlling what subset of tasks is displayed
///
/// Never persisted. Each front end owns its own value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    filter: StatusFilter,
    sort: SortOrder,
    page: usize,
    search: String,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default selections with a custom page size (zero is bumped to one)
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            filter: StatusFilter::All,
            sort: SortOrder::Newest,
            page: 1,
            search: String::new(),
            page_size: page_size.max(1),
        }
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    /// Current page, 1-based
    pub fn page(&self) -> usize {
        self.page
    }

    /// Current search string, already case-folded
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the completion filter and go back to the first page
    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
        self.page = 1;
    }

    /// Change the ordering. The page is kept.
    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    /// Jump to `page`. Out-of-range pages are allowed and show nothing.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Change the search text and go back to the first page
    pub fn set_search(&mut self, text: &str) {
        self.search = fold_case(text);
        self.page = 1;
    }

    pub fn clear_search(&mut self) {
        self.set_search("");
    }

    pub fn is_searching(&self) -> bool {
        !self.search.is_empty()
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Tasks on the requested page, in display order
    pub tasks: Vec<Task>,
    /// Tasks passing filter and search, before pagination
    pub matched: usize,
    /// Incomplete tasks among the matched ones
    pub remaining: usize,
    /// Number of pages needed for the matched tasks
    pub total_pages: usize,
}

/// Keep tasks passing the completion filter
pub fn filter_tasks<'a>(tasks: &'a [Task], filter: StatusFilter) -> Vec<&'a Task> {
    tasks.iter().filter(|t| filter.matches(t)).collect()
}

/// Keep tasks whose title or description contains `needle`, ignoring case.
/// An empty needle keeps everything.
pub fn search_tasks<'a>(tasks: Vec<&'a Task>, needle: &str) -> Vec<&'a Task> {
    if needle.is_empty() {
        return tasks;
    }
    let needle = fold_case(needle);
    tasks
        .into_iter()
        .filter(|t| contains_folded(&t.title, &needle) || contains_folded(&t.description, &needle))
        .collect()
}

fn contains_folded(haystack: &str, folded_needle: &str) -> bool {
    fold_case(haystack).contains(folded_needle)
}

/// Case folding for one character, shared by search and highlighting
///
/// Folds character by character so that offsets in the folded text map back
/// to the original. Final sigma folds to the ordinary sigma.
pub fn fold_char(ch: char) -> impl Iterator<Item = char> {
    ch.to_lowercase().map(|c| if c == 'ς' { 'σ' } else { c })
}

/// Case-fold `text` for search comparisons
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(fold_char).collect()
}

/// Stable sort under `order`; ties keep their incoming order
pub fn sort_tasks(mut tasks: Vec<&Task>, order: SortOrder) -> Vec<&Task> {
    tasks.sort_by(|a, b| order.compare(a, b));
    tasks
}

/// Slice out `[(page-1)*size, page*size)`. Page 0 or past the end is empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let Some(start) = page.checked_sub(1).and_then(|p| p.checked_mul(page_size)) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Pages needed to show `count` items
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Run filter, search, sort and paginate over `tasks`
pub fn run(tasks: &[Task], view: &ViewState) -> QueryResult {
    let filtered = filter_tasks(tasks, view.filter);
    let searched = search_tasks(filtered, &view.search);

    let matched = searched.len();
    let remaining = searched.iter().filter(|t| !t.completed).count();

    let sorted = sort_tasks(searched, view.sort);
    let page = paginate(&sorted, view.page, view.page_size)
        .iter()
        .map(|t| (*t).clone())
        .collect();

    QueryResult {
        tasks: page,
        matched,
        remaining,
        total_pages: total_pages(matched, view.page_size),
    }
}
