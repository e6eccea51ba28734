//! Presentation layer
//!
//! [`build`] turns a [`QueryResult`] and the current [`ViewState`] into a
//! [`PageView`]: plain data describing every row and control. The
//! [`TerminalRenderer`] then draws a `PageView` to any writer. Keeping the two
//! apart lets the view model be checked without a terminal.

use std::io::{self, Write};

use colored::{ColoredString, Colorize};

use crate::filter::{SortOrder, StatusFilter};
use crate::notify::Notice;
use crate::query::{self, QueryResult, ViewState};
use crate::task::TaskId;

/// Piece of a title, either plain text or a search match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Plain(String),
    Match(String),
}

/// One rendered task row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: TaskId,
    pub title: Vec<Segment>,
    pub description: Option<String>,
    pub completed: bool,
}

impl RowView {
    /// Label on the completion control
    pub fn toggle_label(&self) -> &'static str {
        if self.completed { "undo" } else { "done" }
    }

    pub fn plain_title(&self) -> String {
        self.title
            .iter()
            .map(|s| match s {
                Segment::Plain(t) | Segment::Match(t) => t.as_str(),
            })
            .collect()
    }
}

/// A pagination control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButton {
    pub label: String,
    /// Page this button leads to
    pub target: usize,
    pub active: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub prev: PageButton,
    pub pages: Vec<PageButton>,
    pub next: PageButton,
}

/// A filter or sort control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control<T> {
    pub value: T,
    pub label: &'static str,
    pub active: bool,
}

/// Everything the user should see after one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub rows: Vec<RowView>,
    pub count_label: String,
    pub pagination: PaginationView,
    pub filters: Vec<Control<StatusFilter>>,
    pub sorts: Vec<Control<SortOrder>>,
    pub search: String,
    pub show_clear_search: bool,
    pub notices: Vec<String>,
}

/// Build the view model for one page
///
/// `row_order`, when given, rearranges the rows of this page by id. Rows whose
/// id is not listed keep their place after the listed ones.
pub fn build(result: &QueryResult, view: &ViewState, notices: &[Notice], row_order: Option<&[TaskId]>) -> PageView {
    let mut rows: Vec<RowView> = result
        .tasks
        .iter()
        .map(|task| RowView {
            id: task.id,
            title: highlight(&task.title, view.search()),
            description: task.has_description().then(|| task.description.clone()),
            completed: task.completed,
        })
        .collect();

    if let Some(order) = row_order {
        rows.sort_by_key(|row| order.iter().position(|id| *id == row.id).unwrap_or(usize::MAX));
    }

    PageView {
        rows,
        count_label: count_label(result.remaining),
        pagination: pagination(view.page(), result.total_pages),
        filters: StatusFilter::ALL
            .iter()
            .map(|f| Control {
                value: *f,
                label: f.label(),
                active: *f == view.filter(),
            })
            .collect(),
        sorts: SortOrder::ALL
            .iter()
            .map(|s| Control {
                value: *s,
                label: s.label(),
                active: *s == view.sort(),
            })
            .collect(),
        search: view.search().to_string(),
        show_clear_search: view.is_searching(),
        notices: notices.iter().map(|n| n.message.clone()).collect(),
    }
}

/// "1 task remaining", "3 tasks remaining"
pub fn count_label(remaining: usize) -> String {
    format!("{} task{} remaining", remaining, if remaining == 1 { "" } else { "s" })
}

/// Previous, numbered and next buttons for `page` out of `total_pages`
pub fn pagination(page: usize, total_pages: usize) -> PaginationView {
    let prev = PageButton {
        label: "<".to_string(),
        target: page.saturating_sub(1),
        active: false,
        disabled: page <= 1,
    };
    let pages = (1..=total_pages)
        .map(|i| PageButton {
            label: i.to_string(),
            target: i,
            active: i == page,
            disabled: false,
        })
        .collect();
    let next = PageButton {
        label: ">".to_string(),
        target: page.saturating_add(1),
        active: false,
        disabled: page >= total_pages,
    };
    PaginationView { prev, pages, next }
}

/// Split `text` around every case-insensitive occurrence of `folded_needle`
///
/// The needle is matched literally. Segment boundaries always fall on
/// character boundaries of the original text.
pub fn highlight(text: &str, folded_needle: &str) -> Vec<Segment> {
    if folded_needle.is_empty() {
        return vec![Segment::Plain(text.to_string())];
    }

    // (offset in folded text, offset in original text) per original char
    let mut folded = String::with_capacity(text.len());
    let mut offsets: Vec<(usize, usize)> = Vec::new();
    for (orig, ch) in text.char_indices() {
        offsets.push((folded.len(), orig));
        folded.extend(query::fold_char(ch));
    }

    let start_of = |pos: usize| {
        let i = offsets.partition_point(|(f, _)| *f <= pos);
        offsets[i.saturating_sub(1)].1
    };
    let end_of = |pos: usize| {
        let i = offsets.partition_point(|(f, _)| *f < pos);
        offsets.get(i).map_or(text.len(), |(_, o)| *o)
    };

    let mut segments = Vec::new();
    let mut cursor = 0;
    for (pos, matched) in folded.match_indices(folded_needle) {
        let start = start_of(pos);
        let end = end_of(pos + matched.len());
        if start < cursor || start >= end {
            continue;
        }
        if start > cursor {
            segments.push(Segment::Plain(text[cursor..start].to_string()));
        }
        segments.push(Segment::Match(text[start..end].to_string()));
        cursor = end;
    }
    if cursor < text.len() || segments.is_empty() {
        segments.push(Segment::Plain(text[cursor..].to_string()));
    }
    segments
}

/// Draws a [`PageView`] as text
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    color: bool,
}

impl TerminalRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color { style(text).to_string() } else { text.to_string() }
    }

    fn control(&self, label: &str, active: bool, disabled: bool) -> String {
        if active {
            self.paint(&format!("[{}]", label), |s| s.bold().cyan())
        } else if disabled {
            self.paint(label, |s| s.dimmed())
        } else {
            label.to_string()
        }
    }

    pub fn draw<W: Write>(&self, view: &PageView, out: &mut W) -> io::Result<()> {
        let filters: Vec<String> = view.filters.iter().map(|c| self.control(c.label, c.active, false)).collect();
        let sorts: Vec<String> = view.sorts.iter().map(|c| self.control(c.label, c.active, false)).collect();
        writeln!(out, "Filter: {}    Sort: {}", filters.join(" "), sorts.join(" "))?;

        if view.show_clear_search {
            writeln!(out, "Search: \"{}\" (clear)", view.search)?;
        }
        writeln!(out)?;

        if view.rows.is_empty() {
            writeln!(out, "  {}", self.paint("No tasks", |s| s.dimmed()))?;
        }
        for (i, row) in view.rows.iter().enumerate() {
            let mark = if row.completed { "[x]" } else { "[ ]" };
            let title: String = row
                .title
                .iter()
                .map(|seg| match seg {
                    Segment::Match(t) => self.paint(t, |s| s.bold().yellow()),
                    Segment::Plain(t) if row.completed => self.paint(t, |s| s.dimmed().strikethrough()),
                    Segment::Plain(t) => t.clone(),
                })
                .collect();
            write!(out, "{:>2}. {} {}", i + 1, mark, title)?;
            if let Some(desc) = &row.description {
                write!(out, "  {}", self.paint(desc, |s| s.italic()))?;
            }
            writeln!(
                out,
                "  {}",
                self.paint(&format!("#{} {} | delete", row.id, row.toggle_label()), |s| s.dimmed())
            )?;
        }

        writeln!(out)?;
        writeln!(out, "{}", view.count_label)?;

        let p = &view.pagination;
        let mut buttons = vec![self.control(&p.prev.label, false, p.prev.disabled)];
        buttons.extend(p.pages.iter().map(|b| self.control(&b.label, b.active, b.disabled)));
        buttons.push(self.control(&p.next.label, false, p.next.disabled));
        writeln!(out, "{}", buttons.join(" "))?;

        for notice in &view.notices {
            writeln!(out, "{}", self.paint(&format!("! {}", notice), |s| s.red().bold()))?;
        }
        Ok(())
    }
}
