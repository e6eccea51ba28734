//! Event wiring
//!
//! [`App`] owns one task list session: the mutation API, the view state, the
//! notice queue and any cosmetic row reordering. Each [`Event`] is handled to
//! completion before the next one is accepted.

use eyre::Result;
use tracing::debug;

use crate::event::Event;
use crate::mutation::TaskList;
use crate::notify::Notifications;
use crate::query::{self, ViewState};
use crate::render::{self, PageView};
use crate::storage::KeyValueStorage;
use crate::task::{Clock, TaskId};

pub struct App<S, C> {
    list: TaskList<S, C>,
    view: ViewState,
    notices: Notifications,
    /// Display order of the current page after drag moves; never stored
    row_order: Option<Vec<TaskId>>,
}

impl<S: KeyValueStorage, C: Clock> App<S, C> {
    pub fn new(list: TaskList<S, C>, view: ViewState, notices: Notifications) -> Self {
        Self {
            list,
            view,
            notices,
            row_order: None,
        }
    }

    pub fn list(&self) -> &TaskList<S, C> {
        &self.list
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Apply one event
    ///
    /// Validation failures become notices. Storage failures are returned.
    pub fn handle(&mut self, event: Event) -> Result<()> {
        debug!(?event, "Handling event");

        if !matches!(event, Event::MoveRow { .. }) {
            self.row_order = None;
        }

        match event {
            Event::Submit { title, description } => {
                if let Err(rejection) = self.list.add_task(&title, &description)? {
                    let now = self.list.clock().now_ms();
                    self.notices.push(rejection.to_string(), now);
                }
            }
            Event::Delete(id) => {
                self.list.delete_task(id)?;
            }
            Event::Toggle(id) => {
                self.list.toggle_task_completion(id)?;
            }
            Event::ClearCompleted => {
                let removed = self.list.clear_completed()?;
                let now = self.list.clock().now_ms();
                self.notices.push(
                    format!("Removed {} completed task{}", removed, if removed == 1 { "" } else { "s" }),
                    now,
                );
            }
            Event::SetFilter(filter) => self.view.set_filter(filter),
            Event::SetSort(sort) => self.view.set_sort(sort),
            Event::Search(text) => self.view.set_search(&text),
            Event::ClearSearch => self.view.clear_search(),
            Event::Page(page) => self.view.set_page(page),
            Event::Prev | Event::Next => self.click_page(&event)?,
            Event::MoveRow { from, to } => self.move_row(from, to)?,
            Event::Refresh => {}
        }
        Ok(())
    }

    /// Route a previous/next click, ignoring disabled controls
    fn click_page(&mut self, event: &Event) -> Result<()> {
        let tasks = self.list.list()?;
        let result = query::run(&tasks, &self.view);
        let controls = render::pagination(self.view.page(), result.total_pages);

        let button = match event {
            Event::Prev => &controls.prev,
            _ => &controls.next,
        };
        if button.disabled {
            debug!(?event, "Ignoring click on disabled page control");
        } else {
            self.view.set_page(button.target);
        }
        Ok(())
    }

    /// Move the row at 1-based `from` to 1-based `to` on the current page
    ///
    /// Only the display order changes. The store is untouched and the order is
    /// forgotten on the next re-render triggered by any other event.
    fn move_row(&mut self, from: usize, to: usize) -> Result<()> {
        let mut ids: Vec<TaskId> = self.current_page()?.rows.iter().map(|r| r.id).collect();
        let len = ids.len();
        if from == 0 || to == 0 || from > len || to > len {
            debug!(from, to, len, "Ignoring move outside the current page");
            return Ok(());
        }
        let id = ids.remove(from - 1);
        ids.insert(to - 1, id);
        self.row_order = Some(ids);
        Ok(())
    }

    fn current_page(&mut self) -> Result<PageView> {
        let tasks = self.list.list()?;
        let result = query::run(&tasks, &self.view);
        let notices = self.notices.active(self.list.clock().now_ms());
        Ok(render::build(&result, &self.view, &notices, self.row_order.as_deref()))
    }

    /// Everything to display right now
    pub fn page(&mut self) -> Result<PageView> {
        self.current_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{SortOrder, StatusFilter};
    use crate::storage::MemoryStorage;
    use crate::store::TaskStore;
    use crate::task::FixedClock;

    fn app() -> App<MemoryStorage, FixedClock> {
        let list = TaskList::new(TaskStore::new(MemoryStorage::default()), FixedClock::at_ms(1_000_000));
        App::new(list, ViewState::new(), Notifications::new(3_000))
    }

    fn submit(app: &mut App<MemoryStorage, FixedClock>, title: &str) {
        app.handle(Event::Submit {
            title: title.to_string(),
            description: String::new(),
        })
        .unwrap();
        app.list().clock().advance_ms(1);
    }

    fn titles(app: &mut App<MemoryStorage, FixedClock>) -> Vec<String> {
        app.page().unwrap().rows.iter().map(|r| r.plain_title()).collect()
    }

    #[test]
    fn test_submit_and_render() {
        let mut app = app();
        submit(&mut app, "Write docs");
        submit(&mut app, "Ship");

        let page = app.page().unwrap();
        assert_eq!(titles(&mut app), vec!["Ship", "Write docs"]);
        assert_eq!(page.count_label, "2 tasks remaining");
        assert!(page.notices.is_empty());
    }

    #[test]
    fn test_rejection_becomes_notice_and_expires() {
        let mut app = app();
        submit(&mut app, "   ");
        assert_eq!(app.page().unwrap().notices, vec!["Please enter a task title".to_string()]);

        submit(&mut app, "Ship");
        submit(&mut app, "ship");
        let notices = app.page().unwrap().notices;
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[1], "A task with this title already exists");
        assert_eq!(app.list().list().unwrap().len(), 1);

        app.list().clock().advance_ms(3_000);
        assert!(app.page().unwrap().notices.is_empty());
    }

    #[test]
    fn test_toggle_and_delete() {
        let mut app = app();
        submit(&mut app, "a");
        submit(&mut app, "b");
        let ids: Vec<TaskId> = app.list().list().unwrap().iter().map(|t| t.id).collect();

        app.handle(Event::Toggle(ids[0])).unwrap();
        assert_eq!(app.page().unwrap().count_label, "1 task remaining");

        app.handle(Event::Delete(ids[1])).unwrap();
        app.handle(Event::Delete(999)).unwrap();
        assert_eq!(titles(&mut app), vec!["a"]);
    }

    #[test]
    fn test_filter_resets_page() {
        let mut app = app();
        for i in 0..7 {
            submit(&mut app, &format!("task {}", i));
        }
        app.handle(Event::Next).unwrap();
        assert_eq!(app.view_state().page(), 2);

        app.handle(Event::SetFilter(StatusFilter::Active)).unwrap();
        assert_eq!(app.view_state().page(), 1);

        app.handle(Event::Page(2)).unwrap();
        app.handle(Event::SetSort(SortOrder::Oldest)).unwrap();
        assert_eq!(app.view_state().page(), 2);

        app.handle(Event::Search("TASK".to_string())).unwrap();
        assert_eq!(app.view_state().page(), 1);
        assert!(app.page().unwrap().show_clear_search);

        app.handle(Event::ClearSearch).unwrap();
        assert!(!app.page().unwrap().show_clear_search);
    }

    #[test]
    fn test_disabled_page_controls_are_ignored() {
        let mut app = app();
        for i in 0..6 {
            submit(&mut app, &format!("task {}", i));
        }

        app.handle(Event::Prev).unwrap();
        assert_eq!(app.view_state().page(), 1);

        app.handle(Event::Next).unwrap();
        assert_eq!(app.view_state().page(), 2);

        app.handle(Event::Next).unwrap();
        assert_eq!(app.view_state().page(), 2);

        app.handle(Event::Prev).unwrap();
        assert_eq!(app.view_state().page(), 1);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let mut app = app();
        for i in 0..6 {
            submit(&mut app, &format!("task {}", i));
        }

        app.handle(Event::Page(7)).unwrap();
        assert_eq!(app.view_state().page(), 7);
        let page = app.page().unwrap();
        assert!(page.rows.is_empty());
        assert!(page.pagination.next.disabled);
        assert_eq!(page.count_label, "6 tasks remaining");

        app.handle(Event::Prev).unwrap();
        assert_eq!(app.view_state().page(), 6);
    }

    #[test]
    fn test_next_disabled_without_tasks() {
        let mut app = app();
        app.handle(Event::Next).unwrap();
        assert_eq!(app.view_state().page(), 1);
    }

    #[test]
    fn test_move_row_is_cosmetic() {
        let mut app = app();
        submit(&mut app, "a");
        submit(&mut app, "b");
        submit(&mut app, "c");
        let stored = app.list().list().unwrap();

        app.handle(Event::MoveRow { from: 3, to: 1 }).unwrap();
        assert_eq!(titles(&mut app), vec!["a", "c", "b"]);
        assert_eq!(app.list().list().unwrap(), stored);

        app.handle(Event::MoveRow { from: 1, to: 3 }).unwrap();
        assert_eq!(titles(&mut app), vec!["c", "b", "a"]);

        // out of range moves do nothing
        app.handle(Event::MoveRow { from: 9, to: 1 }).unwrap();
        assert_eq!(titles(&mut app), vec!["c", "b", "a"]);

        app.handle(Event::MoveRow { from: 1, to: 2 }).unwrap();
        assert_eq!(titles(&mut app), vec!["b", "c", "a"]);

        app.handle(Event::Refresh).unwrap();
        assert_eq!(titles(&mut app), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_move_row_forgotten_after_other_event() {
        let mut app = app();
        submit(&mut app, "a");
        submit(&mut app, "b");

        app.handle(Event::MoveRow { from: 1, to: 2 }).unwrap();
        assert_eq!(titles(&mut app), vec!["a", "b"]);

        app.handle(Event::SetSort(SortOrder::Newest)).unwrap();
        assert_eq!(titles(&mut app), vec!["b", "a"]);
    }

    #[test]
    fn test_clear_completed_reports() {
        let mut app = app();
        submit(&mut app, "a");
        let id = app.list().list().unwrap()[0].id;
        app.handle(Event::Toggle(id)).unwrap();
        app.handle(Event::ClearCompleted).unwrap();

        let page = app.page().unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.notices, vec!["Removed 1 completed task".to_string()]);
    }
}
