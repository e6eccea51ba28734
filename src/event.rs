// User events and the shell command grammar that produces them

use std::str::FromStr;

use eyre::{Result, eyre};

use crate::filter::{SortOrder, StatusFilter};
use crate::task::TaskId;

/// Something the user did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Add button or enter in the title field
    Submit { title: String, description: String },
    Delete(TaskId),
    Toggle(TaskId),
    SetFilter(StatusFilter),
    SetSort(SortOrder),
    /// Search field changed
    Search(String),
    ClearSearch,
    /// Numbered page button
    Page(usize),
    Prev,
    Next,
    /// Drag row at 1-based position `from` to position `to` on the current page
    MoveRow { from: usize, to: usize },
    ClearCompleted,
    Refresh,
}

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Event(Event),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  add <title> [| <description>]   add a task
  rm <id>                         delete a task
  toggle <id>                     mark done / undo
  filter all|active|completed     filter by status
  sort newest|oldest|alphabetical change ordering
  search <text>                   search titles and descriptions
  clear                           clear the search
  page <n> | prev | next          move between pages
  move <from> <to>                drag a row on this page (not saved)
  purge                           delete all completed tasks
  ls                              redraw
  help                            show this help
  quit                            exit";

fn parse_id(arg: &str) -> Result<TaskId> {
    arg.trim()
        .trim_start_matches('#')
        .parse()
        .map_err(|_| eyre!("Invalid task id: {}", arg.trim()))
}

fn parse_position(arg: Option<&str>, what: &str) -> Result<usize> {
    let arg = arg.ok_or_else(|| eyre!("Missing {}", what))?;
    arg.parse().map_err(|_| eyre!("Invalid {}: {}", what, arg))
}

impl FromStr for Command {
    type Err = eyre::Report;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let event = match verb.to_lowercase().as_str() {
            "" | "ls" | "list" => Event::Refresh,
            "help" | "?" => return Ok(Command::Help),
            "quit" | "exit" | "q" => return Ok(Command::Quit),
            "add" => {
                let (title, description) = rest.split_once('|').unwrap_or((rest, ""));
                Event::Submit {
                    title: title.to_string(),
                    description: description.to_string(),
                }
            }
            "rm" | "delete" | "del" => Event::Delete(parse_id(rest)?),
            "toggle" | "done" | "undo" => Event::Toggle(parse_id(rest)?),
            "filter" => Event::SetFilter(rest.parse()?),
            "sort" => Event::SetSort(rest.parse()?),
            "search" => Event::Search(rest.to_string()),
            "clear" => Event::ClearSearch,
            "page" => Event::Page(parse_position(Some(rest), "page")?),
            "prev" => Event::Prev,
            "next" => Event::Next,
            "move" | "mv" => {
                let mut args = rest.split_whitespace();
                let from = parse_position(args.next(), "row")?;
                let to = parse_position(args.next(), "row")?;
                Event::MoveRow { from, to }
            }
            "purge" => Event::ClearCompleted,
            other => return Err(eyre!("Unknown command: {} (try 'help')", other)),
        };
        Ok(Command::Event(event))
    }
}
