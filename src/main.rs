use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::Result;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tasklist::storage::{self, Backend, KeyValueStorage};
use tasklist::{
    App, Command, Config, Event, Notifications, SortOrder, StatusFilter, SystemClock, TaskId, TaskList, TaskStore,
    TerminalRenderer, ViewState,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Tasklist - a to-do list with filtering, search, sorting and pagination")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Directory holding the task store (default: the user data directory)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Config file (default: <store-path>/.tasklist/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Storage backend, overriding the config file
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Delete a task by id
    Delete { id: TaskId },

    /// Mark a task done, or undo it
    Toggle { id: TaskId },

    /// Show one page of tasks
    List {
        #[arg(short, long, value_enum, default_value_t = StatusFilter::All)]
        filter: StatusFilter,

        #[arg(long, value_enum, default_value_t = SortOrder::Newest)]
        sort: SortOrder,

        #[arg(short = 'q', long, default_value = "")]
        search: String,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Delete all completed tasks
    ClearCompleted,

    /// Interactive session
    Shell,
}

type Session = App<Box<dyn KeyValueStorage>, SystemClock>;

fn open_session(store_path: &std::path::Path, config: &Config) -> Result<Session> {
    let storage = storage::open(config.backend, store_path)?;
    let store = TaskStore::with_key(storage, &config.storage_key)?;
    let list = TaskList::new(store, SystemClock);
    Ok(App::new(
        list,
        ViewState::with_page_size(config.page_size),
        Notifications::new(config.notice_ms),
    ))
}

fn draw(app: &mut Session, renderer: &TerminalRenderer) -> Result<()> {
    let page = app.page()?;
    let mut out = io::stdout().lock();
    renderer.draw(&page, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run_shell(app: &mut Session, renderer: &TerminalRenderer) -> Result<()> {
    draw(app, renderer)?;

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{}", tasklist::event::HELP),
            Ok(Command::Event(event)) => {
                app.handle(event)?;
                draw(app, renderer)?;
            }
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let store_path = cli.store_path.unwrap_or_else(tasklist::config::default_store_path);
    let config_path = cli.config.unwrap_or_else(|| Config::default_path(&store_path));
    let mut config = Config::load_from(&config_path)?;
    if let Some(backend) = cli.backend {
        config.backend = backend;
    }
    if cli.no_color {
        config.color = false;
    }
    if !config.color {
        colored::control::set_override(false);
    }
    let renderer = TerminalRenderer::new(config.color);

    // Open store
    let mut app = open_session(&store_path, &config)?;

    match cli.command {
        Commands::Add { title, description } => {
            app.handle(Event::Submit { title, description })?;
        }
        Commands::Delete { id } => app.handle(Event::Delete(id))?,
        Commands::Toggle { id } => app.handle(Event::Toggle(id))?,
        Commands::List {
            filter,
            sort,
            search,
            page,
        } => {
            app.handle(Event::SetFilter(filter))?;
            app.handle(Event::SetSort(sort))?;
            app.handle(Event::Search(search))?;
            app.handle(Event::Page(page))?;
        }
        Commands::ClearCompleted => app.handle(Event::ClearCompleted)?,
        Commands::Shell => return run_shell(&mut app, &renderer),
    }

    draw(&mut app, &renderer)
}
