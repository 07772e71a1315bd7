//! hacker-stories — browse, search and dismiss Hacker News stories in the
//! terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ StoryAction ┌──────────┐ reduce() ┌────────────┐
//! │ fetch.rs │ ──────────► │  app.rs  │ ───────► │ reducer.rs │
//! │ (tokio)  │  (channel)  │ (state)  │          │ (ViewState)│
//! └──────────┘             └──────────┘          └────────────┘
//!                            ▲      │ draw()
//!     handle_key_event()     │      ▼
//!                     ┌──────────┐ ┌──────────┐
//!                     │ input.rs │ │  ui.rs   │
//!                     └──────────┘ └──────────┘
//! ```
//!
//! * **`source/`** — the `StorySource` trait, the `Story` record and the
//!   demo / Hacker News implementations.
//! * **`fetch`** — runs one retrieval on the tokio runtime and reports
//!   init / success / failure over a channel; results after teardown are
//!   dropped.
//! * **`reducer`** — the only place `ViewState` changes.
//! * **`store`** / **`search`** — the persisted search term and the title
//!   filter.
//! * **`app`** — owns all application state and turns UI events into
//!   reducer actions.
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` events.
//! * **`main`** — wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop.

mod app;
mod config;
mod error;
mod fetch;
mod input;
mod logging;
mod reducer;
mod search;
mod source;
mod store;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use app::App;
use config::{Args, SourceKind};
use search::SearchTermStore;
use source::{DemoSource, HackerNewsSource, StorySource};
use store::{JsonFileStore, MemoryStore, PersistentKeyStore};

// ---------------------------------------------------------------------------
// RAII terminal guard — cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        tracing::error!(%info, "panic");
        original_hook(info);
    }));
}

fn build_source(args: &Args) -> Arc<dyn StorySource> {
    match args.source {
        SourceKind::Demo => Arc::new(DemoSource::new(args.delay()).failing(args.fail)),
        SourceKind::Hn => Arc::new(HackerNewsSource::new(&args.query)),
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_or_warn(&args.log_path(), &args.log_level);
    install_panic_hook();

    // -- collaborators -------------------------------------------------------
    let store: Box<dyn PersistentKeyStore> = if args.ephemeral {
        info!("search term kept in memory only");
        Box::new(MemoryStore::new())
    } else {
        let store = JsonFileStore::new(args.store_path());
        info!(path = %store.path().display(), "using search store");
        Box::new(store)
    };
    let search = SearchTermStore::create(store, &args.search_key, &args.default_term);
    let source = build_source(&args);

    // Fetches run here; the UI loop stays on the main thread.
    let runtime = tokio::runtime::Runtime::new()?;

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(search);
    app.mount(runtime.handle().clone(), source);

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain fetch events into the reducer.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        app.drain_fetch_events();

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    app.unmount();
    info!("exiting");
    // Don't wait on a fetch nobody is listening to any more.
    runtime.shutdown_background();
    Ok(())
}
