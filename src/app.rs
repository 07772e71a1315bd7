use std::sync::Arc;

use chrono::Local;
use ratatui::widgets::ListState;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, trace};

use crate::fetch::{FetchHandle, FetchLifecycle};
use crate::reducer::{reduce, StoryAction, ViewState};
use crate::search::{search_stories, SearchTermStore};
use crate::source::{Story, StoryId, StorySource};

/// Where keystrokes go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Typing edits the search term.
    Search,
    /// Keys navigate and dismiss stories.
    Browse,
}

/// A running fetch together with the only channel its result can arrive on.
///
/// Each mount gets a fresh channel, so a result from an earlier mount has
/// nowhere to go once that mount is replaced.
struct Mount {
    runtime: Handle,
    source: Arc<dyn StorySource>,
    fetch: FetchHandle,
    rx: UnboundedReceiver<StoryAction>,
}

pub struct App {
    /// Owned exclusively by the reducer; read-only everywhere else.
    view: ViewState,
    search: SearchTermStore,
    /// Selection within the *filtered* list.
    pub list_state: ListState,
    pub mode: InputMode,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last status message.
    pub status: String,
    mount: Option<Mount>,
}

impl App {
    pub fn new(search: SearchTermStore) -> Self {
        Self {
            view: ViewState::new(),
            search,
            list_state: ListState::default(),
            mode: InputMode::Search,
            quit: false,
            status: "Starting…".into(),
            mount: None,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn search_term(&self) -> &str {
        self.search.value()
    }

    pub fn search_is_persistent(&self) -> bool {
        self.search.is_persistent()
    }

    // -- fetch lifecycle -----------------------------------------------------

    /// Start the one fetch belonging to this mount.
    ///
    /// Any previous mount is torn down first.
    pub fn mount(&mut self, runtime: Handle, source: Arc<dyn StorySource>) {
        self.unmount();

        let (tx, rx) = mpsc::unbounded_channel();
        info!(source = source.name(), "mounting");
        let fetch = FetchLifecycle::start(&runtime, Arc::clone(&source), tx);
        self.mount = Some(Mount {
            runtime,
            source,
            fetch,
            rx,
        });
        // Pick up FetchInit right away so the first frame already shows it.
        self.drain_fetch_events();
    }

    /// Tear down and mount again against the same source.
    pub fn remount(&mut self) {
        let Some(Mount {
            runtime, source, ..
        }) = self.mount.as_ref()
        else {
            return;
        };
        let (runtime, source) = (runtime.clone(), Arc::clone(source));
        self.mount(runtime, source);
    }

    /// Stop listening to the current fetch.  Its result, if any, is dropped.
    pub fn unmount(&mut self) {
        if let Some(mount) = self.mount.take() {
            mount.fetch.teardown();
            info!(
                source = mount.source.name(),
                in_flight = !mount.fetch.is_finished(),
                "unmounted"
            );
        }
    }

    /// Feed every pending fetch event into the reducer.
    pub fn drain_fetch_events(&mut self) {
        let mut pending = Vec::new();
        if let Some(mount) = self.mount.as_mut() {
            while let Ok(action) = mount.rx.try_recv() {
                pending.push(action);
            }
        }
        for action in pending {
            self.dispatch(action);
        }
    }

    /// Run one action through the reducer and refresh derived UI state.
    pub fn dispatch(&mut self, action: StoryAction) {
        trace!(?action, "dispatch");
        match &action {
            StoryAction::FetchInit => self.status = "Loading…".into(),
            StoryAction::FetchSuccess(stories) => {
                self.status = format!(
                    "Loaded {} stories at {}",
                    stories.len(),
                    Local::now().format("%H:%M:%S")
                );
            }
            StoryAction::FetchFailure => self.status = "Fetch failed".into(),
            StoryAction::RemoveItem(_) => {}
        }
        reduce(&mut self.view, action);
        self.clamp_selection();
    }

    // -- presentation events -------------------------------------------------

    /// Stories matching the current search term, in collection order.
    pub fn visible_stories(&self) -> Vec<&Story> {
        search_stories(&self.view.data, self.search.value())
    }

    pub fn selected_story(&self) -> Option<&Story> {
        let i = self.list_state.selected()?;
        self.visible_stories().get(i).copied()
    }

    /// The search input changed.
    pub fn on_search_change(&mut self, term: impl Into<String>) {
        self.search.set_value(term);
        self.clamp_selection();
    }

    pub fn search_push(&mut self, c: char) {
        let mut term = self.search.value().to_string();
        term.push(c);
        self.on_search_change(term);
    }

    pub fn search_pop(&mut self) {
        let mut term = self.search.value().to_string();
        if term.pop().is_some() {
            self.on_search_change(term);
        }
    }

    /// The user dismissed a story.
    pub fn on_remove(&mut self, id: StoryId) {
        self.dispatch(StoryAction::RemoveItem(id));
    }

    pub fn remove_selected(&mut self) {
        if let Some(id) = self.selected_story().map(|s| s.id.clone()) {
            debug!(%id, "dismissing selected story");
            self.on_remove(id);
        }
    }

    pub fn focus_search(&mut self) {
        self.mode = InputMode::Search;
    }

    pub fn focus_list(&mut self) {
        self.mode = InputMode::Browse;
        if self.list_state.selected().is_none() {
            self.select_first();
        }
    }

    // -- navigation ----------------------------------------------------------

    fn visible_len(&self) -> usize {
        self.visible_stories().len()
    }

    /// Keep the selection inside the filtered list.
    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.visible_len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.visible_len() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.unmount();
    }
}
