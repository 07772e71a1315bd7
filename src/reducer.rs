//! The story state machine.
//!
//! Every change to the displayed collection and its fetch status goes
//! through [`reduce`].  The four behavioural states are encoded in the flags
//! of [`ViewState`] rather than in a separate enum:
//!
//! ```text
//! Idle     loading=false error=false data=[]
//! Loading  loading=true  error=false data untouched
//! Loaded   loading=false error=false data=<payload>
//! Failed   loading=false error=true  data untouched
//! ```
//!
//! Removal is orthogonal to fetching: it edits `data` and leaves both flags
//! alone, whatever state the machine is in.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::source::{Story, StoryId};

/// Canonical view of the collection and its fetch status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Fetch-result order, unique by id.
    pub data: Vec<Story>,
    pub is_loading: bool,
    /// Set when the last fetch failed.  Never true while `is_loading` is.
    pub is_error: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Everything that can change a [`ViewState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryAction {
    /// A fetch attempt is about to start.
    FetchInit,
    /// The fetch completed; replaces the whole collection.
    FetchSuccess(Vec<Story>),
    FetchFailure,
    /// Drop the story with this id, if present.
    RemoveItem(StoryId),
}

/// Apply one action to the state.
pub fn reduce(state: &mut ViewState, action: StoryAction) {
    match action {
        StoryAction::FetchInit => {
            state.is_loading = true;
            state.is_error = false;
        }
        StoryAction::FetchSuccess(payload) => {
            state.data = dedup_by_id(payload);
            state.is_loading = false;
            state.is_error = false;
        }
        StoryAction::FetchFailure => {
            state.is_loading = false;
            state.is_error = true;
        }
        StoryAction::RemoveItem(id) => {
            let before = state.data.len();
            state.data.retain(|story| story.id != id);
            if state.data.len() == before {
                debug!(%id, "remove ignored; no such story");
            } else {
                debug!(%id, "story removed");
            }
        }
    }
}

/// Keep the first story for each id, preserving order.
fn dedup_by_id(payload: Vec<Story>) -> Vec<Story> {
    let mut seen = HashSet::with_capacity(payload.len());
    let total = payload.len();
    let unique: Vec<Story> = payload
        .into_iter()
        .filter(|story| seen.insert(story.id.clone()))
        .collect();
    if unique.len() != total {
        warn!(
            dropped = total - unique.len(),
            "fetch payload contained duplicate story ids"
        );
    }
    unique
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::make_story;
    use proptest::prelude::*;

    fn two_stories() -> Vec<Story> {
        vec![make_story("0", "React"), make_story("1", "Redux")]
    }

    fn loaded(data: Vec<Story>) -> ViewState {
        ViewState {
            data,
            is_loading: false,
            is_error: false,
        }
    }

    #[test]
    fn initial_state_is_idle() {
        let state = ViewState::new();
        assert!(state.data.is_empty());
        assert!(!state.is_loading);
        assert!(!state.is_error);
    }

    #[test]
    fn fetch_init_enters_loading_and_keeps_data() {
        let mut state = loaded(two_stories());
        reduce(&mut state, StoryAction::FetchInit);

        assert!(state.is_loading);
        assert!(!state.is_error);
        assert_eq!(state.data, two_stories());
    }

    #[test]
    fn fetch_init_clears_previous_error() {
        let mut state = ViewState::new();
        reduce(&mut state, StoryAction::FetchFailure);
        reduce(&mut state, StoryAction::FetchInit);

        assert!(state.is_loading);
        assert!(!state.is_error);
    }

    #[test]
    fn full_fetch_then_remove_scenario() {
        let mut state = ViewState::new();

        reduce(&mut state, StoryAction::FetchInit);
        assert_eq!(
            state,
            ViewState {
                data: vec![],
                is_loading: true,
                is_error: false
            }
        );

        reduce(&mut state, StoryAction::FetchSuccess(two_stories()));
        assert_eq!(state, loaded(two_stories()));

        reduce(&mut state, StoryAction::RemoveItem(StoryId::new("0")));
        assert_eq!(state.data, vec![make_story("1", "Redux")]);
        assert!(!state.is_loading);
        assert!(!state.is_error);
    }

    #[test]
    fn failure_keeps_data_from_before_init() {
        let mut state = loaded(two_stories());

        reduce(&mut state, StoryAction::FetchInit);
        reduce(&mut state, StoryAction::FetchFailure);

        assert!(!state.is_loading);
        assert!(state.is_error);
        assert_eq!(state.data, two_stories());
    }

    #[test]
    fn success_replaces_rather_than_merges() {
        let mut state = loaded(two_stories());
        let fresh = vec![make_story("9", "Tokio")];

        reduce(&mut state, StoryAction::FetchSuccess(fresh.clone()));
        assert_eq!(state.data, fresh);
    }

    #[test]
    fn success_with_empty_payload_empties_data() {
        let mut state = loaded(two_stories());
        reduce(&mut state, StoryAction::FetchSuccess(vec![]));
        assert!(state.data.is_empty());
    }

    #[test]
    fn success_drops_duplicate_ids_keeping_first() {
        let mut state = ViewState::new();
        reduce(
            &mut state,
            StoryAction::FetchSuccess(vec![
                make_story("0", "First"),
                make_story("1", "Other"),
                make_story("0", "Second copy"),
            ]),
        );

        assert_eq!(state.data.len(), 2);
        assert_eq!(state.data[0].title, "First");
        assert_eq!(state.data[1].id, StoryId::new("1"));
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut state = loaded(two_stories());
        reduce(&mut state, StoryAction::RemoveItem(StoryId::new("nope")));
        assert_eq!(state, loaded(two_stories()));
    }

    #[test]
    fn remove_while_loading_keeps_flags() {
        let mut state = loaded(two_stories());
        reduce(&mut state, StoryAction::FetchInit);
        reduce(&mut state, StoryAction::RemoveItem(StoryId::new("1")));

        assert!(state.is_loading);
        assert!(!state.is_error);
        assert_eq!(state.data, vec![make_story("0", "React")]);
    }

    #[test]
    fn remove_while_failed_keeps_error() {
        let mut state = loaded(two_stories());
        reduce(&mut state, StoryAction::FetchFailure);
        reduce(&mut state, StoryAction::RemoveItem(StoryId::new("0")));

        assert!(state.is_error);
        assert_eq!(state.data.len(), 1);
    }

    // -- properties ----------------------------------------------------------

    fn arb_action() -> impl Strategy<Value = StoryAction> {
        let id = "[0-4]";
        prop_oneof![
            Just(StoryAction::FetchInit),
            Just(StoryAction::FetchFailure),
            prop::collection::vec(id, 0..5).prop_map(|ids| {
                StoryAction::FetchSuccess(ids.iter().map(|i| make_story(i, "t")).collect())
            }),
            id.prop_map(|i| StoryAction::RemoveItem(StoryId::new(i))),
        ]
    }

    proptest! {
        #[test]
        fn never_loading_and_failed_at_once(actions in prop::collection::vec(arb_action(), 0..40)) {
            let mut state = ViewState::new();
            for action in actions {
                reduce(&mut state, action);
                prop_assert!(!(state.is_loading && state.is_error));
            }
        }

        #[test]
        fn data_stays_unique_by_id(actions in prop::collection::vec(arb_action(), 0..40)) {
            let mut state = ViewState::new();
            for action in actions {
                reduce(&mut state, action);
                let ids: HashSet<_> = state.data.iter().map(|s| s.id.clone()).collect();
                prop_assert_eq!(ids.len(), state.data.len());
            }
        }

        #[test]
        fn remove_is_idempotent(
            actions in prop::collection::vec(arb_action(), 0..20),
            id in "[0-4]",
        ) {
            let mut state = ViewState::new();
            for action in actions {
                reduce(&mut state, action);
            }
            let id = StoryId::new(id);

            reduce(&mut state, StoryAction::RemoveItem(id.clone()));
            let once = state.clone();
            reduce(&mut state, StoryAction::RemoveItem(id));

            prop_assert_eq!(state, once);
        }
    }
}
