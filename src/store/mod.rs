//! Shared application state.
//!
//! One `Store` owns the state tree. Components never write to it directly:
//! they emit `Action` values which the store folds through the pure root
//! reducer, after which every subscriber is called with the new tree.

pub mod actions;
pub mod reducer;

use serde::{Deserialize, Serialize};

use crate::services::session_storage::SessionStorage;
pub use actions::Action;

pub const ANONYMOUS: &str = "anonymous";
pub const USERNAME_KEY: &str = "username";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitButton {
    pub analysis: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub status: String,
    pub submit_button: SubmitButton,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedState {
    pub user: UserState,
    pub page: PageState,
}

impl SharedState {
    pub fn initial(username: Option<String>) -> Self {
        let name = username
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| ANONYMOUS.to_string());
        Self {
            user: UserState { name },
            page: PageState {
                status: "default".to_string(),
                submit_button: SubmitButton { analysis: false },
            },
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::initial(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SharedState)>;

#[derive(Default)]
pub struct Store {
    state: SharedState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    dispatched: u64,
}

impl Store {
    pub fn new(initial: SharedState) -> Self {
        Self {
            state: initial,
            ..Default::default()
        }
    }

    /// Bootstrap from session storage: only the `username` key is read.
    pub fn from_storage(storage: &SessionStorage) -> Self {
        Self::new(SharedState::initial(storage.get_item(USERNAME_KEY)))
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn dispatch(&mut self, action: Action) {
        self.dispatched += 1;
        tracing::debug!(action = ?action, "dispatch");
        self.state = reducer::reduce(&self.state, &action);
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&SharedState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn dispatch_count(&self) -> u64 {
        self.dispatched
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
