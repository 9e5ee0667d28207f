use super::actions::Action;
use super::{PageState, SharedState, UserState, ANONYMOUS};

pub fn user_reducer(user: &UserState, action: &Action) -> UserState {
    match action {
        Action::LoggedIn { name } => {
            let name = name.trim();
            UserState {
                name: if name.is_empty() {
                    ANONYMOUS.to_string()
                } else {
                    name.to_string()
                },
            }
        }
        Action::LoggedOut { name } => UserState { name: name.clone() },
        Action::PagePatch(_) => user.clone(),
    }
}

pub fn page_reducer(page: &PageState, action: &Action) -> PageState {
    match action {
        Action::PagePatch(patch) => PageState {
            status: patch.status.clone().unwrap_or_else(|| page.status.clone()),
            submit_button: patch.submit_button.unwrap_or(page.submit_button),
        },
        _ => page.clone(),
    }
}

/// Root reducer: each slice sees every action.
pub fn reduce(state: &SharedState, action: &Action) -> SharedState {
    SharedState {
        user: user_reducer(&state.user, action),
        page: page_reducer(&state.page, action),
    }
}
