use serde::{Deserialize, Serialize};

use super::{SubmitButton, ANONYMOUS};

/// Partial update of the `page` slice. Absent members are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_button: Option<SubmitButton>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    #[serde(rename = "LOGGED-IN")]
    LoggedIn { name: String },
    #[serde(rename = "LOGGED-OUT")]
    LoggedOut { name: String },
    #[serde(rename = "PAGE-PATCH")]
    PagePatch(PagePatch),
}

pub fn set_sv_button(analysis: bool) -> Action {
    Action::PagePatch(PagePatch {
        status: None,
        submit_button: Some(SubmitButton { analysis }),
    })
}

pub fn set_logout_state() -> Action {
    Action::LoggedOut {
        name: ANONYMOUS.to_string(),
    }
}

pub fn set_login_state(name: impl Into<String>) -> Action {
    Action::LoggedIn { name: name.into() }
}

pub fn set_page_status(status: impl Into<String>) -> Action {
    Action::PagePatch(PagePatch {
        status: Some(status.into()),
        submit_button: None,
    })
}
