use crate::store::{SharedState, ANONYMOUS};

/// Store slices the analysis screen renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutProps {
    pub username: String,
    pub page_status: String,
    pub submit_analysis: bool,
}

impl LayoutProps {
    pub fn from_state(state: &SharedState) -> Self {
        let name = state.user.name.trim();
        Self {
            username: if name.is_empty() {
                ANONYMOUS.to_string()
            } else {
                name.to_string()
            },
            page_status: state.page.status.clone(),
            submit_analysis: state.page.submit_button.analysis,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.username == ANONYMOUS
    }
}
