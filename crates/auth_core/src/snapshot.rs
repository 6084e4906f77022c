use serde::Serialize;

use crate::AuthState;

/// Diagnostic projection of [`AuthState`]; absent optionals are omitted
/// from the JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    pub has_user: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub loading: bool,
    pub initialized: bool,
    pub is_admin: bool,
}

impl From<&AuthState> for AuthSnapshot {
    fn from(state: &AuthState) -> Self {
        Self {
            has_user: state.user.is_some(),
            user_id: state.user.as_ref().map(|user| user.id.to_string()),
            email: state.user.as_ref().and_then(|user| user.email.clone()),
            loading: state.loading,
            initialized: state.initialized,
            is_admin: state.is_admin,
        }
    }
}

impl AuthSnapshot {
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|err| format!("<unserializable: {err}>"))
    }
}
