use serde::{Deserialize, Serialize};

/// User settings persisted alongside the task snapshot, each under its own
/// storage key. Absent keys mean defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Free-text display name
    #[serde(default)]
    pub user_name: Option<String>,
    /// Gates the periodic reminder pass. The notification permission itself
    /// is managed by the caller, not here.
    #[serde(default)]
    pub notifications_enabled: bool,
}
