//! User profile model.

use serde::{Deserialize, Serialize};

/// A profile record keyed by its MAX messenger link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub max_link: String,
    pub institute: String,
    pub course: String,
}
