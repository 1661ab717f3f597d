//! The persisted document.

use serde::{Deserialize, Serialize};

use super::{ContactRequest, User};

/// Everything the service stores: requests newest-first, users in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    #[serde(default)]
    pub requests: Vec<ContactRequest>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl Document {
    /// Find a user by profile link.
    pub fn user_by_link_mut(&mut self, max_link: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.max_link == max_link)
    }

    /// Position of a request in the list, if present.
    pub fn request_position(&self, id: &str) -> Option<usize> {
        self.requests.iter().position(|r| r.id == id)
    }
}
