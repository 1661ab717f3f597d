//! Board client state model.
//!
//! The browser board keeps its own list of posted requests in local storage and never
//! talks to the API service. This module is that client's view state and behavior:
//! the profile-link login gate, posting and deleting entries, and what the list shows.

mod storage;

pub use storage::*;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Local storage key holding the serialized entry list.
pub const STORAGE_KEY: &str = "max_requests";

/// Every accepted profile link starts with this.
pub const PROFILE_PREFIX: &str = "https://max.ru/u/";

/// Entries shown on the board before "show all".
pub const RECENT_COUNT: usize = 3;

/// Board errors. Only storage can fail; user mistakes become alerts or no-ops.
#[derive(Debug)]
pub enum BoardError {
    /// Local storage could not be read or written
    Storage(String),
    /// Key not usable as a storage item name
    InvalidKey(String),
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::Storage(msg) => write!(f, "local storage error: {}", msg),
            BoardError::InvalidKey(key) => write!(f, "invalid storage key: {:?}", key),
        }
    }
}

impl std::error::Error for BoardError {}

impl From<std::io::Error> for BoardError {
    fn from(err: std::io::Error) -> Self {
        BoardError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        BoardError::Storage(err.to_string())
    }
}

/// A blocking message the user must acknowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    InvalidProfileLink,
}

impl Alert {
    pub fn message(&self) -> &'static str {
        match self {
            Alert::InvalidProfileLink => "Enter a valid MAX profile link!",
        }
    }
}

/// A posted entry as kept in local storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardEntry {
    pub text: String,
    pub link: String,
    /// Creation time in milliseconds since the epoch
    pub id: i64,
}

/// One rendered entry card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView<'a> {
    pub id: i64,
    pub text: &'a str,
    /// Author's profile link, or `#` while logged out
    pub contact_href: &'a str,
    pub contact_enabled: bool,
    pub deletable: bool,
}

/// Board state over some local storage.
#[derive(Debug)]
pub struct Board<S: LocalStorage> {
    storage: S,
    user_link: String,
    logged_in: bool,
    requests: Vec<BoardEntry>,
    draft: String,
    show_login: bool,
    show_new_request: bool,
    show_all: bool,
    alert: Option<Alert>,
}

impl<S: LocalStorage> Board<S> {
    /// Start a board, restoring entries saved under [`STORAGE_KEY`].
    pub fn mount(storage: S) -> Self {
        let requests = match storage.get_item(STORAGE_KEY) {
            Ok(Some(saved)) => serde_json::from_str(&saved).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable saved requests: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read saved requests: {}", e);
                Vec::new()
            }
        };

        Self {
            storage,
            user_link: String::new(),
            logged_in: false,
            requests,
            draft: String::new(),
            show_login: false,
            show_new_request: false,
            show_all: false,
            alert: None,
        }
    }

    pub fn user_link(&self) -> &str {
        &self.user_link
    }

    pub fn set_user_link(&mut self, link: impl Into<String>) {
        self.user_link = link.into();
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// All entries in posting order, oldest first.
    pub fn entries(&self) -> &[BoardEntry] {
        &self.requests
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn alert(&self) -> Option<Alert> {
        self.alert
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn is_login_open(&self) -> bool {
        self.show_login
    }

    pub fn open_login(&mut self) {
        self.show_login = true;
    }

    pub fn close_login(&mut self) {
        self.show_login = false;
    }

    /// Accept the entered link if it looks like a MAX profile link.
    pub fn login(&mut self) -> bool {
        if self.user_link.trim().starts_with(PROFILE_PREFIX) {
            self.logged_in = true;
            self.show_login = false;
            true
        } else {
            self.alert = Some(Alert::InvalidProfileLink);
            false
        }
    }

    /// Posting is offered only to logged-in users.
    pub fn can_post(&self) -> bool {
        self.logged_in
    }

    pub fn is_new_request_open(&self) -> bool {
        self.show_new_request
    }

    pub fn open_new_request(&mut self) -> bool {
        if self.logged_in {
            self.show_new_request = true;
        }
        self.show_new_request
    }

    pub fn close_new_request(&mut self) {
        self.show_new_request = false;
    }

    /// Post the draft. Returns the new entry id, or `None` when nothing was posted.
    pub fn submit(&mut self) -> Result<Option<i64>, BoardError> {
        self.submit_at(Utc::now().timestamp_millis())
    }

    pub(crate) fn submit_at(&mut self, now_millis: i64) -> Result<Option<i64>, BoardError> {
        if self.draft.trim().is_empty() || !self.logged_in {
            return Ok(None);
        }

        let mut id = now_millis;
        while self.requests.iter().any(|r| r.id == id) {
            id += 1;
        }

        self.requests.push(BoardEntry {
            text: std::mem::take(&mut self.draft),
            link: self.user_link.clone(),
            id,
        });
        self.show_new_request = false;

        self.persist()?;
        Ok(Some(id))
    }

    /// Whether the current user may delete this entry.
    pub fn can_delete(&self, entry: &BoardEntry) -> bool {
        self.logged_in && entry.link == self.user_link
    }

    /// Delete an entry owned by the current user. Returns whether anything was removed.
    pub fn delete(&mut self, id: i64) -> Result<bool, BoardError> {
        let Some(position) = self.requests.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        if !self.can_delete(&self.requests[position]) {
            return Ok(false);
        }

        self.requests.remove(position);
        self.persist()?;
        Ok(true)
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// The most recent entries, newest first.
    pub fn recent(&self) -> Vec<EntryView<'_>> {
        self.requests
            .iter()
            .rev()
            .take(RECENT_COUNT)
            .map(|entry| self.view(entry))
            .collect()
    }

    /// Whether the "show all" button is offered.
    pub fn has_more(&self) -> bool {
        self.requests.len() > RECENT_COUNT
    }

    /// Every entry, newest first.
    pub fn all(&self) -> Vec<EntryView<'_>> {
        self.requests.iter().rev().map(|entry| self.view(entry)).collect()
    }

    pub fn is_all_open(&self) -> bool {
        self.show_all
    }

    pub fn open_all(&mut self) {
        self.show_all = true;
    }

    pub fn close_all(&mut self) {
        self.show_all = false;
    }

    fn view<'a>(&'a self, entry: &'a BoardEntry) -> EntryView<'a> {
        EntryView {
            id: entry.id,
            text: &entry.text,
            contact_href: if self.logged_in { entry.link.as_str() } else { "#" },
            contact_enabled: self.logged_in,
            deletable: self.can_delete(entry),
        }
    }

    fn persist(&mut self) -> Result<(), BoardError> {
        let serialized = serde_json::to_string(&self.requests)?;
        self.storage
            .set_item(STORAGE_KEY, &serialized)
            .inspect_err(|e| tracing::error!("Failed to save requests: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Storage that refuses every write.
    #[derive(Default)]
    struct FullStorage;

    impl LocalStorage for FullStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, BoardError> {
            Ok(None)
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), BoardError> {
            Err(BoardError::Storage("quota exceeded".to_string()))
        }
    }

    fn logged_in(link: &str) -> Board<MemoryStorage> {
        let mut board = Board::mount(MemoryStorage::default());
        board.set_user_link(link);
        assert!(board.login());
        board
    }

    fn post(board: &mut Board<MemoryStorage>, text: &str, at: i64) -> i64 {
        board.set_draft(text);
        board.submit_at(at).unwrap().unwrap()
    }

    #[test]
    fn test_login_accepts_profile_link() {
        let mut board = Board::mount(MemoryStorage::default());
        board.open_login();
        board.set_user_link("https://max.ru/u/a");

        assert!(board.login());
        assert!(board.is_logged_in());
        assert!(!board.is_login_open());
        assert_eq!(board.alert(), None);
    }

    #[test]
    fn test_login_trims_before_checking() {
        let mut board = Board::mount(MemoryStorage::default());
        board.set_user_link("  https://max.ru/u/a ");
        assert!(board.login());
    }

    #[test]
    fn test_login_rejects_other_text() {
        let mut board = Board::mount(MemoryStorage::default());
        board.open_login();
        board.set_user_link("not-a-link");

        assert!(!board.login());
        assert!(!board.is_logged_in());
        assert!(board.is_login_open());
        assert_eq!(board.alert(), Some(Alert::InvalidProfileLink));

        board.dismiss_alert();
        assert_eq!(board.alert(), None);
    }

    #[test]
    fn test_modals_toggle() {
        let mut board = Board::mount(MemoryStorage::default());
        assert!(!board.can_post());

        board.open_login();
        board.close_login();
        assert!(!board.is_login_open());

        board.set_user_link("https://max.ru/u/a");
        board.login();
        assert_eq!(board.user_link(), "https://max.ru/u/a");
        assert!(board.can_post());
        assert!(board.open_new_request());
        board.close_new_request();
        assert!(!board.is_new_request_open());
        assert_eq!(
            Alert::InvalidProfileLink.message(),
            "Enter a valid MAX profile link!"
        );
    }

    #[test]
    fn test_submit_ignored_when_logged_out() {
        let mut board = Board::mount(MemoryStorage::default());
        board.set_draft("hello");

        assert_eq!(board.submit().unwrap(), None);
        assert!(board.is_empty());
        assert_eq!(board.draft(), "hello");
        assert!(!board.open_new_request());
    }

    #[test]
    fn test_submit_ignores_blank_draft() {
        let mut board = logged_in("https://max.ru/u/a");
        board.set_draft("   \n");

        assert_eq!(board.submit().unwrap(), None);
        assert!(board.is_empty());
    }

    #[test]
    fn test_submit_appends_and_persists() {
        let mut board = logged_in("https://max.ru/u/a");
        assert!(board.open_new_request());
        board.set_draft("need a study buddy");

        let id = board.submit_at(1_700_000_000_000).unwrap().unwrap();

        assert_eq!(id, 1_700_000_000_000);
        assert_eq!(board.draft(), "");
        assert!(!board.is_new_request_open());
        assert_eq!(
            board.entries(),
            &[BoardEntry {
                text: "need a study buddy".to_string(),
                link: "https://max.ru/u/a".to_string(),
                id,
            }]
        );

        let saved = board.storage().get_item(STORAGE_KEY).unwrap().unwrap();
        let restored: Vec<BoardEntry> = serde_json::from_str(&saved).unwrap();
        assert_eq!(restored, board.entries());
    }

    #[test]
    fn test_submit_same_millisecond_gets_distinct_ids() {
        let mut board = logged_in("https://max.ru/u/a");
        let a = post(&mut board, "one", 5);
        let b = post(&mut board, "two", 5);
        assert_ne!(a, b);
    }

    #[test]
    fn test_mount_restores_entries() {
        let mut board = logged_in("https://max.ru/u/a");
        post(&mut board, "one", 1);
        post(&mut board, "two", 2);

        let remounted = Board::mount(board.into_storage());

        assert_eq!(remounted.entries().len(), 2);
        assert!(!remounted.is_logged_in());
    }

    #[test]
    fn test_mount_discards_corrupt_value() {
        let mut storage = MemoryStorage::default();
        storage.set_item(STORAGE_KEY, "{oops").unwrap();

        let board = Board::mount(storage);
        assert!(board.is_empty());
    }

    #[test]
    fn test_delete_only_own_entries() {
        let mut board = logged_in("https://max.ru/u/a");
        let mine = post(&mut board, "mine", 1);
        board.set_user_link("https://max.ru/u/b");
        let theirs = post(&mut board, "theirs", 2);
        board.set_user_link("https://max.ru/u/a");

        assert!(!board.delete(theirs).unwrap());
        assert!(board.delete(mine).unwrap());
        assert!(!board.delete(mine).unwrap());

        let ids: Vec<i64> = board.entries().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![theirs]);
    }

    #[test]
    fn test_delete_needs_login_even_with_matching_link() {
        let mut board = logged_in("https://max.ru/u/a");
        let id = post(&mut board, "mine", 1);

        // Typed the owner's link into the dialog but never logged in
        let mut board = Board::mount(board.into_storage());
        board.set_user_link("https://max.ru/u/a");

        assert!(!board.is_logged_in());
        assert!(!board.delete(id).unwrap());
        assert_eq!(board.entries().len(), 1);

        let saved = board.storage().get_item(STORAGE_KEY).unwrap().unwrap();
        let saved: Vec<BoardEntry> = serde_json::from_str(&saved).unwrap();
        assert_eq!(saved.len(), 1);
    }

    #[test]
    fn test_recent_shows_three_newest() {
        let mut board = logged_in("https://max.ru/u/a");
        for (i, text) in ["a", "b", "c", "d"].iter().enumerate() {
            post(&mut board, text, i as i64);
        }

        let texts: Vec<&str> = board.recent().iter().map(|v| v.text).collect();
        assert_eq!(texts, vec!["d", "c", "b"]);
        assert!(board.has_more());

        let all: Vec<&str> = board.all().iter().map(|v| v.text).collect();
        assert_eq!(all, vec!["d", "c", "b", "a"]);

        board.open_all();
        assert!(board.is_all_open());
        board.close_all();
        assert!(!board.is_all_open());
    }

    #[test]
    fn test_views_muted_when_logged_out() {
        let mut board = logged_in("https://max.ru/u/a");
        post(&mut board, "hello", 1);

        let views = board.recent();
        assert!(views[0].contact_enabled);
        assert!(views[0].deletable);
        assert_eq!(views[0].contact_href, "https://max.ru/u/a");

        let logged_out = Board::mount(board.into_storage());
        let views = logged_out.recent();
        assert!(!views[0].contact_enabled);
        assert!(!views[0].deletable);
        assert_eq!(views[0].contact_href, "#");
        assert!(!logged_out.has_more());
    }

    #[test]
    fn test_storage_failure_keeps_entry_in_memory() {
        let mut board = Board::mount(FullStorage);
        board.set_user_link("https://max.ru/u/a");
        assert!(board.login());
        board.set_draft("hello");

        let err = board.submit_at(1).unwrap_err();

        assert!(matches!(err, BoardError::Storage(_)));
        assert_eq!(board.entries().len(), 1);
    }
}
