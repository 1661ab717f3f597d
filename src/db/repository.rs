//! Repository for request and user operations over a document store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::{ContactRequest, Document, NewRequest, User};

use super::DocumentStore;

/// Repository for all data operations.
///
/// Store calls run on the blocking thread pool. Mutations hold `write_lock`
/// across load, modify and save so overlapping writers in this process cannot
/// drop each other's changes.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
    write_lock: Arc<Mutex<()>>,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run `op` against the store off the async executor.
    async fn with_store<T, F>(&self, op: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn DocumentStore) -> Result<T, AppError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| AppError::Internal(format!("Storage task failed: {}", e)))?
    }

    /// Get the full document.
    pub async fn document(&self) -> Result<Document, AppError> {
        self.with_store(|store| store.load()).await
    }

    /// List all requests, newest first.
    pub async fn list_requests(&self) -> Result<Vec<ContactRequest>, AppError> {
        Ok(self.document().await?.requests)
    }

    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.document().await?.users)
    }

    /// Upsert the author by profile link and prepend a new request.
    pub async fn create_request(&self, new: &NewRequest) -> Result<ContactRequest, AppError> {
        self.create_request_at(new, Utc::now()).await
    }

    pub(crate) async fn create_request_at(
        &self,
        new: &NewRequest,
        now: DateTime<Utc>,
    ) -> Result<ContactRequest, AppError> {
        let _guard = self.write_lock.lock().await;
        let new = new.clone();

        self.with_store(move |store| {
            let mut document = store.load()?;
            let request = add_request(&mut document, &new, now);
            store.save(&document)?;
            Ok(request)
        })
        .await
    }

    /// Delete a request by id.
    pub async fn delete_request(&self, id: &str) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let id = id.to_string();

        self.with_store(move |store| {
            let mut document = store.load()?;

            let position = document
                .request_position(&id)
                .ok_or_else(|| AppError::NotFound(format!("Request {} not found", id)))?;

            document.requests.remove(position);
            store.save(&document)
        })
        .await
    }
}

/// Upsert the author and prepend the request to `document`.
fn add_request(document: &mut Document, new: &NewRequest, now: DateTime<Utc>) -> ContactRequest {
    let user_id = match document.user_by_link_mut(&new.user_max_link) {
        Some(existing) => {
            tracing::info!("Updating existing user {}", existing.id);
            existing.name = new.user_name.clone();
            existing.institute = new.user_institute.clone();
            existing.course = new.user_course.clone();
            existing.id.clone()
        }
        None => {
            tracing::info!("Creating new user {}", new.user_id);
            document.users.push(User {
                id: new.user_id.clone(),
                name: new.user_name.clone(),
                max_link: new.user_max_link.clone(),
                institute: new.user_institute.clone(),
                course: new.user_course.clone(),
            });
            new.user_id.clone()
        }
    };

    let request = ContactRequest {
        id: next_request_id(&document.requests, now.timestamp_millis()),
        user_id,
        text: new.text.clone(),
        date: now.format("%Y-%m-%d").to_string(),
    };

    document.requests.insert(0, request.clone());
    request
}

/// Millisecond timestamp as an id, bumped past any id already taken.
fn next_request_id(existing: &[ContactRequest], now_millis: i64) -> String {
    let mut candidate = now_millis;
    while existing.iter().any(|r| r.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}
