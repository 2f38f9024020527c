//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for the current authenticated request.
///
/// Built by the auth extractor and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// Email from the token, if present.
    pub email: Option<String>,
    /// Correlation id for log lines of this request.
    pub request_id: Uuid,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context for `user_id`.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            email: None,
            request_id: Uuid::now_v7(),
            request_time: Utc::now(),
        }
    }

    /// Attach the caller's email.
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }
}
