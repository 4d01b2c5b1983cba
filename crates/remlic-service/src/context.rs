//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use remlic_core::types::UserId;

/// Who is acting, and when the request arrived.
///
/// Built by the auth extractor and passed into every user-scoped service
/// call. `request_time` is the single "now" used for status computation
/// within one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Context for a request arriving now.
    pub fn new(user_id: UserId) -> Self {
        Self::at(user_id, Utc::now())
    }

    /// Context pinned to a given instant.
    pub fn at(user_id: UserId, request_time: DateTime<Utc>) -> Self {
        Self {
            user_id,
            request_time,
        }
    }
}
