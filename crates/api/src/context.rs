use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Per-request context, inserted by [`crate::middleware::request_context`].
///
/// `received_at` is the single clock reading a request works with: token issue,
/// expiry checks, and record timestamps all use it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: Uuid,
    received_at: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(request_id: Uuid, received_at: DateTime<Utc>) -> Self {
        Self {
            request_id,
            received_at,
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}
