use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::session::Session;

/// A finished sub-session kept in the play history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedSession {
    pub session: Session,
    pub archived_at: DateTime<Utc>,
}

impl ArchivedSession {
    #[must_use]
    pub fn new(session: Session, archived_at: DateTime<Utc>) -> Self {
        Self {
            session,
            archived_at,
        }
    }
}
