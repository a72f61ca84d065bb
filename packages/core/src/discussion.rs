use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One message in a project's discussion thread.
///
/// The thread for a project is defined by `project_id` plus ascending
/// `created_at`. Comments are immutable once posted; there is no edit or
/// delete operation anywhere in the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscussionComment {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `project_discussions`.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub project_id: String,
    pub user_id: String,
    pub content: String,
}
