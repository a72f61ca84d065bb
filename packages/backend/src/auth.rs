use serde::{Deserialize, Serialize};

/// The authenticated account behind the current session.
///
/// `None` from [`crate::Backend::current_user`] means there is no active
/// session; callers decide whether that routes to a login page or a
/// read-only view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Credentials for the sign-up flow.
#[derive(Debug, Serialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}
