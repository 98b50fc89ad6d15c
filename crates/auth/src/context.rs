//! Authorization context for authenticated users

use uuid::Uuid;

/// The authenticated principal behind a request
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: Option<String>,
}

impl AuthContext {
    pub fn new(user_id: Uuid, email: Option<String>) -> Self {
        Self { user_id, email }
    }

    /// Whether a user id supplied in a request body refers to this principal.
    /// An absent id means "act as myself".
    pub fn is_self(&self, claimed: Option<Uuid>) -> bool {
        claimed.is_none_or(|id| id == self.user_id)
    }
}
