//! Invite codes: short, shareable tokens that resolve to exactly one team
//!
//! Codes are six characters from `A-Z0-9`, always stored and compared
//! uppercase. Generation is not unique by construction (36^6 possible
//! codes); the store enforces uniqueness and callers retry on conflict.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::error::TeamsError;
use crate::domain::validation::is_valid_invite_code;

/// Number of characters in an invite code
pub const INVITE_CODE_LENGTH: usize = 6;

/// Symbols an invite code is drawn from
pub const INVITE_CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A normalized invite code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct InviteCode(String);

impl InviteCode {
    /// Draw a fresh code, each character uniformly from the alphabet
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..INVITE_CODE_LENGTH)
            .map(|_| INVITE_CODE_ALPHABET[rng.gen_range(0..INVITE_CODE_ALPHABET.len())] as char)
            .collect();
        InviteCode(code)
    }

    /// Trim and uppercase user input, then check the canonical format
    pub fn parse(raw: &str) -> Result<Self, TeamsError> {
        let normalized = raw.trim().to_uppercase();
        if !is_valid_invite_code(&normalized) {
            return Err(TeamsError::InvalidInviteCode);
        }
        Ok(InviteCode(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InviteCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for InviteCode {
    type Err = TeamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Generate a new invite code. Pure apart from the RNG; performs no I/O.
pub fn generate_invite_code() -> InviteCode {
    InviteCode::generate()
}
