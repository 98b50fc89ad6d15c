//! Validation helpers and constants for team input

use regex::Regex;

/// Maximum length of a team name
pub const MAX_TEAM_NAME_LEN: u64 = 100;

/// Maximum length of a team description
pub const MAX_TEAM_DESCRIPTION_LEN: u64 = 500;

lazy_static::lazy_static! {
    /// Canonical invite code: exactly six uppercase letters or digits
    pub static ref INVITE_CODE_REGEX: Regex =
        Regex::new(r"^[A-Z0-9]{6}$").unwrap();
}

/// Check an already-normalized invite code against the canonical format
pub fn is_valid_invite_code(code: &str) -> bool {
    INVITE_CODE_REGEX.is_match(code)
}

/// Validate a team name after trimming surrounding whitespace
pub fn validate_team_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Team name is required".to_string());
    }
    if trimmed.chars().count() > MAX_TEAM_NAME_LEN as usize {
        return Err(format!(
            "Team name must be at most {} characters",
            MAX_TEAM_NAME_LEN
        ));
    }
    Ok(())
}

/// Validate an optional description (already trimmed)
pub fn validate_team_description(description: &str) -> Result<(), String> {
    if description.chars().count() > MAX_TEAM_DESCRIPTION_LEN as usize {
        return Err(format!(
            "Description must be at most {} characters",
            MAX_TEAM_DESCRIPTION_LEN
        ));
    }
    Ok(())
}

/// Capacity must allow at least the creator
pub fn validate_max_members(max_members: i32) -> Result<(), String> {
    if max_members < 1 {
        return Err("Maximum members must be at least 1".to_string());
    }
    Ok(())
}
