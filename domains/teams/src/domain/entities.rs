//! Domain entities for the Classhub teams domain
//!
//! Teams, their memberships, and the edit set applied by team admins.
//! Serialized with camelCase keys to match the web client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::TeamsError;
use crate::domain::invite_code::InviteCode;
use crate::domain::validation::{
    validate_max_members, validate_team_description, validate_team_name,
};

/// Kind of group a team represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "team_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TeamType {
    #[default]
    Class,
    StudyGroup,
    Club,
    Committee,
}

impl std::fmt::Display for TeamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamType::Class => write!(f, "class"),
            TeamType::StudyGroup => write!(f, "study-group"),
            TeamType::Club => write!(f, "club"),
            TeamType::Committee => write!(f, "committee"),
        }
    }
}

/// Lifecycle status of a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "team_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeamStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

impl std::fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamStatus::Active => write!(f, "active"),
            TeamStatus::Inactive => write!(f, "inactive"),
            TeamStatus::Archived => write!(f, "archived"),
        }
    }
}

/// Membership roles within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "team_member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    /// Team creator; manages the team and its invite code
    Teacher,
    #[default]
    Member,
}

impl MembershipRole {
    /// Check if this role can edit, delete, or re-key the team
    pub fn can_manage_team(&self) -> bool {
        matches!(self, MembershipRole::Teacher)
    }
}

impl std::fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MembershipRole::Teacher => write!(f, "teacher"),
            MembershipRole::Member => write!(f, "member"),
        }
    }
}

/// Input for creating a team
#[derive(Debug, Clone, PartialEq)]
pub struct NewTeam {
    pub name: String,
    pub description: Option<String>,
    pub team_type: Option<TeamType>,
    pub max_members: Option<i32>,
    pub organization_id: Uuid,
    pub created_by: Uuid,
}

/// Team entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub team_type: TeamType,
    pub status: TeamStatus,
    /// Number of memberships, kept in step with the membership set
    pub member_count: i32,
    /// Capacity; `None` means unbounded
    pub max_members: Option<i32>,
    pub invite_code: InviteCode,
    pub organization_id: Uuid,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team with validation. The creator is counted as the
    /// first member; the matching membership is created alongside it.
    pub fn new(new_team: NewTeam, invite_code: InviteCode) -> Result<Self, TeamsError> {
        validate_team_name(&new_team.name).map_err(TeamsError::Validation)?;

        let description = normalize_description(new_team.description);
        if let Some(ref description) = description {
            validate_team_description(description).map_err(TeamsError::Validation)?;
        }

        if let Some(max_members) = new_team.max_members {
            validate_max_members(max_members).map_err(TeamsError::Validation)?;
        }

        let now = Utc::now();
        Ok(Team {
            id: Uuid::new_v4(),
            name: new_team.name.trim().to_string(),
            description,
            team_type: new_team.team_type.unwrap_or_default(),
            status: TeamStatus::Active,
            member_count: 1,
            max_members: new_team.max_members,
            invite_code,
            organization_id: new_team.organization_id,
            created_by: new_team.created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whether the team cannot take another member
    pub fn is_full(&self) -> bool {
        self.max_members
            .is_some_and(|max_members| self.member_count >= max_members)
    }

    /// Whether the member count is above the configured capacity
    pub fn exceeds_capacity(&self) -> bool {
        self.max_members
            .is_some_and(|max_members| self.member_count > max_members)
    }

    /// Validate stored invariants
    pub fn validate(&self) -> Result<(), TeamsError> {
        validate_team_name(&self.name).map_err(TeamsError::Validation)?;

        if self.member_count < 1 {
            return Err(TeamsError::Validation(
                "Team must have at least one member".to_string(),
            ));
        }

        if self.exceeds_capacity() {
            return Err(TeamsError::Validation(
                "Member count exceeds team capacity".to_string(),
            ));
        }

        Ok(())
    }
}

/// Membership entity - association between a user and a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Uuid,
    pub team_id: Uuid,
    pub user_id: Uuid,
    pub role: MembershipRole,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(team_id: Uuid, user_id: Uuid, role: MembershipRole) -> Self {
        Membership {
            id: Uuid::new_v4(),
            team_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }
}

/// A team together with the requesting user's role in it
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamWithRole {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub team: Team,
    pub user_role: MembershipRole,
}

/// Admin edits to a team. `None` leaves a field untouched; for the
/// nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub team_type: Option<TeamType>,
    pub status: Option<TeamStatus>,
    pub max_members: Option<Option<i32>>,
}

impl TeamChanges {
    pub fn is_empty(&self) -> bool {
        self == &TeamChanges::default()
    }

    /// Validate field formats. Capacity against the live member count is
    /// checked by the store under the same lock as joins.
    pub fn validate(&self) -> Result<(), TeamsError> {
        if let Some(ref name) = self.name {
            validate_team_name(name).map_err(TeamsError::Validation)?;
        }
        if let Some(Some(ref description)) = self.description {
            validate_team_description(description.trim()).map_err(TeamsError::Validation)?;
        }
        if let Some(Some(max_members)) = self.max_members {
            validate_max_members(max_members).map_err(TeamsError::Validation)?;
        }
        Ok(())
    }

    /// Apply the edits to a team and bump `updated_at`
    pub fn apply(&self, team: &mut Team) {
        if let Some(ref name) = self.name {
            team.name = name.trim().to_string();
        }
        if let Some(ref description) = self.description {
            team.description = normalize_description(description.clone());
        }
        if let Some(team_type) = self.team_type {
            team.team_type = team_type;
        }
        if let Some(status) = self.status {
            team.status = status;
        }
        if let Some(max_members) = self.max_members {
            team.max_members = max_members;
        }
        team.updated_at = Utc::now();
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
