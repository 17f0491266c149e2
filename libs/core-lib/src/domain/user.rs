use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// --- Roles ---

/// Authorization level attached to a user.
///
/// Checks are done by set membership (`allowed.contains(&role)`), never by
/// comparing roles as ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Visitor,
    Member,
    Collaborator,
    Administrator,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Visitor,
        Role::Member,
        Role::Collaborator,
        Role::Administrator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Visitor => "visitor",
            Role::Member => "member",
            Role::Collaborator => "collaborator",
            Role::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("Invalid role: {0}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RoleParseError(s.to_string()))
    }
}

/// Account state, stored and serialized as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum UserStatus {
    #[default]
    Active,
    Deleted,
    Blocked,
}

impl From<UserStatus> for i32 {
    fn from(status: UserStatus) -> Self {
        match status {
            UserStatus::Active => 1,
            UserStatus::Deleted => 2,
            UserStatus::Blocked => 3,
        }
    }
}

impl TryFrom<i32> for UserStatus {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(UserStatus::Active),
            2 => Ok(UserStatus::Deleted),
            3 => Ok(UserStatus::Blocked),
            other => Err(format!("unknown user status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum AvatarType {
    #[default]
    Letter,
    Gravatar,
    Custom,
}

impl From<AvatarType> for i32 {
    fn from(avatar: AvatarType) -> Self {
        match avatar {
            AvatarType::Letter => 1,
            AvatarType::Gravatar => 2,
            AvatarType::Custom => 3,
        }
    }
}

impl TryFrom<i32> for AvatarType {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(AvatarType::Letter),
            2 => Ok(AvatarType::Gravatar),
            3 => Ok(AvatarType::Custom),
            other => Err(format!("unknown avatar type: {other}")),
        }
    }
}

// --- User ---

/// Relationship between a user and an external authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProvider {
    pub name: String,
    pub uid: String,
}

/// A user inside a tenant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    #[serde(skip)]
    pub avatar_blob_key: String,
    #[serde(skip)]
    pub avatar_type: AvatarType,
    #[serde(rename = "avatarURL", default, skip_serializing_if = "String::is_empty")]
    pub avatar_url: String,
    #[serde(skip)]
    pub providers: Vec<UserProvider>,
}

impl User {
    /// True if the user has registered with the given provider.
    pub fn has_provider(&self, provider: &str) -> bool {
        self.providers.iter().any(|p| p.name == provider)
    }

    /// Collaborators and administrators have moderation permissions.
    pub fn is_collaborator(&self) -> bool {
        matches!(self.role, Role::Collaborator | Role::Administrator)
    }

    pub fn is_administrator(&self) -> bool {
        self.role == Role::Administrator
    }
}

/// Author fields copied onto an idea or comment when it is read.
///
/// This is a snapshot taken by the repository query, not a live reference to
/// the `users` row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}
