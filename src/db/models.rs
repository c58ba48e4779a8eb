use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//////////////////////////////////////////////////
// Users
//////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Account data handed to a store; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Profile fields an admin may change; `None` leaves the stored value.
/// The password hash is only written through `UserStore::set_password`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

/// Client-facing shape of a [`User`]. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(u: &User) -> Self {
        UserView {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role,
            created_at: u.created_at,
        }
    }
}

//////////////////////////////////////////////////
// Players
//////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    Striker,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
        Position::Striker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
            Position::Striker => "Striker",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown position `{s}`"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub goals: i32,
    pub assists: i32,
    pub matches: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
}

/// Validated player fields, produced by `validation::PlayerPayload`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFields {
    pub name: String,
    pub position: Position,
    pub team: String,
    pub age: i32,
    pub nationality: String,
    pub stats: PlayerStats,
    pub market_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub position: Position,
    pub team: String,
    pub age: i32,
    pub nationality: String,
    pub stats: PlayerStats,
    pub market_value: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Fresh record with server-assigned id and timestamps.
    pub fn create(fields: PlayerFields, now: DateTime<Utc>) -> Self {
        Player {
            id: Uuid::new_v4(),
            name: fields.name,
            position: fields.position,
            team: fields.team,
            age: fields.age,
            nationality: fields.nationality,
            stats: fields.stats,
            market_value: fields.market_value,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace every mutable field and bump `updated_at`.
    pub fn overwrite(&mut self, fields: PlayerFields, now: DateTime<Utc>) {
        self.name = fields.name;
        self.position = fields.position;
        self.team = fields.team;
        self.age = fields.age;
        self.nationality = fields.nationality;
        self.stats = fields.stats;
        self.market_value = fields.market_value;
        self.updated_at = now;
    }

    /// Case-insensitive substring match over name, team, position and nationality.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        [
            self.name.as_str(),
            self.team.as_str(),
            self.position.as_str(),
            self.nationality.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}
