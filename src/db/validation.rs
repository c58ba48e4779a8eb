//! Field-level validation for request bodies.
//!
//! Player payloads are deliberately loose (every field optional, position as
//! a plain string) so that a bad value is reported against its field instead
//! of failing JSON decoding wholesale. Checks run in declaration order and the
//! first failure wins.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::db::models::{Player, PlayerFields, PlayerStats, Position};
use crate::error::{Error, Result};

pub const MIN_AGE: i64 = 16;
pub const MAX_AGE: i64 = 50;
pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload {
    #[serde(default, deserialize_with = "whole_number")]
    pub goals: Option<i64>,
    #[serde(default, deserialize_with = "whole_number")]
    pub assists: Option<i64>,
    #[serde(default, deserialize_with = "whole_number")]
    pub matches: Option<i64>,
    #[serde(default, deserialize_with = "whole_number")]
    pub yellow_cards: Option<i64>,
    #[serde(default, deserialize_with = "whole_number")]
    pub red_cards: Option<i64>,
}

/// Body of `POST /api/players` and `PUT /api/players/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    pub name: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    pub age: Option<i64>,
    pub nationality: Option<String>,
    pub stats: Option<StatsPayload>,
    pub market_value: Option<f64>,
}

impl From<&Player> for PlayerPayload {
    fn from(p: &Player) -> Self {
        PlayerPayload {
            name: Some(p.name.clone()),
            position: Some(p.position.as_str().to_owned()),
            team: Some(p.team.clone()),
            age: Some(i64::from(p.age)),
            nationality: Some(p.nationality.clone()),
            stats: Some(StatsPayload {
                goals: Some(i64::from(p.stats.goals)),
                assists: Some(i64::from(p.stats.assists)),
                matches: Some(i64::from(p.stats.matches)),
                yellow_cards: Some(i64::from(p.stats.yellow_cards)),
                red_cards: Some(i64::from(p.stats.red_cards)),
            }),
            market_value: Some(p.market_value),
        }
    }
}

impl PlayerPayload {
    /// Overlay this (partial) payload on `current`. Absent fields keep the
    /// stored value; `stats` merges counter by counter.
    pub fn merged_onto(self, current: &Player) -> PlayerPayload {
        let base = PlayerPayload::from(current);
        let base_stats = base.stats.unwrap_or_default();
        let stats = match self.stats {
            Some(s) => StatsPayload {
                goals: s.goals.or(base_stats.goals),
                assists: s.assists.or(base_stats.assists),
                matches: s.matches.or(base_stats.matches),
                yellow_cards: s.yellow_cards.or(base_stats.yellow_cards),
                red_cards: s.red_cards.or(base_stats.red_cards),
            },
            None => base_stats,
        };

        PlayerPayload {
            name: self.name.or(base.name),
            position: self.position.or(base.position),
            team: self.team.or(base.team),
            age: self.age.or(base.age),
            nationality: self.nationality.or(base.nationality),
            stats: Some(stats),
            market_value: self.market_value.or(base.market_value),
        }
    }

    pub fn validate(self) -> Result<PlayerFields> {
        let name = required_text(self.name, "name", "Player name is required")?;
        if name.chars().count() < MIN_NAME_LEN {
            return Err(Error::validation(
                "name",
                "Player name must be at least 2 characters long",
            ));
        }

        let position = match self.position {
            None => return Err(Error::validation("position", "Position is required")),
            Some(raw) => raw.trim().parse::<Position>().map_err(|_| {
                Error::validation(
                    "position",
                    "Position must be one of Goalkeeper, Defender, Midfielder, Forward, Striker",
                )
            })?,
        };

        let team = required_text(self.team, "team", "Team is required")?;

        let age = match self.age {
            None => return Err(Error::validation("age", "Age is required")),
            Some(a) if a < MIN_AGE => {
                return Err(Error::validation("age", "Age must be at least 16"))
            }
            Some(a) if a > MAX_AGE => {
                return Err(Error::validation("age", "Age must be at most 50"))
            }
            // 16..=50 always fits.
            Some(a) => a as i32,
        };

        let nationality = required_text(self.nationality, "nationality", "Nationality is required")?;

        let stats = self.stats.unwrap_or_default();
        let stats = PlayerStats {
            goals: counter(stats.goals, "stats.goals")?,
            assists: counter(stats.assists, "stats.assists")?,
            matches: counter(stats.matches, "stats.matches")?,
            yellow_cards: counter(stats.yellow_cards, "stats.yellowCards")?,
            red_cards: counter(stats.red_cards, "stats.redCards")?,
        };

        let market_value = self.market_value.unwrap_or(0.0);
        if !market_value.is_finite() || market_value < 0.0 {
            return Err(Error::validation(
                "marketValue",
                "Market value must be a non-negative number",
            ));
        }

        Ok(PlayerFields {
            name,
            position,
            team,
            age,
            nationality,
            stats,
            market_value,
        })
    }
}

fn required_text(value: Option<String>, field: &str, message: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_owned()),
        _ => Err(Error::validation(field, message)),
    }
}

/// JSON numbers arrive as integers or floats; `30.0` is accepted as `30`.
fn whole_number<'de, D>(de: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(n) = Option::<serde_json::Number>::deserialize(de)? else {
        return Ok(None);
    };
    if let Some(i) = n.as_i64() {
        return Ok(Some(i));
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => Ok(Some(f as i64)),
        _ => Err(de::Error::custom(format!("expected a whole number, found {n}"))),
    }
}

fn counter(value: Option<i64>, field: &str) -> Result<i32> {
    let v = value.unwrap_or(0);
    i32::try_from(v)
        .ok()
        .filter(|v| *v >= 0)
        .ok_or_else(|| Error::validation(field, format!("{field} must be a non-negative integer")))
}

//////////////////////////////////////////////////
// Account fields
//////////////////////////////////////////////////

/// Trimmed, lowercased email with a non-empty local part and a dotted domain.
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(Error::validation("email", "Please enter a valid email"))
    }
}

pub fn account_name(raw: &str) -> Result<String> {
    required_text(Some(raw.to_owned()), "name", "Name is required")
}

pub fn password(raw: &str, field: &str) -> Result<()> {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::validation(
            field,
            "Password must be at least 6 characters long",
        ));
    }
    Ok(())
}
