//! Postgres-backed [`PlayerStore`].

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::models::{Player, PlayerFields, PlayerStats, Position};
use super::validation::PlayerPayload;
use super::PlayerStore;
use crate::error::{Error, Result};

const COLUMNS: &str = "id, name, position, team, age, nationality, \
                       goals, assists, matches, yellow_cards, red_cards, \
                       market_value, created_at, updated_at";

/// Newest first; `seq` breaks ties between equal timestamps.
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, seq DESC";

#[derive(Debug, FromRow)]
struct PlayerRow {
    id: Uuid,
    name: String,
    position: String,
    team: String,
    age: i32,
    nationality: String,
    goals: i32,
    assists: i32,
    matches: i32,
    yellow_cards: i32,
    red_cards: i32,
    market_value: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlayerRow> for Player {
    type Error = Error;

    fn try_from(r: PlayerRow) -> Result<Self> {
        let position: Position = r.position.parse().map_err(|e: String| anyhow!(e))?;
        Ok(Player {
            id: r.id,
            name: r.name,
            position,
            team: r.team,
            age: r.age,
            nationality: r.nationality,
            stats: PlayerStats {
                goals: r.goals,
                assists: r.assists,
                matches: r.matches,
                yellow_cards: r.yellow_cards,
                red_cards: r.red_cards,
            },
            market_value: r.market_value,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

fn rows_to_players(rows: Vec<PlayerRow>) -> Result<Vec<Player>> {
    rows.into_iter().map(Player::try_from).collect()
}

/// Escape `LIKE` metacharacters so the query is matched literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

pub struct PgPlayerStore {
    db: PgPool,
}

impl PgPlayerStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlayerStore for PgPlayerStore {
    async fn list_all(&self) -> Result<Vec<Player>> {
        let rows = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {COLUMNS} FROM players {NEWEST_FIRST}"
        ))
        .fetch_all(&self.db)
        .await
        .context("listing players")?;
        rows_to_players(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Player>> {
        sqlx::query_as::<_, PlayerRow>(&format!("SELECT {COLUMNS} FROM players WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("fetching player")?
            .map(Player::try_from)
            .transpose()
    }

    async fn insert(&self, fields: PlayerFields) -> Result<Player> {
        let player = Player::create(fields, Utc::now());
        let row = sqlx::query_as::<_, PlayerRow>(&format!(
            "INSERT INTO players ({COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        ))
        .bind(player.id)
        .bind(&player.name)
        .bind(player.position.as_str())
        .bind(&player.team)
        .bind(player.age)
        .bind(&player.nationality)
        .bind(player.stats.goals)
        .bind(player.stats.assists)
        .bind(player.stats.matches)
        .bind(player.stats.yellow_cards)
        .bind(player.stats.red_cards)
        .bind(player.market_value)
        .bind(player.created_at)
        .bind(player.updated_at)
        .fetch_one(&self.db)
        .await
        .context("inserting player")?;

        row.try_into()
    }

    async fn update(&self, id: Uuid, patch: PlayerPayload) -> Result<Player> {
        let mut player = self.find_by_id(id).await?.ok_or(Error::NotFound("Player"))?;
        let fields = patch.merged_onto(&player).validate()?;
        player.overwrite(fields, Utc::now());

        let row = sqlx::query_as::<_, PlayerRow>(&format!(
            "UPDATE players
                SET name = $2, position = $3, team = $4, age = $5, nationality = $6,
                    goals = $7, assists = $8, matches = $9, yellow_cards = $10,
                    red_cards = $11, market_value = $12, updated_at = $13
              WHERE id = $1
          RETURNING {COLUMNS}"
        ))
        .bind(player.id)
        .bind(&player.name)
        .bind(player.position.as_str())
        .bind(&player.team)
        .bind(player.age)
        .bind(&player.nationality)
        .bind(player.stats.goals)
        .bind(player.stats.assists)
        .bind(player.stats.matches)
        .bind(player.stats.yellow_cards)
        .bind(player.stats.red_cards)
        .bind(player.market_value)
        .bind(player.updated_at)
        .fetch_optional(&self.db)
        .await
        .context("updating player")?
        .ok_or(Error::NotFound("Player"))?;

        row.try_into()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let rows = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("deleting player")?
            .rows_affected();

        if rows == 0 {
            Err(Error::NotFound("Player"))
        } else {
            Ok(())
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<Player>> {
        let rows = sqlx::query_as::<_, PlayerRow>(&format!(
            "SELECT {COLUMNS} FROM players
              WHERE name ILIKE $1 OR team ILIKE $1
                 OR position ILIKE $1 OR nationality ILIKE $1
              {NEWEST_FIRST}"
        ))
        .bind(like_pattern(query))
        .fetch_all(&self.db)
        .await
        .context("searching players")?;
        rows_to_players(rows)
    }
}
