//! In-memory stores (demo mode and tests). Data is lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use super::models::{NewUser, Player, PlayerFields, User, UserPatch};
use super::validation::PlayerPayload;
use super::{PlayerStore, UserStore};
use crate::error::{Error, Result};

/// A stored value tagged with its insertion sequence, used to break
/// timestamp ties when ordering.
#[derive(Debug, Clone)]
struct Slot<T> {
    seq: u64,
    value: T,
}

//////////////////////////////////////////////////
// Users
//////////////////////////////////////////////////

#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<Uuid, Slot<User>>,
    /// email → id; the entry API makes the uniqueness check atomic.
    emails: DashMap<String, Uuid>,
    seq: AtomicU64,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let Some(id) = self.emails.get(email).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|s| s.value.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|s| s.value.clone()))
    }

    async fn insert(&self, new: NewUser) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: Utc::now(),
        };

        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => return Err(Error::DuplicateEmail),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.users.insert(
            user.id,
            Slot {
                seq,
                value: user.clone(),
            },
        );
        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User> {
        let current_email = self
            .users
            .get(&id)
            .map(|s| s.value.email.clone())
            .ok_or(Error::NotFound("User"))?;

        let new_email = patch.email.filter(|e| *e != current_email);
        if let Some(email) = &new_email {
            match self.emails.entry(email.clone()) {
                Entry::Occupied(_) => return Err(Error::DuplicateEmail),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
        }

        let Some(mut slot) = self.users.get_mut(&id) else {
            // Deleted concurrently; release the reservation made above.
            if let Some(email) = &new_email {
                self.emails.remove_if(email, |_, owner| *owner == id);
            }
            return Err(Error::NotFound("User"));
        };
        let stored = &mut slot.value;
        if let Some(name) = patch.name {
            stored.name = name;
        }
        if let Some(role) = patch.role {
            stored.role = role;
        }
        if let Some(email) = new_email {
            let old = std::mem::replace(&mut stored.email, email);
            self.emails.remove_if(&old, |_, owner| *owner == id);
        }
        Ok(stored.clone())
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> Result<()> {
        let mut slot = self.users.get_mut(&id).ok_or(Error::NotFound("User"))?;
        slot.value.password_hash = password_hash;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let (_, slot) = self.users.remove(&id).ok_or(Error::NotFound("User"))?;
        self.emails.remove_if(&slot.value.email, |_, owner| *owner == id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>> {
        let mut slots: Vec<Slot<User>> = self.users.iter().map(|e| e.value().clone()).collect();
        slots.sort_by_key(|s| s.seq);
        Ok(slots.into_iter().map(|s| s.value).collect())
    }
}

//////////////////////////////////////////////////
// Players
//////////////////////////////////////////////////

#[derive(Default)]
pub struct MemoryPlayerStore {
    players: DashMap<Uuid, Slot<Player>>,
    seq: AtomicU64,
}

impl MemoryPlayerStore {
    fn newest_first<F>(&self, keep: F) -> Vec<Player>
    where
        F: Fn(&Player) -> bool,
    {
        let mut slots: Vec<Slot<Player>> = self
            .players
            .iter()
            .filter(|e| keep(&e.value().value))
            .map(|e| e.value().clone())
            .collect();
        slots.sort_by(|a, b| {
            b.value
                .created_at
                .cmp(&a.value.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        slots.into_iter().map(|s| s.value).collect()
    }
}

#[async_trait]
impl PlayerStore for MemoryPlayerStore {
    async fn list_all(&self) -> Result<Vec<Player>> {
        Ok(self.newest_first(|_| true))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Player>> {
        Ok(self.players.get(&id).map(|s| s.value.clone()))
    }

    async fn insert(&self, fields: PlayerFields) -> Result<Player> {
        let player = Player::create(fields, Utc::now());
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.players.insert(
            player.id,
            Slot {
                seq,
                value: player.clone(),
            },
        );
        Ok(player)
    }

    async fn update(&self, id: Uuid, patch: PlayerPayload) -> Result<Player> {
        let mut slot = self.players.get_mut(&id).ok_or(Error::NotFound("Player"))?;
        let fields = patch.merged_onto(&slot.value).validate()?;
        slot.value.overwrite(fields, Utc::now());
        Ok(slot.value.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.players
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NotFound("Player"))
    }

    async fn search(&self, query: &str) -> Result<Vec<Player>> {
        let needle = query.to_lowercase();
        Ok(self.newest_first(|p| p.matches(&needle)))
    }
}
