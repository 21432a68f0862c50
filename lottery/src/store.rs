//! Player storage.
//!
//! The store is the single source of truth for which players exist. The
//! engine works on snapshots returned by [`PlayerStore::list`] and writes
//! every change back through [`PlayerStore::update`].

use std::{
    collections::BTreeMap,
    sync::{PoisonError, RwLock},
};

#[cfg(test)]
use mockall::automock;

use crate::{
    error::{LotteryError, LotteryResult},
    player::{Player, PlayerId},
};

/// Keyed collection of players.
///
/// Each call must be atomic and immediately visible to later calls; keeping
/// that true under concurrent access is the implementation's job.
#[cfg_attr(test, automock)]
pub trait PlayerStore: Send + Sync {
    /// Insert a new player. Fails with `DuplicatePlayer` if the id is taken.
    fn add(&self, player: Player) -> LotteryResult<()>;

    /// Replace the stored player with the same id. Fails with
    /// `PlayerNotFound` if no such player exists.
    fn update(&self, player: &Player) -> LotteryResult<()>;

    /// Delete a player by id. Returns whether a player was removed; removing
    /// an absent id is not an error.
    fn remove(&self, id: PlayerId) -> bool;

    /// Snapshot of all players, ordered by id.
    fn list(&self) -> Vec<Player>;

    /// Look up a single player.
    fn get_by_id(&self, id: PlayerId) -> LotteryResult<Player>;
}

/// In-memory [`PlayerStore`] backed by an ordered map.
#[derive(Debug, Default)]
pub struct InMemoryPlayerStore {
    players: RwLock<BTreeMap<PlayerId, Player>>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PlayerStore for InMemoryPlayerStore {
    fn add(&self, player: Player) -> LotteryResult<()> {
        let mut players = self.players.write().unwrap_or_else(PoisonError::into_inner);
        if players.contains_key(&player.id) {
            return Err(LotteryError::DuplicatePlayer(player.id));
        }
        players.insert(player.id, player);
        Ok(())
    }

    fn update(&self, player: &Player) -> LotteryResult<()> {
        let mut players = self.players.write().unwrap_or_else(PoisonError::into_inner);
        match players.get_mut(&player.id) {
            Some(stored) => {
                *stored = player.clone();
                Ok(())
            }
            None => Err(LotteryError::PlayerNotFound(player.id)),
        }
    }

    fn remove(&self, id: PlayerId) -> bool {
        self.players
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .is_some()
    }

    fn list(&self) -> Vec<Player> {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    fn get_by_id(&self, id: PlayerId) -> LotteryResult<Player> {
        self.players
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(LotteryError::PlayerNotFound(id))
    }
}
