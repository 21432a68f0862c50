//! Players and their ticket holdings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ticket::Ticket;

/// Balance given to new players and bots unless configured otherwise.
pub const DEFAULT_STARTING_MONEY: u64 = 10;

/// Unique identifier for a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl PlayerId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The id following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u64> for PlayerId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lottery participant.
///
/// `money` never goes negative: every ticket added is paid for out of the
/// balance, so the number of held tickets always equals what was spent on
/// them this round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub money: u64,
    pub tickets: Vec<Ticket>,
}

impl Player {
    /// Create a player with [`DEFAULT_STARTING_MONEY`] and no tickets.
    pub fn new(id: u64) -> Self {
        Self::with_money(id, DEFAULT_STARTING_MONEY)
    }

    /// Create a player with a specific balance.
    pub fn with_money(id: u64, money: u64) -> Self {
        Self {
            id: PlayerId(id),
            money,
            tickets: Vec::new(),
        }
    }

    pub fn has_money(&self) -> bool {
        self.money > 0
    }

    /// Whether the balance covers `count` tickets.
    pub fn can_purchase(&self, count: u64) -> bool {
        self.money >= count
    }

    /// Add already-issued tickets and pay for them.
    ///
    /// Returns `false` and leaves the player untouched when the tickets cost
    /// more than the balance.
    #[must_use]
    pub fn purchase_tickets(&mut self, tickets: Vec<Ticket>) -> bool {
        let cost: u64 = tickets.iter().map(Ticket::price).sum();
        let Some(money) = self.money.checked_sub(cost) else {
            return false;
        };
        self.money = money;
        self.tickets.extend(tickets);
        true
    }

    /// Total value of the tickets currently held.
    pub fn ticket_value(&self) -> u64 {
        self.tickets.iter().map(Ticket::price).sum()
    }

    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }

    /// Credit a prize payout.
    pub fn credit(&mut self, amount: u64) {
        self.money += amount;
    }

    pub fn clear_tickets(&mut self) {
        self.tickets.clear();
    }
}
