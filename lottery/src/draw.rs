//! Prize tiers and winner selection.
//!
//! Every ticket in play goes into a [`TicketPool`] tagged with its owner.
//! Tiers draw from the pool in order (grand, second, third) and drawn tickets
//! never go back, so no ticket can win twice in one round.

use std::fmt;

use crate::{
    config::PrizeConfig,
    player::{Player, PlayerId},
    random::RandomSource,
};

/// One of the three prize categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrizeTier {
    Grand,
    Second,
    Third,
}

impl PrizeTier {
    pub const ALL: [PrizeTier; 3] = [PrizeTier::Grand, PrizeTier::Second, PrizeTier::Third];

    /// Share of round revenue paid out for this tier, in percent.
    pub fn prize_percent(self, prizes: &PrizeConfig) -> u64 {
        match self {
            PrizeTier::Grand => prizes.grand_percent,
            PrizeTier::Second => prizes.second_percent,
            PrizeTier::Third => prizes.third_percent,
        }
    }

    /// Prize for this tier given the round revenue, rounded down.
    pub fn prize_amount(self, revenue: u64, prizes: &PrizeConfig) -> u64 {
        percent_of(revenue, self.prize_percent(prizes))
    }

    pub fn label(self) -> &'static str {
        match self {
            PrizeTier::Grand => "Grand Prize",
            PrizeTier::Second => "2nd Place",
            PrizeTier::Third => "3rd Place",
        }
    }
}

impl fmt::Display for PrizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `amount * percent / 100`, rounded down.
pub fn percent_of(amount: u64, percent: u64) -> u64 {
    amount * percent / 100
}

/// Number of tickets to draw for a multi-winner tier.
///
/// `ceil(pool_size * percent / 100)`, at least one, never more than the pool
/// holds. An empty pool yields zero.
pub fn winner_ticket_count(pool_size: usize, percent: u64) -> usize {
    if pool_size == 0 {
        return 0;
    }
    let wanted = (pool_size as u64 * percent).div_ceil(100).max(1);
    (wanted as usize).min(pool_size)
}

/// Even split of a prize among winners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Split {
    /// Amount every winner receives.
    pub per_winner: u64,
    /// Units left over after the even split.
    pub remainder: u64,
}

/// Split `prize` among `winners`, or `None` if there are no winners.
pub fn split_prize(prize: u64, winners: usize) -> Option<Split> {
    if winners == 0 {
        return None;
    }
    let n = winners as u64;
    Some(Split {
        per_winner: prize / n,
        remainder: prize % n,
    })
}

/// A ticket in play, tagged with its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolEntry {
    pub ticket_number: u64,
    pub owner: PlayerId,
}

/// Tickets still eligible to win this round.
#[derive(Clone, Debug, Default)]
pub struct TicketPool {
    entries: Vec<PoolEntry>,
}

impl TicketPool {
    /// Collect every ticket held by `players`, in player order.
    pub fn from_players(players: &[Player]) -> Self {
        let entries = players
            .iter()
            .flat_map(|p| {
                p.tickets.iter().map(move |t| PoolEntry {
                    ticket_number: t.number(),
                    owner: p.id,
                })
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Draw a single ticket uniformly at random and take it out of the pool.
    pub fn draw_one(&mut self, random: &mut impl RandomSource) -> Option<PoolEntry> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = random.next(self.entries.len() as u64) as usize;
        Some(self.entries.remove(idx))
    }

    /// Draw `count` distinct tickets uniformly at random and take them out of
    /// the pool.
    ///
    /// Partial Fisher-Yates: position `i` is swapped with a uniformly chosen
    /// position in `[i, len)`, and the first `count` positions are the sample.
    pub fn draw_many(&mut self, count: usize, random: &mut impl RandomSource) -> Vec<PoolEntry> {
        let count = count.min(self.entries.len());
        let len = self.entries.len();
        for i in 0..count {
            let j = i + random.next((len - i) as u64) as usize;
            self.entries.swap(i, j);
        }
        self.entries.drain(..count).collect()
    }
}

/// Owners of the drawn tickets, first appearance first.
///
/// A player holding several drawn tickets wins once.
pub fn distinct_owners(entries: &[PoolEntry]) -> Vec<PlayerId> {
    let mut owners: Vec<PlayerId> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !owners.contains(&entry.owner) {
            owners.push(entry.owner);
        }
    }
    owners
}
