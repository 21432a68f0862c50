//! Round orchestration.
//!
//! A round runs as one synchronous sequence:
//!
//! 1. Top the population up with bots until it reaches a random target.
//! 2. Every bot buys a random number of tickets.
//! 3. Revenue is the value of all tickets in play.
//! 4. Grand, second and third prizes are drawn and paid.
//! 5. Broke players are removed and all tickets are discarded.
//!
//! The engine narrates nothing. It returns a [`RoundSummary`] for the caller
//! to render.

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, info};

use crate::{
    config::{LotteryConfig, RemainderPolicy},
    draw::{distinct_owners, split_prize, winner_ticket_count, PrizeTier, TicketPool},
    error::{LotteryError, LotteryResult},
    player::{Player, PlayerId},
    random::RandomSource,
    store::PlayerStore,
    ticket::{TicketSequence, TICKET_PRICE},
};

/// Result of a ticket purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// The player had no money; nothing changed.
    CannotAfford,
    /// `count` tickets were bought. `clamped` is set when the request
    /// exceeded the balance.
    Purchased { count: u64, clamped: bool },
}

impl PurchaseOutcome {
    /// Tickets actually bought.
    pub fn count(&self) -> u64 {
        match self {
            PurchaseOutcome::CannotAfford => 0,
            PurchaseOutcome::Purchased { count, .. } => *count,
        }
    }
}

/// Tickets bought by a bot at the start of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BotEntry {
    pub player: PlayerId,
    pub tickets: u64,
}

/// Amount credited to one winner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    pub player: PlayerId,
    pub amount: u64,
}

/// How one prize tier was settled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierOutcome {
    pub tier: PrizeTier,
    /// Prize for the tier before splitting.
    pub prize: u64,
    /// Even share per winner (0 with no winners).
    pub split: u64,
    /// Winners in selection order.
    pub payouts: Vec<Payout>,
    /// Amount booked as house profit for this tier.
    pub house_share: u64,
}

impl TierOutcome {
    pub fn has_winners(&self) -> bool {
        !self.payouts.is_empty()
    }

    /// Total credited to winners.
    pub fn total_paid(&self) -> u64 {
        self.payouts.iter().map(|p| p.amount).sum()
    }
}

/// Everything that happened in one round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    /// 1-based round number.
    pub round: u64,
    /// Population target drawn for this round.
    pub target_players: usize,
    /// Bots created to reach the target.
    pub bots_added: Vec<PlayerId>,
    /// Tickets bought by bots.
    pub bot_entries: Vec<BotEntry>,
    pub total_revenue: u64,
    pub tiers: Vec<TierOutcome>,
    /// House profit booked this round.
    pub house_profit_delta: u64,
    /// Cumulative house profit after this round.
    pub house_profit: u64,
    /// Players removed for having no money left.
    pub removed: Vec<PlayerId>,
}

impl RoundSummary {
    pub fn tier(&self, tier: PrizeTier) -> Option<&TierOutcome> {
        self.tiers.iter().find(|t| t.tier == tier)
    }

    /// Total credited to winners across all tiers.
    pub fn total_paid(&self) -> u64 {
        self.tiers.iter().map(TierOutcome::total_paid).sum()
    }
}

/// Runs lottery rounds against a player store.
pub struct LotteryEngine<S, R> {
    store: S,
    random: R,
    config: LotteryConfig,
    tickets: Arc<TicketSequence>,
    house_profit: u64,
    rounds_played: u64,
}

impl<S: PlayerStore, R: RandomSource> LotteryEngine<S, R> {
    /// Engine with the default configuration.
    pub fn new(store: S, random: R) -> Self {
        Self {
            store,
            random,
            config: LotteryConfig::default(),
            tickets: Arc::new(TicketSequence::new()),
            house_profit: 0,
            rounds_played: 0,
        }
    }

    /// Engine with a custom configuration. The configuration is validated.
    pub fn with_config(store: S, random: R, config: LotteryConfig) -> LotteryResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new(store, random)
        })
    }

    /// Issue tickets from a shared sequence instead of a private one.
    pub fn with_ticket_sequence(mut self, tickets: Arc<TicketSequence>) -> Self {
        self.tickets = tickets;
        self
    }

    pub fn config(&self) -> &LotteryConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ticket_sequence(&self) -> &Arc<TicketSequence> {
        &self.tickets
    }

    /// Cumulative house profit since creation or the last reset.
    pub fn house_profit(&self) -> u64 {
        self.house_profit
    }

    pub fn reset_house_profit(&mut self) {
        self.house_profit = 0;
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    pub fn add_player(&self, player: Player) -> LotteryResult<()> {
        debug!(player = %player.id, money = player.money, "adding player");
        self.store.add(player)
    }

    pub fn player(&self, id: PlayerId) -> LotteryResult<Player> {
        self.store.get_by_id(id)
    }

    pub fn players(&self) -> Vec<Player> {
        self.store.list()
    }

    /// Whether `player` still has money according to the store. A player no
    /// longer in the store has none.
    pub fn user_has_money(&self, player: &Player) -> bool {
        self.store
            .get_by_id(player.id)
            .is_ok_and(|stored| stored.has_money())
    }

    /// Buy up to `requested` tickets for `player` and persist the result.
    ///
    /// The purchase is applied to the stored player, so a stale `player`
    /// never overwrites balance changes made since it was loaded. `player` is
    /// refreshed from the result only once the store accepts it. The purchase
    /// is capped at what the player can afford, and a player with no money is
    /// left untouched.
    pub fn purchase_tickets(
        &self,
        player: &mut Player,
        requested: u64,
    ) -> LotteryResult<PurchaseOutcome> {
        let mut stored = self.store.get_by_id(player.id)?;
        if !stored.has_money() {
            debug!(player = %stored.id, "cannot afford any tickets");
            *player = stored;
            return Ok(PurchaseOutcome::CannotAfford);
        }

        let affordable = requested.min(stored.money / TICKET_PRICE);
        if !stored.purchase_tickets(self.tickets.issue(affordable)) {
            return Ok(PurchaseOutcome::CannotAfford);
        }
        self.store.update(&stored)?;

        debug!(
            player = %stored.id,
            requested,
            bought = affordable,
            money = stored.money,
            "purchased tickets"
        );
        *player = stored;
        Ok(PurchaseOutcome::Purchased {
            count: affordable,
            clamped: affordable < requested,
        })
    }

    /// Run one complete round.
    pub fn run_lottery(&mut self) -> LotteryResult<RoundSummary> {
        let round = self.rounds_played + 1;
        let (target_players, bots_added) = self.ensure_minimum_players()?;

        let mut players = self.store.list();
        let bot_entries = self.purchase_bot_tickets(&mut players)?;

        let total_revenue: u64 = players.iter().map(Player::ticket_value).sum();
        info!(round, players = players.len(), total_revenue, "drawing lottery");

        let tiers = self.distribute_prizes(&mut players, total_revenue)?;
        let house_profit_delta: u64 = tiers.iter().map(|t| t.house_share).sum();

        let removed = self.remove_broke_players(&players);
        self.reset_tickets()?;

        self.rounds_played = round;
        info!(
            round,
            house_profit_delta,
            house_profit = self.house_profit,
            removed = removed.len(),
            "round complete"
        );

        Ok(RoundSummary {
            round,
            target_players,
            bots_added,
            bot_entries,
            total_revenue,
            tiers,
            house_profit_delta,
            house_profit: self.house_profit,
            removed,
        })
    }

    /// Clear every player's tickets and persist.
    pub fn reset_tickets(&self) -> LotteryResult<()> {
        for mut player in self.store.list() {
            player.clear_tickets();
            self.store.update(&player)?;
        }
        Ok(())
    }

    /// Add bots until the store holds a random target of players.
    ///
    /// Returns the target and the ids of the bots created. A store already at
    /// or above the target is left alone.
    fn ensure_minimum_players(&mut self) -> LotteryResult<(usize, Vec<PlayerId>)> {
        let existing = self.store.list();
        let target = self.config.min_players
            + self.random.next(self.config.extra_players as u64 + 1) as usize;

        // Fresh ids start past every id in use, and never reuse the human's.
        let mut next_id = existing
            .iter()
            .map(|p| p.id)
            .max()
            .unwrap_or(self.config.human_id)
            .max(self.config.human_id)
            .next();

        let mut added = Vec::new();
        for _ in existing.len()..target {
            let bot = Player::with_money(next_id.0, self.config.starting_money);
            self.store.add(bot)?;
            debug!(player = %next_id, "bot joined");
            added.push(next_id);
            next_id = next_id.next();
        }

        Ok((target, added))
    }

    fn purchase_bot_tickets(&mut self, players: &mut [Player]) -> LotteryResult<Vec<BotEntry>> {
        let mut entries = Vec::new();
        for player in players.iter_mut() {
            if player.id == self.config.human_id || !player.has_money() {
                continue;
            }
            let cap = self.config.max_bot_tickets.min(player.money);
            let wanted = self.random.next_range(1, cap + 1);
            let bought = self.purchase_tickets(player, wanted)?.count();
            entries.push(BotEntry {
                player: player.id,
                tickets: bought,
            });
        }
        Ok(entries)
    }

    fn distribute_prizes(
        &mut self,
        players: &mut [Player],
        total_revenue: u64,
    ) -> LotteryResult<Vec<TierOutcome>> {
        let prizes = self.config.prizes.clone();
        let mut pool = TicketPool::from_players(players);
        let index: HashMap<PlayerId, usize> =
            players.iter().enumerate().map(|(i, p)| (p.id, i)).collect();

        let mut outcomes = Vec::with_capacity(PrizeTier::ALL.len());
        for tier in PrizeTier::ALL {
            let winners = match tier {
                PrizeTier::Grand => pool
                    .draw_one(&mut self.random)
                    .map(|entry| vec![entry.owner])
                    .unwrap_or_default(),
                PrizeTier::Second | PrizeTier::Third => {
                    let percent = if tier == PrizeTier::Second {
                        prizes.second_winner_percent
                    } else {
                        prizes.third_winner_percent
                    };
                    let count = winner_ticket_count(pool.len(), percent);
                    distinct_owners(&pool.draw_many(count, &mut self.random))
                }
            };

            let prize = tier.prize_amount(total_revenue, &prizes);
            outcomes.push(self.settle_tier(tier, prize, &winners, players, &index)?);
        }

        Ok(outcomes)
    }

    /// Pay `prize` to `winners` and book the house share.
    fn settle_tier(
        &mut self,
        tier: PrizeTier,
        prize: u64,
        winners: &[PlayerId],
        players: &mut [Player],
        index: &HashMap<PlayerId, usize>,
    ) -> LotteryResult<TierOutcome> {
        let Some(split) = split_prize(prize, winners.len()) else {
            info!(%tier, prize, "no winners, prize goes to the house");
            self.house_profit += prize;
            return Ok(TierOutcome {
                tier,
                prize,
                split: 0,
                payouts: Vec::new(),
                house_share: prize,
            });
        };

        let mut payouts = Vec::with_capacity(winners.len());
        for (rank, &id) in winners.iter().enumerate() {
            let bonus = match self.config.remainder_policy {
                RemainderPolicy::BonusAndHouse if (rank as u64) < split.remainder => 1,
                _ => 0,
            };
            let amount = split.per_winner + bonus;

            let player = index
                .get(&id)
                .and_then(|&i| players.get_mut(i))
                .ok_or(LotteryError::PlayerNotFound(id))?;
            player.credit(amount);
            self.store.update(player)?;

            payouts.push(Payout { player: id, amount });
        }

        self.house_profit += split.remainder;
        info!(
            %tier,
            prize,
            winners = payouts.len(),
            split = split.per_winner,
            remainder = split.remainder,
            "prize distributed"
        );

        Ok(TierOutcome {
            tier,
            prize,
            split: split.per_winner,
            payouts,
            house_share: split.remainder,
        })
    }

    fn remove_broke_players(&self, players: &[Player]) -> Vec<PlayerId> {
        players
            .iter()
            .filter(|p| !p.has_money())
            .filter(|p| self.store.remove(p.id))
            .map(|p| {
                debug!(player = %p.id, "out of money, removed");
                p.id
            })
            .collect()
    }
}
