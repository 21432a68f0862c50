//! Round-based lottery simulation.
//!
//! Players buy tickets with in-game currency. Each round a draw selects
//! winners across three prize tiers, prizes are split among the winners, and
//! the house keeps split remainders and any prize nobody could win.
//!
//! ## Prize Tiers
//!
//! | Tier   | Share of revenue | Winners                                 |
//! |--------|------------------|-----------------------------------------|
//! | Grand  | 50%              | one ticket                              |
//! | Second | 30%              | 10% of remaining tickets (at least one) |
//! | Third  | 10%              | 20% of remaining tickets (at least one) |
//!
//! The last 10% of revenue, plus rounding, is never paid out.
//!
//! ## Key Concepts
//!
//! - **Round**: bootstrap bots up to a random population, let bots buy
//!   tickets, draw, pay out, remove broke players, discard tickets.
//! - **Bot player**: synthetic player created to reach the minimum population.
//! - **House profit**: split remainders plus the prizes of tiers with no
//!   tickets left to draw from. Accumulates across rounds.

pub mod config;
pub mod draw;
pub mod engine;
pub mod error;
pub mod input;
pub mod player;
pub mod random;
pub mod store;
pub mod ticket;

pub use config::{LotteryConfig, PrizeConfig, RemainderPolicy};
pub use draw::PrizeTier;
pub use engine::{BotEntry, LotteryEngine, Payout, PurchaseOutcome, RoundSummary, TierOutcome};
pub use error::{LotteryError, LotteryResult};
pub use input::{parse_ticket_request, parse_yes};
pub use player::{Player, PlayerId, DEFAULT_STARTING_MONEY};
pub use random::{FixedRandomSource, RandomSource, RngRandomSource};
pub use store::{InMemoryPlayerStore, PlayerStore};
pub use ticket::{Ticket, TicketSequence, TICKET_PRICE};
