//! Lottery configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{
    error::{LotteryError, LotteryResult},
    player::{PlayerId, DEFAULT_STARTING_MONEY},
};

/// Main configuration for a lottery game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotteryConfig {
    /// Balance given to new players and bots
    #[serde(default = "default_starting_money")]
    pub starting_money: u64,

    /// The human player; never buys tickets automatically
    #[serde(default = "default_human_id")]
    pub human_id: PlayerId,

    /// Population floor enforced at the start of every round
    #[serde(default = "default_min_players")]
    pub min_players: usize,

    /// Upper bound of the random number of players added on top of the floor
    #[serde(default = "default_extra_players")]
    pub extra_players: usize,

    /// Most tickets a bot buys in one round
    #[serde(default = "default_max_bot_tickets")]
    pub max_bot_tickets: u64,

    /// Most tickets the human may request at once
    #[serde(default = "default_max_tickets_per_purchase")]
    pub max_tickets_per_purchase: u64,

    #[serde(default)]
    pub remainder_policy: RemainderPolicy,

    #[serde(default)]
    pub prizes: PrizeConfig,
}

/// Prize split, in whole percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeConfig {
    /// Share of revenue paid to the grand prize winner
    #[serde(default = "default_grand_percent")]
    pub grand_percent: u64,

    /// Share of revenue split among second place winners
    #[serde(default = "default_second_percent")]
    pub second_percent: u64,

    /// Share of revenue split among third place winners
    #[serde(default = "default_third_percent")]
    pub third_percent: u64,

    /// Share of the remaining tickets drawn for second place
    #[serde(default = "default_second_winner_percent")]
    pub second_winner_percent: u64,

    /// Share of the remaining tickets drawn for third place
    #[serde(default = "default_third_winner_percent")]
    pub third_winner_percent: u64,
}

/// What happens to the units left over when a prize does not split evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// The first `remainder` winners get one extra unit each and the house
    /// books the remainder as profit as well.
    #[default]
    BonusAndHouse,
    /// Winners get the even split only; the house keeps the remainder.
    HouseOnly,
}

fn default_starting_money() -> u64 {
    DEFAULT_STARTING_MONEY
}

fn default_human_id() -> PlayerId {
    PlayerId(1)
}

fn default_min_players() -> usize {
    10
}

fn default_extra_players() -> usize {
    5
}

fn default_max_bot_tickets() -> u64 {
    10
}

fn default_max_tickets_per_purchase() -> u64 {
    10
}

fn default_grand_percent() -> u64 {
    50
}

fn default_second_percent() -> u64 {
    30
}

fn default_third_percent() -> u64 {
    10
}

fn default_second_winner_percent() -> u64 {
    10
}

fn default_third_winner_percent() -> u64 {
    20
}

impl Default for PrizeConfig {
    fn default() -> Self {
        Self {
            grand_percent: default_grand_percent(),
            second_percent: default_second_percent(),
            third_percent: default_third_percent(),
            second_winner_percent: default_second_winner_percent(),
            third_winner_percent: default_third_winner_percent(),
        }
    }
}

impl Default for LotteryConfig {
    fn default() -> Self {
        Self {
            starting_money: default_starting_money(),
            human_id: default_human_id(),
            min_players: default_min_players(),
            extra_players: default_extra_players(),
            max_bot_tickets: default_max_bot_tickets(),
            max_tickets_per_purchase: default_max_tickets_per_purchase(),
            remainder_policy: RemainderPolicy::default(),
            prizes: PrizeConfig::default(),
        }
    }
}

impl LotteryConfig {
    /// Reject settings the round algorithm cannot honour.
    pub fn validate(&self) -> LotteryResult<()> {
        let p = &self.prizes;
        let prize_total = p.grand_percent + p.second_percent + p.third_percent;
        if prize_total > 100 {
            return Err(LotteryError::InvalidConfig(format!(
                "prize percentages sum to {prize_total}, above 100"
            )));
        }
        if p.second_winner_percent > 100 || p.third_winner_percent > 100 {
            return Err(LotteryError::InvalidConfig(
                "winner percentages must not exceed 100".to_string(),
            ));
        }
        if self.min_players == 0 {
            return Err(LotteryError::InvalidConfig(
                "min_players must be at least 1".to_string(),
            ));
        }
        if self.max_bot_tickets == 0 {
            return Err(LotteryError::InvalidConfig(
                "max_bot_tickets must be at least 1".to_string(),
            ));
        }
        if self.max_tickets_per_purchase == 0 {
            return Err(LotteryError::InvalidConfig(
                "max_tickets_per_purchase must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load config from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }
}
