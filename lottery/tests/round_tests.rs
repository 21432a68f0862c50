//! Integration tests for lottery rounds.
//!
//! These drive the engine end to end with the in-memory store:
//! - Purchase clamping
//! - Population bootstrap
//! - Prize distribution and house accounting
//! - Broke-player removal and ticket reset

use lottery_sim::{
    FixedRandomSource, InMemoryPlayerStore, LotteryConfig, LotteryEngine, LotteryError, Player,
    PlayerId, PlayerStore, PrizeConfig, PrizeTier, PurchaseOutcome, RandomSource,
    RemainderPolicy, RngRandomSource,
};

fn engine_with<R: RandomSource>(
    config: LotteryConfig,
    random: R,
) -> LotteryEngine<InMemoryPlayerStore, R> {
    LotteryEngine::with_config(InMemoryPlayerStore::new(), random, config).unwrap()
}

fn total_money(engine: &LotteryEngine<InMemoryPlayerStore, impl RandomSource>) -> u64 {
    engine.players().iter().map(|p| p.money).sum()
}

// ============================================================================
// Purchases
// ============================================================================

mod purchases {
    use super::*;

    #[test]
    fn test_request_above_balance_is_capped() {
        let engine = LotteryEngine::new(InMemoryPlayerStore::new(), FixedRandomSource::default());
        engine.add_player(Player::with_money(1, 10)).unwrap();

        let mut player = engine.player(PlayerId(1)).unwrap();
        let outcome = engine.purchase_tickets(&mut player, 11).unwrap();

        assert_eq!(
            outcome,
            PurchaseOutcome::Purchased {
                count: 10,
                clamped: true
            }
        );
        let stored = engine.player(PlayerId(1)).unwrap();
        assert_eq!(stored.money, 0);
        assert_eq!(stored.ticket_count(), 10);
    }

    #[test]
    fn test_ticket_numbers_unique_across_players() {
        let engine = LotteryEngine::new(InMemoryPlayerStore::new(), FixedRandomSource::default());
        for id in 1..=3 {
            engine.add_player(Player::new(id)).unwrap();
        }

        let mut numbers = Vec::new();
        for id in 1..=3 {
            let mut player = engine.player(PlayerId(id)).unwrap();
            engine.purchase_tickets(&mut player, 4).unwrap();
            numbers.extend(player.tickets.iter().map(|t| t.number()));
        }

        assert_eq!(numbers, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_handle_kept_across_rounds_keeps_winnings() {
        for seed in 0..25 {
            let mut engine = engine_with(LotteryConfig::default(), RngRandomSource::seeded(seed));
            engine.add_player(Player::new(1)).unwrap();

            // The same handle is reused for every purchase
            let mut human = engine.player(PlayerId(1)).unwrap();
            engine.purchase_tickets(&mut human, 1).unwrap();
            engine.run_lottery().unwrap();

            let Ok(after_round) = engine.player(PlayerId(1)) else {
                continue;
            };
            engine.purchase_tickets(&mut human, 1).unwrap();

            let stored = engine.player(PlayerId(1)).unwrap();
            assert_eq!(stored.money, after_round.money - 1, "seed {seed}");
            assert_eq!(stored.ticket_count(), 1);
            assert_eq!(human, stored);
        }
    }

    #[test]
    fn test_unknown_player_purchase_changes_nothing() {
        let engine = LotteryEngine::new(InMemoryPlayerStore::new(), FixedRandomSource::default());
        let mut ghost = Player::new(9);

        assert_eq!(
            engine.purchase_tickets(&mut ghost, 4),
            Err(LotteryError::PlayerNotFound(PlayerId(9)))
        );
        assert_eq!(ghost, Player::new(9));
        assert_eq!(engine.ticket_sequence().current(), 0);
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let engine = LotteryEngine::new(InMemoryPlayerStore::new(), FixedRandomSource::default());
        engine.add_player(Player::new(1)).unwrap();

        assert_eq!(
            engine.add_player(Player::new(1)),
            Err(LotteryError::DuplicatePlayer(PlayerId(1)))
        );
    }
}

// ============================================================================
// Rounds
// ============================================================================

mod rounds {
    use super::*;

    #[test]
    fn test_population_reaches_target() {
        for seed in 0..20 {
            let mut engine = engine_with(LotteryConfig::default(), RngRandomSource::seeded(seed));
            engine.add_player(Player::new(1)).unwrap();

            let summary = engine.run_lottery().unwrap();

            assert!((10..=15).contains(&summary.target_players));
            assert_eq!(summary.bots_added.len(), summary.target_players - 1);
            // Everyone still present or removed for being broke
            assert_eq!(
                engine.players().len() + summary.removed.len(),
                summary.target_players
            );
        }
    }

    #[test]
    fn test_balance_conservation() {
        for policy in [RemainderPolicy::BonusAndHouse, RemainderPolicy::HouseOnly] {
            for seed in 0..25 {
                let config = LotteryConfig {
                    remainder_policy: policy,
                    ..Default::default()
                };
                let mut engine = engine_with(config, RngRandomSource::seeded(seed));
                engine.add_player(Player::new(1)).unwrap();
                let mut human = engine.player(PlayerId(1)).unwrap();
                engine.purchase_tickets(&mut human, 4).unwrap();

                // Bots are created with starting money during the round
                let before = total_money(&engine);
                let summary = engine.run_lottery().unwrap();
                let bot_money = summary.bots_added.len() as u64 * engine.config().starting_money;
                let bot_spend: u64 = summary.bot_entries.iter().map(|e| e.tickets).sum();

                assert_eq!(summary.total_revenue, bot_spend + 4);
                assert_eq!(
                    total_money(&engine),
                    before + bot_money - bot_spend + summary.total_paid(),
                    "seed {seed}, policy {policy:?}"
                );

                // Every unit of revenue is either paid, booked by the house, or
                // never allocated.
                let prizes: u64 = summary.tiers.iter().map(|t| t.prize).sum();
                assert!(prizes <= summary.total_revenue);
                if policy == RemainderPolicy::HouseOnly {
                    assert_eq!(summary.total_paid() + summary.house_profit_delta, prizes);
                }
            }
        }
    }

    #[test]
    fn test_remainder_goes_to_house() {
        for seed in 0..25 {
            let mut engine = engine_with(LotteryConfig::default(), RngRandomSource::seeded(seed));
            engine.add_player(Player::new(1)).unwrap();

            let summary = engine.run_lottery().unwrap();

            for tier in &summary.tiers {
                let expected = if tier.has_winners() {
                    tier.prize % tier.payouts.len() as u64
                } else {
                    tier.prize
                };
                assert_eq!(tier.house_share, expected, "seed {seed}, {}", tier.tier);
            }
            assert_eq!(summary.house_profit, engine.house_profit());
        }
    }

    #[test]
    fn test_grand_prize_has_single_winner() {
        for seed in 0..25 {
            let mut engine = engine_with(LotteryConfig::default(), RngRandomSource::seeded(seed));
            engine.add_player(Player::new(1)).unwrap();

            let summary = engine.run_lottery().unwrap();
            let grand = summary.tier(PrizeTier::Grand).unwrap();

            assert_eq!(grand.payouts.len(), 1);
            assert_eq!(grand.payouts[0].amount, summary.total_revenue / 2);
            assert_eq!(grand.house_share, 0);
        }
    }

    #[test]
    fn test_winners_are_distinct_within_a_tier() {
        for seed in 0..25 {
            let mut engine = engine_with(LotteryConfig::default(), RngRandomSource::seeded(seed));
            engine.add_player(Player::new(1)).unwrap();

            let summary = engine.run_lottery().unwrap();
            for tier in &summary.tiers {
                let mut ids: Vec<PlayerId> = tier.payouts.iter().map(|p| p.player).collect();
                ids.sort();
                ids.dedup();
                assert_eq!(ids.len(), tier.payouts.len());
            }
        }
    }

    #[test]
    fn test_exhausted_pool_sends_prize_to_house() {
        // Second place draws every ticket left, so third has nothing to draw.
        let config = LotteryConfig {
            starting_money: 1,
            extra_players: 0,
            prizes: PrizeConfig {
                second_winner_percent: 100,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut engine = engine_with(config, RngRandomSource::seeded(3));
        engine.add_player(Player::with_money(1, 1)).unwrap();
        let mut human = engine.player(PlayerId(1)).unwrap();
        engine.purchase_tickets(&mut human, 1).unwrap();

        let summary = engine.run_lottery().unwrap();
        assert_eq!(summary.total_revenue, 10);

        let second = summary.tier(PrizeTier::Second).unwrap();
        assert_eq!(second.payouts.len(), 9);
        assert_eq!(second.house_share, 3);

        let third = summary.tier(PrizeTier::Third).unwrap();
        assert!(!third.has_winners());
        assert_eq!(third.prize, 1);
        assert_eq!(third.house_share, 1);

        assert_eq!(engine.house_profit(), 4);
    }

    #[test]
    fn test_round_without_tickets() {
        let config = LotteryConfig {
            starting_money: 0,
            ..Default::default()
        };
        let mut engine = engine_with(config, RngRandomSource::seeded(1));
        engine.add_player(Player::with_money(1, 0)).unwrap();

        let summary = engine.run_lottery().unwrap();

        assert_eq!(summary.total_revenue, 0);
        assert!(summary.bot_entries.is_empty());
        assert!(summary.tiers.iter().all(|t| !t.has_winners()));
        assert_eq!(engine.house_profit(), 0);
        // Nobody has any money, so everyone is removed
        assert_eq!(summary.removed.len(), summary.target_players);
        assert!(engine.players().is_empty());
    }

    #[test]
    fn test_tickets_reset_after_round() {
        let mut engine = engine_with(LotteryConfig::default(), RngRandomSource::seeded(11));
        engine.add_player(Player::new(1)).unwrap();
        let mut human = engine.player(PlayerId(1)).unwrap();
        engine.purchase_tickets(&mut human, 3).unwrap();

        engine.run_lottery().unwrap();

        let players = engine.store().list();
        assert!(players.iter().all(|p| p.tickets.is_empty()));
        assert!(players.iter().all(|p| p.has_money()));
    }

    #[test]
    fn test_broke_human_is_removed() {
        let config = LotteryConfig {
            extra_players: 0,
            ..Default::default()
        };
        let mut engine = engine_with(config, FixedRandomSource::new(vec![0, 9, 0]));
        engine.add_player(Player::with_money(1, 1)).unwrap();
        let mut human = engine.player(PlayerId(1)).unwrap();
        engine.purchase_tickets(&mut human, 1).unwrap();
        assert!(!engine.user_has_money(&human));

        let summary = engine.run_lottery().unwrap();
        let human_won = summary
            .tiers
            .iter()
            .flat_map(|t| &t.payouts)
            .any(|p| p.player == PlayerId(1) && p.amount > 0);

        assert_eq!(human_won, engine.player(PlayerId(1)).is_ok());
        if !human_won {
            assert!(summary.removed.contains(&PlayerId(1)));
        }
    }

    #[test]
    fn test_seeded_rounds_are_reproducible() {
        let run = |seed| {
            let mut engine = engine_with(LotteryConfig::default(), RngRandomSource::seeded(seed));
            engine.add_player(Player::new(1)).unwrap();
            let mut summaries = Vec::new();
            for _ in 0..3 {
                let mut human = match engine.player(PlayerId(1)) {
                    Ok(human) => human,
                    Err(_) => break,
                };
                engine.purchase_tickets(&mut human, 2).unwrap();
                summaries.push(engine.run_lottery().unwrap());
            }
            summaries
        };

        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_multiple_rounds_accumulate_house_profit() {
        let mut engine = engine_with(LotteryConfig::default(), RngRandomSource::seeded(5));
        engine.add_player(Player::new(1)).unwrap();

        let mut booked = 0;
        for _ in 0..5 {
            booked += engine.run_lottery().unwrap().house_profit_delta;
        }

        assert_eq!(engine.rounds_played(), 5);
        assert_eq!(engine.house_profit(), booked);
    }
}
