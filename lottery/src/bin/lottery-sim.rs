//! Lottery simulation CLI.
//!
//! Play rounds interactively against bot players, or run a batch of rounds
//! with a fixed ticket purchase.

#[cfg(feature = "cli")]
mod cli {
    use std::{
        io::{self, BufRead, Write},
        path::{Path, PathBuf},
    };

    use anyhow::{Context, Result};
    use clap::{Parser, Subcommand};
    use lottery_sim::{
        parse_ticket_request, parse_yes, InMemoryPlayerStore, LotteryConfig, LotteryEngine,
        LotteryError, Player, PlayerId, RngRandomSource, RoundSummary, TICKET_PRICE,
    };
    use tracing::info;

    type Engine = LotteryEngine<InMemoryPlayerStore, RngRandomSource>;

    #[derive(Parser)]
    #[command(name = "lottery-sim")]
    #[command(about = "Round-based lottery with tiered prizes")]
    #[command(version)]
    pub struct Cli {
        /// Enable verbose logging
        #[arg(short, long, global = true)]
        pub verbose: bool,

        /// Configuration file (TOML)
        #[arg(short, long, global = true)]
        pub config: Option<PathBuf>,

        /// Seed for reproducible draws
        #[arg(short, long, global = true)]
        pub seed: Option<u64>,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Subcommand)]
    pub enum Command {
        /// Play interactively
        Play,

        /// Run rounds without prompting
        Simulate {
            /// Maximum number of rounds
            #[arg(short, long, default_value = "10")]
            rounds: u64,

            /// Tickets the human buys each round
            #[arg(short, long, default_value = "1")]
            tickets: u64,
        },

        /// Write the default configuration to a file
        InitConfig {
            /// Output file path
            #[arg(short, long, default_value = "lottery.toml")]
            output: PathBuf,
        },
    }

    pub fn run(cli: Cli) -> Result<()> {
        match cli.command {
            Command::InitConfig { output } => init_config(&output),
            Command::Play => play(build_engine(cli.config.as_deref(), cli.seed)?),
            Command::Simulate { rounds, tickets } => {
                simulate(build_engine(cli.config.as_deref(), cli.seed)?, rounds, tickets)
            }
        }
    }

    fn init_config(output: &Path) -> Result<()> {
        LotteryConfig::default().save(output)?;
        println!("Wrote default configuration to {}", output.display());
        Ok(())
    }

    fn build_engine(config_path: Option<&Path>, seed: Option<u64>) -> Result<Engine> {
        let config = match config_path {
            Some(path) => LotteryConfig::load(path)?,
            None => LotteryConfig::default(),
        };

        let random = match seed {
            Some(seed) => {
                info!(seed, "using seeded draws");
                RngRandomSource::seeded(seed)
            }
            None => RngRandomSource::from_entropy(),
        };

        let engine = LotteryEngine::with_config(InMemoryPlayerStore::new(), random, config)?;
        let config = engine.config();
        let human = Player::with_money(config.human_id.0, config.starting_money);
        engine.add_player(human)?;
        Ok(engine)
    }

    /// Current state of the human, or `None` once they have been removed.
    fn human(engine: &Engine) -> Result<Option<Player>> {
        match engine.player(engine.config().human_id) {
            Ok(player) => Ok(Some(player)),
            Err(LotteryError::PlayerNotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn prompt(message: &str) -> Result<Option<String>> {
        println!("{message}");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        Ok((read > 0).then_some(line))
    }

    fn play(mut engine: Engine) -> Result<()> {
        let human_id = engine.config().human_id;
        let max = engine.config().max_tickets_per_purchase;

        println!("Welcome Player {human_id}");
        println!("Digital balance: ${}", engine.config().starting_money);
        println!("Ticket price: ${TICKET_PRICE}");

        while let Some(mut user) = human(&engine)? {
            if !engine.user_has_money(&user) {
                break;
            }

            let Some(answer) =
                prompt(&format!("How many tickets would you like to purchase? (1-{max})"))?
            else {
                break;
            };
            let count = match parse_ticket_request(&answer, max) {
                Ok(count) => count,
                Err(e) => {
                    println!("{e}. Please try again.");
                    continue;
                }
            };

            engine.purchase_tickets(&mut user, count)?;
            let summary = engine.run_lottery()?;
            print_round(&summary, human_id);

            let Some(user) = human(&engine)?.filter(|u| engine.user_has_money(u)) else {
                println!("You're out of money. Game over.");
                break;
            };

            println!("Digital balance: ${}", user.money);
            match prompt("Do you want to play again? (yes/no)")? {
                Some(answer) if parse_yes(&answer) => {}
                _ => break,
            }
        }

        println!("Thanks for playing!");
        Ok(())
    }

    fn simulate(mut engine: Engine, rounds: u64, tickets: u64) -> Result<()> {
        let human_id = engine.config().human_id;

        println!("Round  Players  Revenue  Grand  2nd  3rd  House  Balance");
        println!("─────────────────────────────────────────────────────────");

        for _ in 0..rounds {
            let Some(mut user) = human(&engine)? else {
                break;
            };
            engine.purchase_tickets(&mut user, tickets)?;
            let summary = engine.run_lottery()?;

            let balance = human(&engine)?
                .map(|u| u.money.to_string())
                .unwrap_or_else(|| "out".to_string());
            let prizes: Vec<u64> = summary.tiers.iter().map(|t| t.prize).collect();

            println!(
                "{:>5}  {:>7}  {:>7}  {:>5}  {:>3}  {:>3}  {:>5}  {:>7}",
                summary.round,
                engine.players().len(),
                summary.total_revenue,
                prizes.first().copied().unwrap_or(0),
                prizes.get(1).copied().unwrap_or(0),
                prizes.get(2).copied().unwrap_or(0),
                summary.house_profit_delta,
                balance,
            );
        }

        println!();
        println!("Rounds played: {}", engine.rounds_played());
        println!("House profit:  ${}", engine.house_profit());
        if human(&engine)?.is_none() {
            println!("Player {human_id} ran out of money.");
        }
        Ok(())
    }

    fn print_round(summary: &RoundSummary, human_id: PlayerId) {
        println!();
        println!("Round {}", summary.round);
        for entry in &summary.bot_entries {
            println!("Player {} enters the game with {} tickets.", entry.player, entry.tickets);
        }
        println!("Total revenue: ${}", summary.total_revenue);

        for tier in &summary.tiers {
            println!("{} is ${}", tier.tier, tier.prize);
        }
        for tier in &summary.tiers {
            if !tier.has_winners() {
                println!("No winners for the {} prize.", tier.tier);
                continue;
            }
            let names: Vec<String> = tier
                .payouts
                .iter()
                .map(|p| {
                    if p.player == human_id {
                        format!("Player {} (you)", p.player)
                    } else {
                        format!("Player {}", p.player)
                    }
                })
                .collect();
            println!(
                "** Winners for {} prize: {}. Each receives ${}.",
                tier.tier,
                names.join(", "),
                tier.split
            );
        }
        println!("House wins ${}", summary.house_profit);

        for id in &summary.removed {
            println!("Player {id} is out of money and is removed from the game.");
        }
        println!();
    }
}

#[cfg(feature = "cli")]
fn main() -> anyhow::Result<()> {
    use clap::Parser;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let cli = cli::Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    cli::run(cli)
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("This binary requires the 'cli' feature. Build with:");
    eprintln!("  cargo build -p lottery-sim --features cli --bin lottery-sim");
}
