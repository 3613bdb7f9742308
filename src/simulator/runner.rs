//! Simulation runner driving the real [`Game`] through whole combat runs.
//!
//! Statistics come from the tick events and the resolver's run tally, so the
//! simulator shares every rule with live play.

use super::config::SimConfig;
use super::report::{RunOutcome, RunStats, SimReport};
use crate::combat::{PlayerInput, PlayerState};
use crate::core::{ContentPack, ConfigError, Game, GameConfig, TickEvent, Vec2};
use crate::stats::StatId;
use crate::utils::persistence::{MemoryStore, SaveData};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Run the full simulation on one in-memory save and return a report.
pub fn run_simulation(
    config: &SimConfig,
    game_config: GameConfig,
    content: ContentPack,
) -> Result<SimReport, ConfigError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let start = config.start_stage.max(1);
    let save = SaveData {
        current_stage: start,
        unlocked_stage: start,
        ..SaveData::default()
    };
    let mut game = Game::new(game_config, content, MemoryStore::with_data(save))?;

    let mut runs = Vec::with_capacity(config.num_runs as usize);
    for run_idx in 0..config.num_runs {
        let bought = if config.auto_buy {
            buy_upgrades(&mut game)
        } else {
            0
        };
        let run = simulate_single_run(&mut game, config, bought, &mut rng);

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Stage {}, {:?} after {:.1}s, Kills {}, Collected {}, Bought {}",
                run_idx + 1,
                config.num_runs,
                run.stage,
                run.outcome,
                run.seconds,
                run.kills,
                run.collected.total(),
                run.upgrades_bought
            );
        }
        runs.push(run);
    }

    game.end_session();
    Ok(SimReport::from_runs(runs, game.stats().get(StatId::Level)))
}

/// Buys the cheapest affordable upgrade until nothing is affordable.
fn buy_upgrades(game: &mut Game<MemoryStore>) -> u32 {
    let mut bought = 0;
    while let Some(id) = game
        .tree()
        .cheapest_affordable(game.wallet())
        .map(|node| node.id().to_string())
    {
        match game.purchase(&id) {
            Ok(receipt) => {
                debug!(upgrade = %receipt.id, level = receipt.new_level, cost = receipt.cost, "auto-buy");
                bought += 1;
            }
            Err(e) => {
                warn!(upgrade = %id, error = %e, "auto-buy failed");
                break;
            }
        }
    }
    bought
}

/// Points at the nearest living enemy, boss included.
fn steer(game: &Game<MemoryStore>) -> PlayerInput {
    let session = game.session();
    let player = session.resolver().position();
    let pooled = session
        .enemies()
        .iter_active()
        .filter(|(_, _, e)| e.is_alive())
        .map(|(_, _, e)| e.position);
    let boss = session.boss().boss().map(|b| b.position);
    pooled
        .chain(boss)
        .min_by(|a, b| a.distance(player).total_cmp(&b.distance(player)))
        .map_or(PlayerInput::pressed(Vec2::ZERO), PlayerInput::pressed)
}

fn simulate_single_run(
    game: &mut Game<MemoryStore>,
    config: &SimConfig,
    upgrades_bought: u32,
    rng: &mut impl Rng,
) -> RunStats {
    game.enter_combat();
    let stage = game.progression().current();
    let max_ticks = config.max_ticks_per_run();

    let mut outcome = RunOutcome::TimedOut;
    let mut ticks = 0u64;
    while ticks < max_ticks {
        let input = steer(game);
        let events = game.tick(config.dt, input, rng);
        ticks += 1;

        for event in &events {
            if let TickEvent::EnemyDied {
                enemy,
                awaiting_animation: true,
            } = event
            {
                game.complete_death_animation(*enemy, rng);
            }
        }

        match game.player_state() {
            PlayerState::Dead => {
                outcome = RunOutcome::Died;
                break;
            }
            PlayerState::Victorious => {
                outcome = RunOutcome::Victorious;
                break;
            }
            PlayerState::Active | PlayerState::Idle => {}
        }
    }

    // Drops already flying when the run ended still land.
    if game.player_state().is_terminal() {
        let max_drain = (game.config().drop_fly_time / config.dt).ceil() as u64 + 1;
        let mut drained = 0;
        while game.session().drops().flying_count() > 0 && drained < max_drain {
            game.tick(config.dt, PlayerInput::idle(), rng);
            drained += 1;
        }
    }

    let tally = *game.session().resolver().tally();
    game.leave_combat();

    RunStats {
        stage,
        outcome,
        seconds: ticks as f64 * config.dt,
        kills: tally.kills,
        levels_gained: tally.levels_gained,
        collected: tally.collected,
        upgrades_bought,
        unlocked_after: game.progression().unlocked(),
    }
}
