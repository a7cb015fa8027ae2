//! Headless match runner.
//!
//! Plays a scripted match on a built-in map and logs the HUD once per
//! simulated second. Useful for profiling and for eyeballing AI behavior
//! through `RUST_LOG=arena_core=debug`.

use anyhow::{Context, Result};
use arena_core::{ArenaConfig, GameEvent, MoveInput, TickInput, World};
use clap::Parser;
use glam::Vec2;
use tilenav::NavigationGrid;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MAP: &str = "\
########################################
#......................................#
#..####..........................####..#
#..####..........................####..#
#......................................#
#......................................#
#.............########.................#
#.............########.................#
#......................................#
#......................................#
#......................................#
#......................................#
#......................................#
#......................................#
#......................................#
#........######..........######........#
#........######..........######........#
#......................................#
#......................................#
#..####..........................####..#
#..####..........................####..#
#......................................#
########################################";

/// Run a headless arena match
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for every random draw
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Ticks to simulate
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Ticks per simulated second
    #[arg(long, default_value_t = 60)]
    hz: u32,

    /// Enemies at match start
    #[arg(short, long, default_value_t = 1)]
    enemies: usize,

    /// Print the final frame as JSON
    #[arg(long)]
    json: bool,

    /// Keep playing after an enemy reaches the player
    #[arg(long)]
    ignore_game_over: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let grid = NavigationGrid::from_ascii(MAP, Vec2::splat(32.0)).context("parsing built-in map")?;
    let mut config = ArenaConfig::default();
    config.enemy.initial_count = args.enemies;
    let mut world = World::new(grid, config, args.seed).context("building world")?;

    #[allow(clippy::cast_precision_loss)]
    let dt = 1.0 / args.hz.max(1) as f32;
    let center = world.arena().center();

    for tick in 0..args.ticks {
        let input = script(tick, dt, center, &world);
        let report = world.step(&input);

        for event in world.take_events() {
            if let GameEvent::Killed { agent, kill_count } = event {
                info!(%agent, kill_count, "kill");
            }
        }

        if tick % u64::from(args.hz.max(1)) == 0 {
            let player = world.player();
            info!(
                tick,
                time = world.time(),
                ammo = player.ammo,
                kills = player.kill_count,
                agents = world.agents().count(),
                "hud"
            );
        }

        if report.game_over && !args.ignore_game_over {
            info!(tick, kills = world.player().kill_count, "game over");
            break;
        }
    }

    if args.json {
        let frame = serde_json::to_string_pretty(&world.view()).context("serializing frame")?;
        println!("{frame}");
    }
    Ok(())
}

/// Walk a square and shoot at the nearest enemy.
fn script(tick: u64, dt: f32, center: Vec2, world: &World) -> TickInput {
    let player = world.player().transform.position;
    let movement = match (tick / 45) % 4 {
        0 => MoveInput::RIGHT,
        1 => MoveInput::DOWN,
        2 => MoveInput::LEFT,
        _ => MoveInput::UP,
    };
    let nearest = world
        .agents()
        .map(|agent| agent.transform.position)
        .min_by(|a, b| a.distance_squared(player).total_cmp(&b.distance_squared(player)));

    TickInput {
        dt,
        movement,
        aim_target: nearest.unwrap_or(center),
        fire: nearest.is_some(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();
}
