//! Headless runner: generates a cave, lets the bots loose and logs what they do.

use anyhow::{Context, Result};
use cave_bots::constants::{PLAYER_SPAWN_HEIGHT, SHOT_DAMAGE};
use cave_bots::grid::Grid;
use cave_bots::systems::{shot_hits, RenderAgent};
use cave_bots::{GameEvent, Player, SimConfig, Simulation, Target};
use clap::Parser;
use glam::Vec3;
use std::path::PathBuf;

/// Run the cave bot simulation without a window
#[derive(Parser, Debug)]
#[command(name = "cave-bots")]
#[command(about = "Headless cave bot simulation", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Chance (percent) that an interior cell starts as a wall
    #[arg(long)]
    fill: Option<u32>,

    /// Map seed, random when neither flag nor config set one
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    bots: Option<usize>,

    /// Ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Generate a fresh map every N ticks
    #[arg(long)]
    regenerate_every: Option<u64>,

    /// Print the map with the bots on it when the run ends
    #[arg(long)]
    print_map: bool,

    /// Serve puffin profiling data on the default puffin_http port
    #[arg(long)]
    profile: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SimConfig::default(),
        };

        if let Some(width) = self.width {
            config.map.width = width;
        }
        if let Some(height) = self.height {
            config.map.height = height;
        }
        if let Some(fill) = self.fill {
            config.map.fill_percent = fill;
        }
        if let Some(seed) = self.seed {
            config.map.seed = Some(seed);
        }
        if let Some(bots) = self.bots {
            config.spawn.bot_count = bots;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    // Keep the server alive for the whole run
    let _profiler = if cli.profile {
        puffin::set_scopes_on(true);
        let addr = format!("0.0.0.0:{}", puffin_http::DEFAULT_PORT);
        let server = puffin_http::Server::new(&addr).context("starting puffin server")?;
        tracing::info!(%addr, "puffin profiler listening");
        Some(server)
    } else {
        None
    };

    let seed = config.map.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "using map seed");

    let dt = config.tick_interval();
    let player = Player::new(Vec3::Y * PLAYER_SPAWN_HEIGHT, 100);
    let mut sim = Simulation::new(config, player, seed);

    let mut shots = 0usize;
    let mut hits = 0usize;
    let mut deaths = 0usize;
    for tick in 1..=cli.ticks {
        puffin::GlobalProfiler::lock().new_frame();

        sim.tick(dt);
        for event in sim.drain_events() {
            match event {
                GameEvent::AttackFired { entity, origin, direction } => {
                    shots += 1;
                    let hit = shot_hits(sim.grid(), origin, direction, sim.target().position());
                    if hit {
                        hits += 1;
                        sim.target_mut().receive_damage(SHOT_DAMAGE);
                    }
                    tracing::debug!(?entity, ?origin, ?direction, hit, "shot fired");
                }
                GameEvent::AgentDied { entity, .. } => {
                    deaths += 1;
                    tracing::info!(?entity, "bot died");
                }
                GameEvent::SpawnSkipped { error } => tracing::warn!(%error, "spawn skipped"),
                GameEvent::MapRegenerated { generation, seed } => {
                    tracing::info!(generation, seed, "new map")
                }
                _ => {}
            }
        }

        if let Some(every) = cli.regenerate_every {
            if every > 0 && tick % every == 0 {
                sim.regenerate(sim.seed().wrapping_add(1));
            }
        }

        if tick % 60 == 0 {
            let states: Vec<String> = sim
                .render_agents()
                .iter()
                .map(|a| format!("{}", a.state))
                .collect();
            tracing::info!(tick, time = sim.time(), agents = states.len(), states = ?states, "tick");
        }
    }

    let agents = sim.render_agents();
    for agent in &agents {
        tracing::info!("{}", agent.label.replace('\n', " | "));
    }
    tracing::info!(
        shots,
        hits,
        deaths,
        player_health = sim.target().health,
        "run finished"
    );

    if cli.print_map {
        println!("{}", draw_map(sim.grid(), sim.target().position, &agents));
    }
    Ok(())
}

/// ASCII view: `#` wall, `.` floor, `P` target, first letter of each bot's state.
fn draw_map(grid: &Grid, player: Vec3, agents: &[RenderAgent]) -> String {
    let mut rows: Vec<Vec<char>> = (0..grid.height as i32)
        .map(|y| {
            (0..grid.width as i32)
                .map(|x| if grid.is_walkable(x, y) { '.' } else { '#' })
                .collect()
        })
        .collect();

    let mut mark = |pos: Vec3, c: char| {
        let (x, y) = grid.world_to_cell(pos);
        rows[y as usize][x as usize] = c;
    };
    mark(player, 'P');
    for agent in agents {
        let c = agent.state.to_string().chars().next().unwrap_or('?');
        mark(agent.position, c);
    }

    // Highest row first so the picture matches the world's +z axis
    rows.iter()
        .rev()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
