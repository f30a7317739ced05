use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use engine_2048::engine::{BoardEngine, Direction};
use engine_2048::high_score::HighScoreFile;
use engine_2048::policy::{play_out_with, Policy, PolicyKind, ScriptedPolicy};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "engine-2048", version, about = "Play one headless game of 2048")]
struct Args {
    /// Seed for tile spawns (and the random policy); random if omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Scripted moves as w/a/s/d keys, e.g. "wasdd"; overrides --policy
    #[arg(long, value_name = "KEYS")]
    moves: Option<String>,
    /// Policy used when no script is given
    #[arg(long, value_enum, default_value_t = PolicyKind::Random)]
    policy: PolicyKind,
    /// Stop after this many moves
    #[arg(long)]
    max_moves: Option<u64>,
    /// File holding the best score; created if missing
    #[arg(long, value_name = "FILE")]
    high_score: Option<PathBuf>,
    /// Only print the final board and summary
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    engine_2048::init_tracing();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut game = BoardEngine::from_seed(seed);
    let mut policy: Box<dyn Policy + Send> = match &args.moves {
        Some(keys) => Box::new(ScriptedPolicy::new(
            Direction::parse_sequence(keys).context("parsing --moves")?,
        )),
        None => args.policy.build(seed),
    };
    let mut high_score = args
        .high_score
        .as_ref()
        .map(HighScoreFile::open)
        .transpose()
        .context("opening high score file")?;

    info!(seed, "starting game");
    if !args.quiet {
        println!("{}", game.grid());
    }

    let mut announced_win = false;
    let move_count = play_out_with(&mut game, policy.as_mut(), args.max_moves, |game, direction, moves| {
        if let Some(hs) = high_score.as_mut() {
            hs.record(game.score())
                .with_context(|| format!("writing {}", hs.path().display()))?;
        }
        if !args.quiet {
            println!("{direction} | score {}{}", game.score(), game.grid());
        }
        if !announced_win && game.check_won() {
            announced_win = true;
            info!(moves, score = game.score(), "reached 2048");
        }
        anyhow::Ok(())
    })?;

    if args.quiet {
        println!("{}", game.grid());
    }
    let highest = game.highest_tile().map_or(0, |t| t.value());
    println!(
        "Seed: {seed}, Moves made: {move_count}, Score: {}, Highest tile: {highest}, Won: {}, Lost: {}",
        game.score(),
        game.check_won(),
        game.check_lost()
    );
    if let Some(hs) = &high_score {
        println!("High score: {}", hs.best());
    }
    Ok(())
}
