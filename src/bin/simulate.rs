use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use engine_2048::engine::{BoardEngine, WIN_EXPONENT};
use engine_2048::policy::{play_out, PolicyKind};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "simulate",
    version,
    about = "Play many seeded 2048 games in parallel and report aggregate results"
)]
struct Args {
    /// Number of games; game i uses seed + i
    #[arg(short = 'n', long, default_value_t = 100)]
    games: u64,
    /// Base seed
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Worker threads (defaults to rayon's choice)
    #[arg(long)]
    threads: Option<usize>,
    /// Policy driving every game
    #[arg(long, value_enum, default_value_t = PolicyKind::Greedy)]
    policy: PolicyKind,
    /// Cap on moves per game
    #[arg(long)]
    max_moves: Option<u64>,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
    /// Hide the progress bar
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Serialize)]
struct GameResult {
    seed: u64,
    moves: u64,
    score: u64,
    highest_tile: u64,
    won: bool,
}

#[derive(Debug, Serialize)]
struct Summary {
    games: u64,
    policy: PolicyKind,
    wins: u64,
    win_rate: f64,
    mean_score: f64,
    max_score: u64,
    mean_moves: f64,
    /// Highest tile value reached -> number of games.
    highest_tiles: BTreeMap<u64, u64>,
    elapsed_s: f64,
}

fn play_one(seed: u64, policy: PolicyKind, max_moves: Option<u64>) -> GameResult {
    let mut game = BoardEngine::from_seed(seed);
    let mut driver = policy.build(seed);
    let moves = play_out(&mut game, driver.as_mut(), max_moves);
    GameResult {
        seed,
        moves,
        score: game.score(),
        highest_tile: game.highest_tile().map_or(0, |t| t.value()),
        won: game.highest_tile().is_some_and(|t| t.pow() >= WIN_EXPONENT),
    }
}

fn summarize(results: &[GameResult], policy: PolicyKind, elapsed_s: f64) -> Summary {
    let games = results.len() as u64;
    let wins = results.iter().filter(|r| r.won).count() as u64;
    let total_score: u64 = results.iter().map(|r| r.score).sum();
    let total_moves: u64 = results.iter().map(|r| r.moves).sum();
    let mut highest_tiles = BTreeMap::new();
    for r in results {
        *highest_tiles.entry(r.highest_tile).or_insert(0) += 1;
    }
    let denom = games.max(1) as f64;
    Summary {
        games,
        policy,
        wins,
        win_rate: wins as f64 / denom,
        mean_score: total_score as f64 / denom,
        max_score: results.iter().map(|r| r.score).max().unwrap_or(0),
        mean_moves: total_moves as f64 / denom,
        highest_tiles,
        elapsed_s,
    }
}

fn main() -> anyhow::Result<()> {
    engine_2048::init_tracing();
    let args = Args::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configuring rayon thread pool")?;
    }

    info!(games = args.games, seed = args.seed, policy = ?args.policy, "simulating");
    let start = Instant::now();

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} games ({eta})",
            )
            .context("building progress style")?
            .progress_chars("=>-"),
        );
        pb
    };

    let results: Vec<GameResult> = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let r = play_one(args.seed.wrapping_add(i), args.policy, args.max_moves);
            pb.inc(1);
            r
        })
        .collect();
    pb.finish_and_clear();

    let summary = summarize(&results, args.policy, start.elapsed().as_secs_f64());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "games: {}, policy: {:?}, wins: {} ({:.1}%), mean score: {:.1}, max score: {}, mean moves: {:.1}, elapsed: {:.2}s",
            summary.games,
            summary.policy,
            summary.wins,
            summary.win_rate * 100.0,
            summary.mean_score,
            summary.max_score,
            summary.mean_moves,
            summary.elapsed_s
        );
        for (tile, count) in &summary.highest_tiles {
            println!("  highest tile {tile:>6}: {count}");
        }
    }
    Ok(())
}
