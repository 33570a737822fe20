use std::time::Instant;

use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table};

use crate::cards::{parse_board, Card, Deal};
use crate::cfr::{Solver, SolverConfig};
use crate::display::{print_error, render_report, StrategyReport};
use crate::error::{SolverError, SolverResult};
use crate::game_state::GameState;
use crate::hand_evaluator::{evaluate_cards, HandCategory};

#[derive(Parser)]
#[command(
    name = "mccfr",
    version,
    about = "Heads-up hold'em strategy via external-sampling MCCFR+."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train both players' strategies by self-play
    Train {
        /// Number of training epochs
        #[arg(short, long, default_value = "1")]
        epochs: u32,
        /// Iterations per epoch
        #[arg(short, long, default_value = "20000")]
        iterations: u32,
        /// RNG seed
        #[arg(short, long, default_value = "12345")]
        seed: u64,
        /// Entries reserved per player table
        #[arg(long, default_value = "5000000")]
        capacity: usize,
        /// Information sets shown per player
        #[arg(long, default_value = "20")]
        top: usize,
        /// Only report this player (0 or 1)
        #[arg(long)]
        player: Option<usize>,
        /// Print the report as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Rank a seven-card hand, e.g. "AsKs QsJsTs 2h3d"
    Eval {
        /// Seven cards
        cards: String,
    },
}

pub fn run() {
    let cli = Cli::parse();
    dispatch(cli);
}

pub fn run_with_args(args: Vec<String>) {
    let cli = Cli::parse_from(args);
    dispatch(cli);
}

fn dispatch(cli: Cli) {
    let result = match cli.command {
        Commands::Train {
            epochs,
            iterations,
            seed,
            capacity,
            top,
            player,
            json,
        } => cmd_train(epochs, iterations, seed, capacity, top, player, json),
        Commands::Eval { cards } => cmd_eval(&cards),
    };
    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn cmd_train(
    epochs: u32,
    iterations: u32,
    seed: u64,
    capacity: usize,
    top: usize,
    player: Option<usize>,
    json: bool,
) -> SolverResult<()> {
    let players: Vec<usize> = match player {
        None => vec![0, 1],
        Some(p @ (0 | 1)) => vec![p],
        Some(p) => return Err(SolverError::InvalidPlayerIndex(p)),
    };

    let config = SolverConfig {
        seed,
        table_capacity: capacity,
    };
    log::info!(
        "training {} epoch(s) x {} iterations, seed {}",
        epochs,
        iterations,
        seed
    );

    let mut solver = Solver::new(GameState::new(Deal::new()), &config);
    let start = Instant::now();
    for epoch in 0..epochs {
        let epoch_start = Instant::now();
        solver.train(iterations);
        log::info!(
            "epoch {}/{} done in {:.2}s: {} + {} information sets",
            epoch + 1,
            epochs,
            epoch_start.elapsed().as_secs_f64(),
            solver.info_set_count(0),
            solver.info_set_count(1)
        );
    }
    let elapsed = start.elapsed().as_secs_f64();

    let report = StrategyReport::from_solver(&solver, &players, top);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!("{}", render_report(&report));
    }
    println!("{} {:.6}s", "Elapsed:".bold(), elapsed);
    Ok(())
}

fn cmd_eval(cards: &str) -> SolverResult<()> {
    let parsed = parse_board(cards)?;
    let seven: [Card; 7] = parsed
        .as_slice()
        .try_into()
        .map_err(|_| SolverError::InvalidBoardNotation(format!("expected 7 cards, got {}", parsed.len())))?;

    let score = evaluate_cards(&seven);
    let category = HandCategory::from_score(score);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new(""), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Cards".bold().to_string()),
        Cell::new(seven.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")),
    ]);
    table.add_row(vec![
        Cell::new("Category".bold().to_string()),
        Cell::new(category.to_string().green().bold().to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Score".bold().to_string()),
        Cell::new(format!("{:#08x}", score)),
    ]);

    println!();
    println!("{}", table);
    println!();
    Ok(())
}
