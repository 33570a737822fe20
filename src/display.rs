//! Read-only strategy reports built from a trained solver.

use std::collections::BTreeMap;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use itertools::Itertools;
use serde::Serialize;

use crate::cfr::{Solver, TraversalStats};
use crate::game_state::ALL_ABSTRACT_ACTIONS;
use crate::info_set::InfoSet;

#[derive(Debug, Clone, Serialize)]
pub struct InfoSetRow {
    pub id: String,
    /// Accumulated (discounted) average-strategy mass; a proxy for how often
    /// the information set is reached.
    pub mass: f64,
    pub strategy: Vec<(String, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerReport {
    pub player: usize,
    pub info_sets: usize,
    pub rows: Vec<InfoSetRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub iterations: u32,
    pub stats: TraversalStats,
    pub players: Vec<PlayerReport>,
}

fn row(id: String, node: &InfoSet) -> InfoSetRow {
    InfoSetRow {
        id,
        mass: node.strategy_sum().iter().sum(),
        strategy: node
            .labeled_average_strategy()
            .into_iter()
            .map(|(label, p)| (label.to_string(), p))
            .collect(),
    }
}

/// Full average strategy of one player: info-set identity -> {action label -> probability}.
pub fn strategy_map(solver: &Solver, player: usize) -> BTreeMap<String, BTreeMap<String, f64>> {
    solver
        .info_sets(player)
        .map(|(key, node)| {
            let strategy = node
                .labeled_average_strategy()
                .into_iter()
                .map(|(label, p)| (label.to_string(), p))
                .collect();
            (key.to_string(), strategy)
        })
        .collect()
}

impl StrategyReport {
    /// The `top` most-reached information sets of each player in `players`.
    pub fn from_solver(solver: &Solver, players: &[usize], top: usize) -> Self {
        let players = players
            .iter()
            .map(|&player| {
                let rows = solver
                    .info_sets(player)
                    .map(|(key, node)| row(key.to_string(), node))
                    .sorted_by(|a, b| b.mass.total_cmp(&a.mass).then_with(|| a.id.cmp(&b.id)))
                    .take(top)
                    .collect();
                PlayerReport {
                    player,
                    info_sets: solver.info_set_count(player),
                    rows,
                }
            })
            .collect();

        StrategyReport {
            iterations: solver.iterations(),
            stats: *solver.stats(),
            players,
        }
    }
}

fn probability_cell(p: Option<f64>) -> Cell {
    let text = match p {
        None => "-".dimmed().to_string(),
        Some(p) if p >= 0.5 => format!("{:.3}", p).green().bold().to_string(),
        Some(p) if p >= 0.1 => format!("{:.3}", p).yellow().to_string(),
        Some(p) => format!("{:.3}", p).dimmed().to_string(),
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

pub fn strategy_table(report: &PlayerReport) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Information set"), Cell::new("Mass")];
    header.extend(
        ALL_ABSTRACT_ACTIONS
            .iter()
            .map(|a| Cell::new(a.label()).set_alignment(CellAlignment::Center)),
    );
    table.set_header(header);

    for row in &report.rows {
        let mut cells = vec![
            Cell::new(&row.id),
            Cell::new(format!("{:.2}", row.mass)).set_alignment(CellAlignment::Right),
        ];
        cells.extend(ALL_ABSTRACT_ACTIONS.iter().map(|a| {
            let p = row
                .strategy
                .iter()
                .find(|(label, _)| label == a.label())
                .map(|&(_, p)| p);
            probability_cell(p)
        }));
        table.add_row(cells);
    }

    let title = format!(
        "Player {} ({} information sets, top {} shown)",
        report.player,
        report.info_sets,
        report.rows.len()
    );
    format!("  {}\n{}", title.bold(), table)
}

pub fn render_report(report: &StrategyReport) -> String {
    let stats = &report.stats;
    let mut out = format!(
        "{} {}  {} {}  {} {}  {} {}\n",
        "Iterations:".bold(),
        report.iterations,
        "Terminal:".bold(),
        stats.terminal_nodes,
        "Sampled:".bold(),
        stats.sampled_nodes,
        "Branched:".bold(),
        stats.branched_nodes,
    );
    for player in &report.players {
        out.push('\n');
        out.push_str(&strategy_table(player));
        out.push('\n');
    }
    out
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}
