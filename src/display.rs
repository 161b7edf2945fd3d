use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::engine::{moving_average, ApproxReport, ExactReport};

const SPARK_LEVELS: [char; 8] = [
    '\u{2581}', '\u{2582}', '\u{2583}', '\u{2584}', '\u{2585}', '\u{2586}', '\u{2587}', '\u{2588}',
];

/// Shade a unit count by how much of the battlefield's capacity it uses.
fn shaded_units(units: u32, capacity: u32) -> String {
    let text = units.to_string();
    if units == 0 {
        return text.dimmed().to_string();
    }
    let fill = units as f64 / capacity.max(1) as f64;
    if fill >= 0.75 {
        text.blue().bold().to_string()
    } else if fill >= 0.4 {
        text.blue().to_string()
    } else {
        text.cyan().to_string()
    }
}

/// Ranked defender allocations with one column per battlefield.
pub fn ranked_table(report: &ExactReport) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![
        Cell::new("#"),
        Cell::new("Index").set_alignment(CellAlignment::Right),
    ];
    for (i, cap) in report.capacities.iter().enumerate() {
        header.push(Cell::new(format!("BF{} (\u{2264}{})", i + 1, cap)).set_alignment(CellAlignment::Center));
    }
    header.push(Cell::new("Win %").set_alignment(CellAlignment::Right));
    table.set_header(header);

    for (rank, entry) in report.ranked.iter().enumerate() {
        let mut row = vec![
            Cell::new((rank + 1).to_string().bold().to_string()),
            Cell::new(entry.index).set_alignment(CellAlignment::Right),
        ];
        for (&units, &cap) in entry.allocation.units().iter().zip(&report.capacities) {
            row.push(Cell::new(shaded_units(units, cap)).set_alignment(CellAlignment::Center));
        }
        row.push(
            Cell::new(format!("{:.1}", entry.win_probability * 100.0))
                .set_alignment(CellAlignment::Right),
        );
        table.add_row(row);
    }

    table.to_string()
}

pub fn units_bar(units: f64, capacity: u32, width: usize) -> String {
    let frac = if capacity == 0 {
        0.0
    } else {
        (units / capacity as f64).clamp(0.0, 1.0)
    };
    let filled = (frac * width as f64).round() as usize;
    "\u{2588}".repeat(filled) + &"\u{2591}".repeat(width - filled)
}

/// Expected allocation of both players, battlefield by battlefield.
pub fn allocation_table(report: &ApproxReport) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Battlefield"),
        Cell::new("Cap").set_alignment(CellAlignment::Right),
        Cell::new("Value").set_alignment(CellAlignment::Right),
        Cell::new("Attacker").set_alignment(CellAlignment::Right),
        Cell::new(""),
        Cell::new("Defender").set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);

    for (i, &cap) in report.capacities.iter().enumerate() {
        let att = report.attacker_allocation[i];
        let def = report.defender_allocation[i];
        table.add_row(vec![
            Cell::new(format!("BF{}", i + 1).bold().to_string()),
            Cell::new(cap).set_alignment(CellAlignment::Right),
            Cell::new(format!("{}", report.values[i])).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", att)).set_alignment(CellAlignment::Right),
            Cell::new(units_bar(att, cap, 10).red().to_string()),
            Cell::new(format!("{:.2}", def)).set_alignment(CellAlignment::Right),
            Cell::new(units_bar(def, cap, 10).blue().to_string()),
        ]);
    }

    let att_total: f64 = report.attacker_allocation.iter().sum();
    let def_total: f64 = report.defender_allocation.iter().sum();
    table.add_row(vec![
        Cell::new("Total".bold().to_string()),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!("{:.2}", att_total)).set_alignment(CellAlignment::Right),
        Cell::new(""),
        Cell::new(format!("{:.2}", def_total)).set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);

    table.to_string()
}

/// Solver diagnostics: payoffs, regrets and exploitability.
pub fn summary_table(report: &ApproxReport, smoothing: usize) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Metric").set_alignment(CellAlignment::Left),
        Cell::new("Value").set_alignment(CellAlignment::Right),
    ]);

    let smoothed = moving_average(&report.payoff_history, smoothing);
    let rows: Vec<(&str, String)> = vec![
        ("Iterations", report.iterations.to_string()),
        ("Pool size", report.pool_size.to_string()),
        ("Mean payoff", format!("{:.4}", report.mean_payoff)),
        (
            "Final moving avg",
            smoothed
                .last()
                .map_or("-".to_string(), |v| format!("{:.4}", v)),
        ),
        ("Game value", format!("{:.4}", report.game_value)),
        ("Attacker regret", format!("{:.6}", report.attacker_regret)),
        ("Defender regret", format!("{:.6}", report.defender_regret)),
        ("Exploitability", format!("{:.6}", report.exploitability)),
    ];

    for (name, value) in rows {
        table.add_row(vec![
            Cell::new(name.bold().to_string()),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }

    table.to_string()
}

/// One-line sketch of a series, resampled to at most `width` characters.
pub fn sparkline(series: &[f64], width: usize) -> String {
    if series.is_empty() || width == 0 {
        return String::new();
    }

    let bucket = series.len().div_ceil(width);
    let points: Vec<f64> = series
        .chunks(bucket)
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect();

    let lo = points.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    points
        .iter()
        .map(|&p| {
            let level = if span > 0.0 {
                (((p - lo) / span) * (SPARK_LEVELS.len() - 1) as f64).round() as usize
            } else {
                0
            };
            SPARK_LEVELS[level]
        })
        .collect()
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("  {}", content);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_is_fixed_width() {
        assert_eq!(units_bar(2.0, 4, 10).chars().count(), 10);
        assert_eq!(units_bar(9.0, 4, 10), "\u{2588}".repeat(10));
        assert_eq!(units_bar(1.0, 0, 4), "\u{2591}".repeat(4));
    }

    #[test]
    fn sparkline_spans_levels() {
        let line = sparkline(&[0.0, 1.0, 2.0, 3.0], 4);
        assert_eq!(line.chars().next(), Some(SPARK_LEVELS[0]));
        assert_eq!(line.chars().last(), Some(SPARK_LEVELS[7]));
        assert_eq!(sparkline(&[1.0; 100], 10).chars().count(), 10);
        assert!(sparkline(&[], 10).is_empty());
    }
}
