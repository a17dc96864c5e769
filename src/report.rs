//! Report
//!
//! Terminal rendering of an [`OptimizationResult`].

use std::{fmt::Write as _, io};

use rust_decimal::Decimal;
use rusty_money::MoneyError;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    analysis::CostLine,
    optimiser::{OptimizationResult, Strategy},
};

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Writing to the output failed.
    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Write the recommended strategy, the alternatives, marginal costs and suggestions.
///
/// # Errors
///
/// Returns a [`ReportError`] if the output cannot be written.
pub fn write_to(mut out: impl io::Write, result: &OptimizationResult<'_>) -> Result<(), ReportError> {
    let recommended = &result.recommended;

    writeln!(out, "\n\x1b[1m{}\x1b[0m", recommended.name)?;
    writeln!(out, "{}", recommended.reasoning)?;

    if !recommended.lines.is_empty() {
        write_lines_table(&mut out, &recommended.lines)?;
    }

    write_summary(&mut out, recommended)?;

    for alternative in &result.alternatives {
        writeln!(out, "\n\x1b[1m{}\x1b[0m", alternative.name)?;
        writeln!(out, "{}", alternative.reasoning)?;

        if !alternative.lines.is_empty() {
            write_lines_table(&mut out, &alternative.lines)?;
        }

        writeln!(out, " Total: {}", alternative.total())?;
    }

    if !result.marginal_costs.is_empty() {
        let mut builder = Builder::default();

        builder.push_record(["Resort", "Cost of +1 Day"]);

        for marginal in &result.marginal_costs {
            builder.push_record([marginal.name.clone(), marginal.cost.to_string()]);
        }

        write_table(&mut out, builder, 1)?;
    }

    if !result.suggestions.is_empty() {
        writeln!(out, "\nAlso covered by your passes:")?;

        for resort in &result.suggestions {
            writeln!(out, "  - {} ({})", resort.name, resort.region)?;
        }
    }

    writeln!(out)?;

    Ok(())
}

fn write_lines_table(out: &mut impl io::Write, lines: &[CostLine<'_>]) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["", "Purchase", "Notes", "Cost"]);

    for (idx, line) in lines.iter().enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            line.description.clone(),
            line.notes.clone().unwrap_or_default(),
            line.cost.to_string(),
        ]);
    }

    write_table(out, builder, 3)
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    money_column: usize,
) -> Result<(), ReportError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')));

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(money_column..=money_column), Alignment::right());

    writeln!(out, "\n{}", colorize_borders(&table.to_string()))?;

    Ok(())
}

fn write_summary(out: &mut impl io::Write, strategy: &Strategy<'_>) -> Result<(), ReportError> {
    let points = percent_points(strategy)?;

    let rows = [
        (" Passes:", strategy.pass_cost().to_string()),
        (" Tickets:", strategy.ticket_cost().to_string()),
        (" Total:", strategy.total().to_string()),
        (" Savings:", format!("({points:.2}%) {}", strategy.savings())),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, "{label:>label_width$}  {value:>value_width$}")?;
    }

    Ok(())
}

/// Savings as percent points, e.g. `25.00`.
fn percent_points(strategy: &Strategy<'_>) -> Result<Decimal, MoneyError> {
    let fraction = strategy.savings_percent()?;

    Ok(((fraction * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2))
}

/// Wraps runs of box-drawing characters in ANSI dark grey.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}
