//! Plain-text rendering of the registrant table and its surroundings.

use std::fmt::Write as _;

use client_core::{ConfirmationPrompt, EmptyState, Notification, NotificationLevel};
use shared::{
    domain::{Registrant, SortDirection, SortField, SortSpec, StatusTier},
    stats::RosterStats,
};

const MAX_CELL: usize = 28;

pub fn render_table(rows: &[&Registrant], sort: SortSpec, empty: Option<EmptyState>) -> String {
    if let Some(empty) = empty {
        return format!("{}\n", empty.message());
    }

    let mut header: Vec<String> = vec!["Row".to_string()];
    header.extend(SortField::ALL.iter().map(|&field| {
        if field == sort.field {
            let arrow = match sort.direction {
                SortDirection::Ascending => "▲",
                SortDirection::Descending => "▼",
            };
            format!("{} {arrow}", field.label())
        } else {
            field.label().to_string()
        }
    }));
    header.push("Tier".to_string());
    header.push("Accreditation".to_string());

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            let mut cells = vec![r.row_number.to_string()];
            cells.extend(SortField::ALL.iter().map(|&f| truncate(r.field(f))));
            cells.push(tier_label(r.status_tier()).to_string());
            cells.push(if r.is_accredited() {
                "Accredited".to_string()
            } else {
                "Pending".to_string()
            });
            cells
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            body.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    write_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut out, &rule, &widths);
    for row in &body {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_CELL - 1).collect();
    cut.push('…');
    cut
}

pub fn render_footer(showing: usize, stats: &RosterStats) -> String {
    format!(
        "Showing {showing} of {} registrants | {} accredited | {} pending\n",
        stats.total, stats.accredited, stats.pending
    )
}

pub fn render_stats(stats: &RosterStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total registrants: {}", stats.total);
    let _ = writeln!(out, "Accredited:        {}", stats.accredited);
    let _ = writeln!(out, "Pending:           {}", stats.pending);
    let _ = writeln!(out, "Completion rate:   {}%", stats.completion_rate);
    out
}

pub fn render_prompt(prompt: &ConfirmationPrompt<'_>) -> String {
    let mut out = String::from("Confirm accreditation\n");
    let _ = writeln!(out, "Are you sure you want to accredit {}?", prompt.full_name);
    let _ = writeln!(out, "  Email:  {}", prompt.email);
    let _ = writeln!(out, "  Status: {}", prompt.status);
    if prompt.busy {
        out.push_str("Processing...\n");
    }
    out
}

pub fn render_notification(notification: &Notification) -> String {
    let marker = match notification.level {
        NotificationLevel::Success => "+",
        NotificationLevel::Error => "!",
    };
    format!("[{marker}] {}: {}", notification.title, notification.description)
}

pub fn tier_label(tier: StatusTier) -> &'static str {
    match tier {
        StatusTier::Gold => "gold",
        StatusTier::Success => "success",
        StatusTier::Warning => "warning",
        StatusTier::Secondary => "secondary",
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
