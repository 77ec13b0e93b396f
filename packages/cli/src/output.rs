// ABOUTME: Terminal output helpers: tables, banners, spinners and cell formatting
// ABOUTME: Every command prints through these so the look stays consistent

use std::fmt::Display;
use std::time::Duration;

use colored::*;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};

use itms_controllers::{ListError, ListState};
use itms_core::Resource;

use crate::render::Tabular;

/// Placeholder for an absent value
pub const EMPTY_CELL: &str = "—";

pub fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Display an optional value, or the placeholder
pub fn cell<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| EMPTY_CELL.to_string())
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

pub fn format_datetime(value: &chrono::NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M").to_string()
}

/// Spinner shown on stderr while a request is pending
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "!".yellow().bold(), message);
}

/// Error banner printed above a list whose rows may be stale
pub fn error_banner(error: &ListError) -> String {
    format!("{} {}", "✗".red().bold(), error.message.red())
}

/// Rows of the current page as a table
pub fn list_table<R: Resource + Tabular>(items: &[R]) -> Table {
    let mut table = new_table();
    table.set_header(R::headers());
    for item in items {
        table.add_row(item.row());
    }
    table
}

/// One-line paging summary, e.g. `Page 2 of 3 · 25 projects`
pub fn page_summary<R: Resource>(state: &ListState<R>) -> String {
    let total_pages = state.total_pages.max(1);
    format!(
        "Page {} of {} · {} {}",
        state.page + 1,
        total_pages,
        state.total_elements,
        plural(R::NAME, state.total_elements)
    )
}

fn plural(name: &str, count: u64) -> String {
    if count == 1 {
        name.to_string()
    } else if let Some(stem) = name.strip_suffix('y') {
        format!("{}ies", stem)
    } else {
        format!("{}s", name)
    }
}

/// Print a whole list view: banner, table and paging line
pub fn print_list<R: Resource + Tabular>(state: &ListState<R>) {
    if let Some(error) = &state.error {
        eprintln!("{}", error_banner(error));
    }
    if state.items.is_empty() {
        println!("{}", format!("No {} found", plural(R::NAME, 0)).yellow());
        return;
    }
    println!("{}", list_table(&state.items));
    println!("{}", page_summary(state).dimmed());
}

/// Print label/value pairs of one record
pub fn print_details(title: &str, details: &[(&str, String)]) {
    println!("{}", title.blue().bold());
    println!();
    let width = details.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in details {
        println!("  {:width$}  {}", label.bold(), value, width = width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("포털 재구축 프로젝트", 5), "포털 재…");
    }

    #[test]
    fn test_cell_placeholder() {
        assert_eq!(cell(Some(3)), "3");
        assert_eq!(cell::<String>(None), EMPTY_CELL);
        assert_eq!(cell(Some("")), EMPTY_CELL);
    }

    #[test]
    fn test_plural_names() {
        assert_eq!(plural("project", 2), "projects");
        assert_eq!(plural("project", 1), "project");
        assert_eq!(plural("specification", 0), "specifications");
        assert_eq!(plural("company", 3), "companies");
    }
}
