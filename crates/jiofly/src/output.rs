//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders page facts in the format selected by `--output`. Table uses
//! `tabled`, structured formats use serde, plain emits one
//! `page/fact value` line per fact.

use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use jiofly_api::PageFacts;

use crate::cli::{ColorMode, OutputFormat};

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Row types ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct FactRow {
    #[tabled(rename = "Page")]
    page: String,
    #[tabled(rename = "Fact")]
    fact: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
pub struct KeyRow {
    #[tabled(rename = "Page")]
    pub page: &'static str,
    #[tabled(rename = "Document")]
    pub path: &'static str,
    #[tabled(rename = "Facts")]
    pub facts: String,
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render page reports in the chosen format.
///
/// Unavailable pages show up as a single marker row in table and plain
/// output so an unreachable page is never silently dropped.
pub fn render_pages(format: &OutputFormat, pages: &[PageFacts], color: bool) -> String {
    match format {
        OutputFormat::Table => render_pages_table(pages, color),
        OutputFormat::Json => render_json(pages, false),
        OutputFormat::JsonCompact => render_json(pages, true),
        OutputFormat::Yaml => render_yaml(pages),
        OutputFormat::Plain => render_pages_plain(pages),
    }
}

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_pages_table(pages: &[PageFacts], color: bool) -> String {
    let mut rows = Vec::new();
    let mut notes = String::new();

    for report in pages {
        let page = report.page.to_string();
        if !report.is_available() {
            let marker = if color {
                "unavailable".red().to_string()
            } else {
                "unavailable".to_owned()
            };
            rows.push(FactRow {
                page,
                fact: "-".into(),
                value: marker,
            });
            continue;
        }
        for err in &report.malformed {
            let _ = writeln!(notes, "note: {page}: {err}");
        }
        rows.extend(report.facts.iter().map(|(fact, value)| FactRow {
            page: page.clone(),
            fact: fact.clone(),
            value: value.clone(),
        }));
    }

    let table = render_table(&rows);
    if notes.is_empty() {
        table
    } else {
        format!("{table}\n{}", notes.trim_end())
    }
}

fn render_pages_plain(pages: &[PageFacts]) -> String {
    let mut lines = Vec::new();
    for report in pages {
        if !report.is_available() {
            lines.push(format!("{} unavailable", report.page));
            continue;
        }
        lines.extend(
            report
                .facts
                .iter()
                .map(|(fact, value)| format!("{}/{fact} {value}", report.page)),
        );
    }
    lines.join("\n")
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    if compact {
        serde_json::to_string(data).expect("serialization should not fail")
    } else {
        serde_json::to_string_pretty(data).expect("serialization should not fail")
    }
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).expect("serialization should not fail")
}
