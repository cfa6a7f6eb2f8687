//! Terminal rendering for the `search` command.

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::models::PaperRecord;

const ELLIPSIS: &str = "...";

/// Columns available on stdout, 100 when unknown.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(100)
}

pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Kind of a one-line status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Error,
    Warning,
    Search,
}

impl Status {
    pub fn icon(self) -> &'static str {
        match self {
            Status::Error => "✗",
            Status::Warning => "⚠",
            Status::Search => "🔍",
        }
    }
}

/// Print a status line. Errors go to stderr.
pub fn print_status(status: Status, msg: &str) {
    match status {
        Status::Error => eprintln!("{} {}", status.icon().red().bold(), msg),
        Status::Warning => println!("{} {}", status.icon().yellow().bold(), msg),
        Status::Search => println!("{} {}", status.icon().yellow(), msg),
    }
}

pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Total match count, request time and the publication span of the papers.
pub fn print_search_header(total: u64, range: Option<(NaiveDate, NaiveDate)>, elapsed: Duration) {
    println!();
    println!(
        "{} Total Papers Found: {} {}",
        Status::Search.icon().yellow().bold(),
        format_number(total).green().bold(),
        format!("({:.2}s)", elapsed.as_secs_f64()).dimmed()
    );
    if let Some((from, to)) = range {
        println!(
            "  Date Range of Retrieved Papers: {} to {}",
            from.to_string().cyan(),
            to.to_string().cyan()
        );
    }
}

/// Print one paper under its 1-based position.
pub fn print_paper(position: usize, paper: &PaperRecord) {
    println!();
    println!("{} {}", format!("{}.", position).dimmed(), paper.title.blue().bold());
    println!("   {} {}", "Authors:".bold(), paper.authors);
    println!("   {} {}", "Published:".bold(), paper.published_display().yellow());
    println!("   {} {}", "Link:".bold(), paper.link.underline());
    println!();
    for line in wrap(&paper.summary, terminal_width().saturating_sub(6).max(20)) {
        println!("      {}", line.dimmed());
    }
    println!("{}", "─".repeat(terminal_width().min(80)).dimmed());
}

/// Greedy word wrap; a word wider than `width` sits on its own line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// `1234567` -> `1,234,567`
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Cut `text` to at most `max_width` display columns, marking the cut with `...`.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(ELLIPSIS.len());

    let mut used = 0;
    let mut kept = String::new();
    for ch in text.chars() {
        used += ch.width().unwrap_or(0);
        if used > budget {
            break;
        }
        kept.push(ch);
    }
    kept + ELLIPSIS
}

/// Spinner drawn while the request is in flight.
pub struct Spinner {
    bar: indicatif::ProgressBar,
}

impl Spinner {
    pub fn new(msg: &str) -> Self {
        let bar = indicatif::ProgressBar::new_spinner();
        bar.set_style(style("{spinner:.cyan} {msg}", "⠁⠂⠄⡀⢀⠠⠐⠈ "));
        bar.set_message(msg.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// A spinner that never draws, for quiet or piped output.
    pub fn hidden() -> Self {
        Self {
            bar: indicatif::ProgressBar::hidden(),
        }
    }

    pub fn finish_with_error(&self, msg: &str) {
        self.bar.set_style(style("{spinner:.red} {msg}", "✗✗"));
        self.bar.finish_with_message(msg.to_string());
    }

    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

fn style(template: &str, ticks: &str) -> indicatif::ProgressStyle {
    indicatif::ProgressStyle::with_template(template)
        .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
        .tick_chars(ticks)
}
