use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::history::{format_run_time, ChartPoint, Progress, Session};
use crate::scoring::{Event, EventScore, ScoreInput, ScoreResult, ScoringMode};
use crate::settings::Settings;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score for display with two decimals. Stored values keep full precision.
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

fn format_raw(event: Event, raw: u32) -> String {
    match event {
        Event::Run => format_run_time(raw),
        Event::PushUps | Event::SitUps => format!("{} reps", raw),
    }
}

fn format_event_line(entry: &EventScore, use_colors: bool) -> String {
    let mode = match entry.mode {
        ScoringMode::Interpolation => "",
        ScoringMode::Lookup => " (table)",
    };
    let label = format!("{:<11}", entry.event.label());
    let raw = format!("{:>9}", format_raw(entry.event, entry.raw));
    let score = format!("{:>6}", format_score(entry.score));

    if use_colors {
        format!(
            "{} {}  band {:<5}  {}{}",
            label.bold(),
            raw,
            entry.band.cyan(),
            score.yellow(),
            mode.dimmed()
        )
    } else {
        format!(
            "{} {}  band {:<5}  {}{}",
            label, raw, entry.band.key(), score, mode
        )
    }
}

/// Multi-line result: one line per event, then the total
pub fn format_result(input: &ScoreInput, result: &ScoreResult, use_colors: bool) -> String {
    let header = format!("Age {}, {}", input.age, input.gender);
    let total = format!("Your Total Score: {}%", format_score(result.total_score));

    let mut lines = vec![if use_colors {
        header.dimmed().to_string()
    } else {
        header
    }];
    lines.extend(
        result
            .breakdown
            .iter()
            .map(|entry| format_event_line(entry, use_colors)),
    );
    lines.push(if use_colors {
        total.bold().green().to_string()
    } else {
        total
    });
    lines.join("\n")
}

/// Format saved sessions as one line per session with a 1-based index.
/// Index column: 3 chars (fits "99."), right-aligned
pub fn format_session_list(sessions: &[Session], use_colors: bool) -> String {
    if sessions.is_empty() {
        return "No sessions saved yet.".to_string();
    }

    sessions
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            let index_str = format!("{:>2}.", idx + 1);
            let total = format!("{:>6}%", format_score(session.total_score));
            let detail = format!(
                "Push-Ups: {} reps  Sit-Ups: {} reps  Run: {}",
                session.push_ups, session.sit_ups, session.run_time
            );

            if use_colors {
                format!(
                    "{} {}  {}  {}",
                    index_str.dimmed(),
                    session.date_label().cyan(),
                    total.bold(),
                    detail
                )
            } else {
                format!(
                    "{} {}  {}  {}",
                    index_str,
                    session.date_label(),
                    total,
                    detail
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-paragraph summary of how total scores have moved
pub fn format_progress(progress: &Progress) -> String {
    format!(
        "Sessions: {}  First: {}%  Latest: {}%  Best: {}%  Change: {:+.2}",
        progress.count,
        format_score(progress.first),
        format_score(progress.latest),
        format_score(progress.best),
        progress.change
    )
}

/// Total scores in saved order, e.g. "Trend: 70.00 -> 75.50"
pub fn format_trend(points: &[ChartPoint]) -> String {
    let scores = points
        .iter()
        .map(|p| format_score(p.score))
        .collect::<Vec<_>>()
        .join(" -> ");
    format!("Trend: {}", scores)
}

pub fn format_settings(settings: &Settings) -> String {
    let age = if settings.age.is_empty() {
        "(not set)"
    } else {
        settings.age.as_str()
    };
    format!("Age: {}\nGender: {}", age, settings.gender)
}
