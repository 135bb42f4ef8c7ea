use chrono::{DateTime, Local, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::scoring::{parse_run_time, ScoreInput, ScoreResult};

/// One saved test attempt.
///
/// Example JSON:
/// ```json
/// {"date": "2024-10-01T07:30:00.000Z", "pushUpScore": 40, "sitUpScore": 45,
///  "runTime": "15m 30s", "totalScore": 84.27}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Always written with milliseconds, e.g. "2024-10-01T07:30:00.000Z"
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,

    /// Push-up rep count. The key says "score" but existing history files
    /// have always stored reps here, so the normalized score lives in
    /// `push_up_points` instead.
    #[serde(rename = "pushUpScore", deserialize_with = "lenient_reps")]
    pub push_ups: u32,

    /// Sit-up rep count, stored under `sitUpScore` (see `push_ups`)
    #[serde(rename = "sitUpScore", deserialize_with = "lenient_reps")]
    pub sit_ups: u32,

    /// "<m>m <s>s"
    pub run_time: String,

    pub total_score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_up_points: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sit_up_points: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_points: Option<f64>,
}

impl Session {
    pub fn new(date: DateTime<Utc>, input: &ScoreInput, result: &ScoreResult) -> Self {
        Self {
            date,
            push_ups: input.push_ups,
            sit_ups: input.sit_ups,
            run_time: format_run_time(input.run_seconds),
            total_score: result.total_score,
            push_up_points: Some(result.push_up_score),
            sit_up_points: Some(result.sit_up_score),
            run_points: Some(result.run_score),
        }
    }

    /// Session stamped with the current time, at millisecond precision
    pub fn record(input: &ScoreInput, result: &ScoreResult) -> Self {
        Self::new(Utc::now().trunc_subsecs(3), input, result)
    }

    /// Run time in seconds, if the stored string is readable
    pub fn run_seconds(&self) -> Option<u32> {
        parse_run_time(&self.run_time).ok()
    }

    /// Local calendar date for display
    pub fn date_label(&self) -> String {
        self.date.with_timezone(&Local).format("%Y-%m-%d").to_string()
    }
}

mod iso_millis {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(deserializer)
    }
}

/// Older records may hold fractional, negative or null rep counts.
/// Those load truncated and clamped into range (null as 0) instead of failing the history.
fn lenient_reps<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<f64>::deserialize(deserializer)?;
    let reps = value.map_or(0, |v| v as u32);
    if value != Some(f64::from(reps)) {
        tracing::warn!(stored = ?value, loaded = reps, "adjusted rep count in saved session");
    }
    Ok(reps)
}

/// Format seconds the way history records store run times: "18m 0s"
pub fn format_run_time(seconds: u32) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// Summary of total scores across a history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub count: usize,
    pub first: f64,
    pub latest: f64,
    pub best: f64,
    /// latest - first
    pub change: f64,
}

pub fn progress(sessions: &[Session]) -> Option<Progress> {
    let first = sessions.first()?.total_score;
    let latest = sessions.last()?.total_score;
    let best = sessions
        .iter()
        .map(|s| s.total_score)
        .fold(f64::NEG_INFINITY, f64::max);

    Some(Progress {
        count: sessions.len(),
        first,
        latest,
        best,
        change: latest - first,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub score: f64,
}

/// Date label and total score per session, in saved order
pub fn chart_points(sessions: &[Session]) -> Vec<ChartPoint> {
    sessions
        .iter()
        .map(|s| ChartPoint {
            label: s.date_label(),
            score: s.total_score,
        })
        .collect()
}
