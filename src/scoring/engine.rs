use serde::Serialize;
use std::collections::BTreeMap;

use super::bands::{classify_age_band, classify_run_age_band, AgeBand};
use super::error::ScoringError;
use super::input::{Event, Gender, ScoreInput};
use super::table::{Range, ReferenceTable, ScoringMode, Standard};

/// Score for meeting (but not beating) the passing standard
pub const PASSING_SCORE: f64 = 65.0;
pub const PERFECT_SCORE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EventScore {
    pub event: Event,
    pub band: AgeBand,
    pub raw: u32, // reps, or seconds for the run
    pub mode: ScoringMode,
    pub score: f64,
}

/// Per-event scores and their unweighted mean, at full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub push_up_score: f64,
    pub sit_up_score: f64,
    pub run_score: f64,
    pub total_score: f64,
    #[serde(skip)]
    pub breakdown: Vec<EventScore>,
}

/// Linear score between the passing (65) and perfect (100) standards.
///
/// With `higher_is_better` the value is a rep count and `range.min < range.max`;
/// otherwise it is a time and `range.min` is the slower limit.
pub fn score_by_interpolation(
    value: u32,
    range: &Range,
    higher_is_better: bool,
) -> Result<f64, ScoringError> {
    let Range { min, max } = *range;
    if min == max {
        return Err(ScoringError::DegenerateRange { value: min });
    }

    let (value, min, max) = (f64::from(value), f64::from(min), f64::from(max));
    let span = PERFECT_SCORE - PASSING_SCORE;

    let score = if higher_is_better {
        if value <= min {
            PASSING_SCORE
        } else if value >= max {
            PERFECT_SCORE
        } else {
            PASSING_SCORE + (value - min) / (max - min) * span
        }
    } else if value >= min {
        PASSING_SCORE
    } else if value <= max {
        PERFECT_SCORE
    } else {
        PASSING_SCORE + (min - value) / (min - max) * span
    };

    Ok(score)
}

/// Exact-match score from a sparse value -> score table.
///
/// At or past the highest key scores 100, below the lowest key scores 0, and
/// a value between keys with no entry of its own scores 0. Returns `None`
/// for an empty table.
pub fn score_by_lookup(value: u32, table: &BTreeMap<u32, f64>) -> Option<f64> {
    let (&lowest, _) = table.first_key_value()?;
    let (&highest, _) = table.last_key_value()?;

    let score = if value >= highest {
        PERFECT_SCORE
    } else if value < lowest {
        0.0
    } else {
        table.get(&value).copied().unwrap_or(0.0)
    };
    Some(score)
}

/// Unweighted mean of the three event scores. Not rounded.
pub fn composite(push_up: f64, sit_up: f64, run: f64) -> f64 {
    (push_up + sit_up + run) / 3.0
}

/// Band lookup for an event; the run has its own banding.
pub fn band_for(event: Event, age: u32) -> AgeBand {
    match event {
        Event::Run => classify_run_age_band(age),
        Event::PushUps | Event::SitUps => classify_age_band(age),
    }
}

/// Score a single event for a given age and gender.
pub fn score_event(
    event: Event,
    value: u32,
    age: u32,
    gender: Gender,
    table: &ReferenceTable,
) -> Result<EventScore, ScoringError> {
    let band = band_for(event, age);
    let standard = table.entry(event, gender, band)?;

    let score = match standard {
        Standard::Range(range) => score_by_interpolation(value, range, event.higher_is_better())?,
        Standard::Points(points) => {
            score_by_lookup(value, points).ok_or(ScoringError::Lookup {
                event,
                gender,
                band,
            })?
        }
    };

    Ok(EventScore {
        event,
        band,
        raw: value,
        mode: standard.mode(),
        score,
    })
}

pub fn calculate_score(
    input: &ScoreInput,
    table: &ReferenceTable,
) -> Result<ScoreResult, ScoringError> {
    let breakdown = Event::ALL
        .iter()
        .map(|&event| score_event(event, input.raw_value(event), input.age, input.gender, table))
        .collect::<Result<Vec<_>, _>>()?;

    let push_up_score = breakdown[0].score;
    let sit_up_score = breakdown[1].score;
    let run_score = breakdown[2].score;

    Ok(ScoreResult {
        push_up_score,
        sit_up_score,
        run_score,
        total_score: composite(push_up_score, sit_up_score, run_score),
        breakdown,
    })
}
