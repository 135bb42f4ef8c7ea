pub mod bands;
pub mod engine;
pub mod error;
pub mod input;
pub mod table;
pub mod validation;

pub use bands::{classify_age_band, classify_run_age_band, AgeBand};
pub use engine::{
    calculate_score, composite, score_by_interpolation, score_by_lookup, score_event, EventScore,
    ScoreResult, PASSING_SCORE, PERFECT_SCORE,
};
pub use error::ScoringError;
pub use input::{parse_count, parse_run_time, Event, Gender, RawScoreInput, ScoreInput};
pub use table::{GenderTable, Range, ReferenceTable, ScoringMode, Standard};
pub use validation::validate_table;
