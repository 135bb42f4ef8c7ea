use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ScoringError;

/// Table partition selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(ScoringError::invalid(
                "gender",
                format!("expected 'male' or 'female', got '{}'", other),
            )),
        }
    }
}

/// The three scored events of the test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    PushUps,
    SitUps,
    Run,
}

impl Event {
    pub const ALL: [Event; 3] = [Event::PushUps, Event::SitUps, Event::Run];

    /// Key used in reference tables and error messages
    pub fn key(&self) -> &'static str {
        match self {
            Event::PushUps => "push_ups",
            Event::SitUps => "sit_ups",
            Event::Run => "run",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Event::PushUps => "Push-Ups",
            Event::SitUps => "Sit-Ups",
            Event::Run => "3.2 km Run",
        }
    }

    /// Strength events reward more reps; the run rewards a lower time.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, Event::Run)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// Validated input to the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreInput {
    pub push_ups: u32,
    pub sit_ups: u32,
    /// Total run time in seconds
    pub run_seconds: u32,
    pub age: u32,
    pub gender: Gender,
}

impl ScoreInput {
    /// Raw performance value for an event (reps, or seconds for the run)
    pub fn raw_value(&self, event: Event) -> u32 {
        match event {
            Event::PushUps => self.push_ups,
            Event::SitUps => self.sit_ups,
            Event::Run => self.run_seconds,
        }
    }
}

/// Unvalidated input as it arrives from a caller.
///
/// Example JSON:
/// ```json
/// {"pushUps": 40, "sitUps": 45, "runMinutes": 15, "runSeconds": 30, "age": 24, "gender": "male"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScoreInput {
    pub push_ups: i64,
    pub sit_ups: i64,
    pub run_minutes: i64,
    pub run_seconds: i64,
    pub age: i64,
    pub gender: String,
}

impl RawScoreInput {
    pub fn validate(&self) -> Result<ScoreInput, ScoringError> {
        let push_ups = non_negative("push-ups", self.push_ups)?;
        let sit_ups = non_negative("sit-ups", self.sit_ups)?;
        let minutes = non_negative("run minutes", self.run_minutes)?;
        let seconds = non_negative("run seconds", self.run_seconds)?;
        let run_seconds = minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(|| ScoringError::invalid("run time", "too large"))?;

        let age = non_negative("age", self.age)?;
        if age == 0 {
            return Err(ScoringError::invalid("age", "must be a positive number"));
        }

        Ok(ScoreInput {
            push_ups,
            sit_ups,
            run_seconds,
            age,
            gender: self.gender.parse()?,
        })
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<u32, ScoringError> {
    if value < 0 {
        return Err(ScoringError::invalid(
            field,
            format!("must be non-negative, got {}", value),
        ));
    }
    u32::try_from(value).map_err(|_| ScoringError::invalid(field, format!("{} is too large", value)))
}

/// Parse a rep count or age typed by the user.
pub fn parse_count(field: &'static str, text: &str) -> Result<u32, ScoringError> {
    let text = text.trim();
    let value: i64 = text
        .parse()
        .map_err(|_| ScoringError::invalid(field, format!("'{}' is not a whole number", text)))?;
    non_negative(field, value)
}

/// Parse a run time into seconds.
///
/// Accepts "18:43", humantime durations such as "18m43s" or "18m 43s", and a
/// bare number of seconds.
pub fn parse_run_time(text: &str) -> Result<u32, ScoringError> {
    let text = text.trim();
    if text.starts_with('-') {
        return Err(ScoringError::invalid(
            "run time",
            format!("must be non-negative, got '{}'", text),
        ));
    }

    if let Some((minutes, seconds)) = text.split_once(':') {
        let minutes = parse_count("run minutes", minutes)?;
        let seconds = parse_count("run seconds", seconds)?;
        return minutes
            .checked_mul(60)
            .and_then(|m| m.checked_add(seconds))
            .ok_or_else(|| ScoringError::invalid("run time", "too large"));
    }

    if text.chars().all(|c| c.is_ascii_digit()) && !text.is_empty() {
        return parse_count("run time", text);
    }

    let duration = humantime::parse_duration(text).map_err(|e| {
        ScoringError::invalid("run time", format!("'{}' is not a duration ({})", text, e))
    })?;
    u32::try_from(duration.as_secs())
        .map_err(|_| ScoringError::invalid("run time", format!("'{}' is too large", text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawScoreInput {
        RawScoreInput {
            push_ups: 40,
            sit_ups: 45,
            run_minutes: 15,
            run_seconds: 30,
            age: 24,
            gender: "male".to_string(),
        }
    }

    #[test]
    fn test_validate_ok() {
        let input = raw().validate().unwrap();
        assert_eq!(input.push_ups, 40);
        assert_eq!(input.sit_ups, 45);
        assert_eq!(input.run_seconds, 15 * 60 + 30);
        assert_eq!(input.age, 24);
        assert_eq!(input.gender, Gender::Male);
    }

    #[test]
    fn test_validate_negative_push_ups() {
        let mut input = raw();
        input.push_ups = -1;
        let err = input.validate().unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput { field: "push-ups", .. }));
    }

    #[test]
    fn test_validate_negative_run_seconds() {
        let mut input = raw();
        input.run_seconds = -5;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_validate_zero_age() {
        let mut input = raw();
        input.age = 0;
        let err = input.validate().unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput { field: "age", .. }));
    }

    #[test]
    fn test_validate_unknown_gender() {
        let mut input = raw();
        input.gender = "other".to_string();
        let err = input.validate().unwrap_err();
        assert!(matches!(err, ScoringError::InvalidInput { field: "gender", .. }));
    }

    #[test]
    fn test_validate_carries_seconds_over() {
        let mut input = raw();
        input.run_minutes = 10;
        input.run_seconds = 75;
        assert_eq!(input.validate().unwrap().run_seconds, 675);
    }

    #[test]
    fn test_raw_input_from_json() {
        let json = r#"{"pushUps": 40, "sitUps": 45, "runMinutes": 15, "runSeconds": 30, "age": 24, "gender": "female"}"#;
        let parsed: RawScoreInput = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.validate().unwrap().gender, Gender::Female);
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(" f ".parse::<Gender>().unwrap(), Gender::Female);
        assert!("x".parse::<Gender>().is_err());
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("sit-ups", " 42 ").unwrap(), 42);
        assert!(parse_count("sit-ups", "-2").is_err());
        assert!(parse_count("sit-ups", "forty").is_err());
    }

    #[test]
    fn test_parse_run_time_formats() {
        assert_eq!(parse_run_time("18:43").unwrap(), 18 * 60 + 43);
        assert_eq!(parse_run_time("18m43s").unwrap(), 18 * 60 + 43);
        assert_eq!(parse_run_time("18m 0s").unwrap(), 18 * 60);
        assert_eq!(parse_run_time("600").unwrap(), 600);
    }

    #[test]
    fn test_parse_run_time_rejects_garbage() {
        assert!(parse_run_time("-1:00").is_err());
        assert!(parse_run_time("fast").is_err());
        assert!(parse_run_time("").is_err());
    }

    #[test]
    fn test_event_direction() {
        assert!(Event::PushUps.higher_is_better());
        assert!(Event::SitUps.higher_is_better());
        assert!(!Event::Run.higher_is_better());
    }
}
