use thiserror::Error;

use super::bands::AgeBand;
use super::input::{Event, Gender};

/// Errors raised by the scoring engine.
///
/// All of them are deterministic consequences of the input and the reference
/// table; callers are expected to report them and ask for corrected input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// A raw value was negative, non-numeric or otherwise unusable
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// The reference table has no usable entry for this event, gender and band
    #[error("no reference entry for {event} / {gender} / age band {band}")]
    Lookup {
        event: Event,
        gender: Gender,
        band: AgeBand,
    },

    /// An interpolation range whose min and max are equal
    #[error("degenerate reference range: min and max are both {value}")]
    DegenerateRange { value: u32 },
}

impl ScoringError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ScoringError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_names_event_gender_and_band() {
        let err = ScoringError::Lookup {
            event: Event::Run,
            gender: Gender::Female,
            band: AgeBand::From27To31,
        };
        let msg = err.to_string();
        assert!(msg.contains("run"));
        assert!(msg.contains("female"));
        assert!(msg.contains("27-31"));
    }

    #[test]
    fn test_invalid_input_message() {
        let err = ScoringError::invalid("push-ups", "must be non-negative, got -3");
        assert_eq!(err.to_string(), "invalid push-ups: must be non-negative, got -3");
    }
}
