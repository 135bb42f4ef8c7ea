use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete age bucket used as a reference table key.
///
/// Serialized with the same keys the published scoring tables use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "21")]
    UpTo21,
    #[serde(rename = "22-26")]
    From22To26,
    #[serde(rename = "27-31")]
    From27To31,
    #[serde(rename = "32-36")]
    From32To36,
}

impl AgeBand {
    pub const ALL: [AgeBand; 4] = [
        AgeBand::UpTo21,
        AgeBand::From22To26,
        AgeBand::From27To31,
        AgeBand::From32To36,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            AgeBand::UpTo21 => "21",
            AgeBand::From22To26 => "22-26",
            AgeBand::From27To31 => "27-31",
            AgeBand::From32To36 => "32-36",
        }
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

// Each band covers [floor, next floor). Ascending.
const STRENGTH_BANDS: [(u32, AgeBand); 4] = [
    (21, AgeBand::UpTo21),
    (22, AgeBand::From22To26),
    (27, AgeBand::From27To31),
    (32, AgeBand::From32To36),
];

const RUN_BANDS: [(u32, AgeBand); 4] = [
    (21, AgeBand::UpTo21),
    (22, AgeBand::From22To26),
    (27, AgeBand::From27To31),
    (32, AgeBand::From32To36),
];

fn classify(age: u32, bands: &[(u32, AgeBand)]) -> AgeBand {
    bands
        .iter()
        .rev()
        .find(|(floor, _)| age >= *floor)
        .or_else(|| bands.first())
        .map(|(_, band)| *band)
        .unwrap_or(AgeBand::UpTo21)
}

/// Band for the push-up and sit-up tables.
///
/// Total over all ages: anything below the first floor lands in the lowest
/// band, anything past the last band stays in the highest.
pub fn classify_age_band(age: u32) -> AgeBand {
    classify(age, &STRENGTH_BANDS)
}

/// Band for the run table, which keeps its own boundaries.
pub fn classify_run_age_band(age: u32) -> AgeBand {
    classify(age, &RUN_BANDS)
}
