use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::bands::AgeBand;
use super::error::ScoringError;
use super::input::{Event, Gender};

/// Passing and perfect performance for one band.
///
/// For strength events `min < max` (reps). For the run `min > max`, both in
/// seconds: `min` is the slowest passing time and `max` the time that earns
/// a perfect score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Range {
    pub min: u32,
    pub max: u32,
}

/// One reference entry: either a range scored by interpolation, or a sparse
/// raw value -> score table scored by exact lookup.
///
/// Example YAML:
/// ```yaml
/// "21": { min: 36, max: 80 }        # interpolation
/// "22-26": { 30: 60, 40: 80, 50: 100 }  # lookup
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Standard {
    Range(Range),
    Points(BTreeMap<u32, f64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    Interpolation,
    Lookup,
}

impl Standard {
    pub fn mode(&self) -> ScoringMode {
        match self {
            Standard::Range(_) => ScoringMode::Interpolation,
            Standard::Points(_) => ScoringMode::Lookup,
        }
    }
}

pub type BandTable = BTreeMap<AgeBand, Standard>;

/// Per-gender partition of one event's table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GenderTable {
    #[serde(default)]
    pub male: BandTable,
    #[serde(default)]
    pub female: BandTable,
}

impl GenderTable {
    pub fn for_gender(&self, gender: Gender) -> &BandTable {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }
}

/// Event -> gender -> age band -> scoring standard.
///
/// Immutable once built; pass it to the scorer by reference.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceTable {
    #[serde(default)]
    pub push_ups: GenderTable,
    #[serde(default)]
    pub sit_ups: GenderTable,
    #[serde(default)]
    pub run: GenderTable,
}

impl ReferenceTable {
    pub fn event(&self, event: Event) -> &GenderTable {
        match event {
            Event::PushUps => &self.push_ups,
            Event::SitUps => &self.sit_ups,
            Event::Run => &self.run,
        }
    }

    /// Look up the standard for an event, gender and band.
    pub fn entry(
        &self,
        event: Event,
        gender: Gender,
        band: AgeBand,
    ) -> Result<&Standard, ScoringError> {
        self.event(event)
            .for_gender(gender)
            .get(&band)
            .ok_or(ScoringError::Lookup {
                event,
                gender,
                band,
            })
    }
}

const fn mmss(minutes: u32, seconds: u32) -> u32 {
    minutes * 60 + seconds
}

fn ranges(rows: [(AgeBand, u32, u32); 4]) -> BandTable {
    rows.into_iter()
        .map(|(band, min, max)| (band, Standard::Range(Range { min, max })))
        .collect()
}

fn strength_table() -> GenderTable {
    GenderTable {
        male: ranges([
            (AgeBand::UpTo21, 36, 80),
            (AgeBand::From22To26, 35, 79),
            (AgeBand::From27To31, 38, 77),
            (AgeBand::From32To36, 29, 74),
        ]),
        female: ranges([
            (AgeBand::UpTo21, 18, 64),
            (AgeBand::From22To26, 16, 62),
            (AgeBand::From27To31, 14, 59),
            (AgeBand::From32To36, 12, 55),
        ]),
    }
}

fn run_table() -> GenderTable {
    GenderTable {
        male: ranges([
            (AgeBand::UpTo21, mmss(18, 43), mmss(9, 23)),
            (AgeBand::From22To26, mmss(20, 3), mmss(10, 43)),
            (AgeBand::From27To31, mmss(22, 3), mmss(12, 23)),
            (AgeBand::From32To36, mmss(24, 19), mmss(14, 59)),
        ]),
        female: ranges([
            (AgeBand::UpTo21, mmss(20, 19), mmss(10, 59)),
            (AgeBand::From22To26, mmss(21, 39), mmss(12, 19)),
            (AgeBand::From27To31, mmss(22, 59), mmss(13, 39)),
            (AgeBand::From32To36, mmss(24, 19), mmss(14, 59)),
        ]),
    }
}

/// The built-in table: push-ups and sit-ups share ranges, the 3.2 km run is
/// in seconds.
impl Default for ReferenceTable {
    fn default() -> Self {
        Self {
            push_ups: strength_table(),
            sit_ups: strength_table(),
            run: run_table(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_complete() {
        let table = ReferenceTable::default();
        for event in Event::ALL {
            for gender in [Gender::Male, Gender::Female] {
                for band in AgeBand::ALL {
                    let entry = table.entry(event, gender, band).unwrap();
                    assert_eq!(entry.mode(), ScoringMode::Interpolation);
                }
            }
        }
    }

    #[test]
    fn test_default_run_entry_in_seconds() {
        let table = ReferenceTable::default();
        let entry = table.entry(Event::Run, Gender::Male, AgeBand::UpTo21).unwrap();
        assert_eq!(entry, &Standard::Range(Range { min: 1123, max: 563 }));
    }

    #[test]
    fn test_missing_entry_is_lookup_error() {
        let mut table = ReferenceTable::default();
        table.sit_ups.female.remove(&AgeBand::From32To36);
        let err = table
            .entry(Event::SitUps, Gender::Female, AgeBand::From32To36)
            .unwrap_err();
        assert_eq!(
            err,
            ScoringError::Lookup {
                event: Event::SitUps,
                gender: Gender::Female,
                band: AgeBand::From32To36,
            }
        );
    }

    #[test]
    fn test_table_serde_roundtrip() {
        let table = ReferenceTable::default();
        let yaml = serde_saphyr::to_string(&table).unwrap();
        let parsed: ReferenceTable = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(table, parsed);
    }

    #[test]
    fn test_parse_mixed_standards() {
        let yaml = r#"
push_ups:
  male:
    "21": { min: 36, max: 80 }
    "22-26":
      30: 70
      40: 85
      50: 100
"#;
        let table: ReferenceTable = serde_saphyr::from_str(yaml).unwrap();
        let male = table.event(Event::PushUps).for_gender(Gender::Male);
        assert_eq!(male[&AgeBand::UpTo21].mode(), ScoringMode::Interpolation);
        assert_eq!(male[&AgeBand::From22To26].mode(), ScoringMode::Lookup);
        assert!(table.sit_ups.male.is_empty());
    }

    #[test]
    fn test_unknown_band_key_rejected() {
        let yaml = r#"
run:
  male:
    "40-44": { min: 1500, max: 900 }
"#;
        assert!(serde_saphyr::from_str::<ReferenceTable>(yaml).is_err());
    }
}
