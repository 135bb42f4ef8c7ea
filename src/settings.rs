use anyhow::Result;
use serde::Serialize;

use crate::scoring::{parse_count, Gender, ScoringError};
use crate::store::KeyValueStore;

pub const AGE_KEY: &str = "@paf_pft_age";
pub const GENDER_KEY: &str = "@paf_pft_gender";

/// User profile used to pick reference bands.
///
/// Both values are kept as the strings the user entered; `resolve` turns
/// them into typed values when scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub age: String,
    pub gender: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            age: String::new(),
            gender: Gender::Male.as_str().to_string(),
        }
    }
}

impl Settings {
    pub fn resolve(&self) -> Result<(u32, Gender), ScoringError> {
        if self.age.trim().is_empty() {
            return Err(ScoringError::invalid(
                "age",
                "not set; run `pft-calc settings --age <AGE>` or pass --age",
            ));
        }
        let age = parse_count("age", &self.age)?;
        if age == 0 {
            return Err(ScoringError::invalid("age", "must be a positive number"));
        }
        Ok((age, self.gender.parse()?))
    }
}

/// Load settings, falling back to defaults for entries never saved
pub fn load_settings(store: &impl KeyValueStore) -> Result<Settings> {
    let defaults = Settings::default();
    Ok(Settings {
        age: store.get(AGE_KEY)?.unwrap_or(defaults.age),
        gender: store.get(GENDER_KEY)?.unwrap_or(defaults.gender),
    })
}

/// Save settings as two separate entries
pub fn save_settings(store: &mut impl KeyValueStore, settings: &Settings) -> Result<()> {
    store.set(AGE_KEY, &settings.age)?;
    store.set(GENDER_KEY, &settings.gender)?;
    tracing::info!(age = %settings.age, gender = %settings.gender, "settings saved");
    Ok(())
}
