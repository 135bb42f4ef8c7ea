use super::input::{Event, Gender};
use super::table::{Range, ReferenceTable, Standard};

/// Validate a reference table at startup.
/// Returns all validation errors at once (not just the first).
///
/// Missing bands are not reported here; they surface as lookup errors when a
/// score actually needs them.
pub fn validate_table(table: &ReferenceTable) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for event in Event::ALL {
        for gender in [Gender::Male, Gender::Female] {
            for (band, standard) in table.event(event).for_gender(gender) {
                let path = format!("{}.{}.{}", event.key(), gender, band);
                match standard {
                    Standard::Range(range) => check_range(&path, event, range, &mut errors),
                    Standard::Points(points) => {
                        if points.is_empty() {
                            errors.push(format!("{}: lookup table is empty", path));
                        }
                        for (value, score) in points {
                            if !(0.0..=100.0).contains(score) {
                                errors.push(format!(
                                    "{}[{}]: score {} is outside 0-100",
                                    path, value, score
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_range(path: &str, event: Event, range: &Range, errors: &mut Vec<String>) {
    if range.min == range.max {
        errors.push(format!(
            "{}: degenerate range, min and max are both {}",
            path, range.min
        ));
    } else if event.higher_is_better() && range.min > range.max {
        errors.push(format!(
            "{}: min ({}) must be below max ({})",
            path, range.min, range.max
        ));
    } else if !event.higher_is_better() && range.min < range.max {
        errors.push(format!(
            "{}: passing time min ({}s) must be slower than perfect time max ({}s)",
            path, range.min, range.max
        ));
    }
}
