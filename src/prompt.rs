use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::scoring::ScoringError;

/// Write a message and return the trimmed line read back.
///
/// End of input is an `InvalidInput` error so callers can exit as for bad input.
fn prompt_from(input: &mut impl BufRead, output: &mut impl Write, message: &str) -> Result<String> {
    write!(output, "{}", message).context("Failed to write prompt")?;
    output.flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        return Err(ScoringError::invalid("input", "no input provided").into());
    }
    Ok(line.trim().to_string())
}

fn ask_until<T>(
    input: &mut impl BufRead,
    output: &mut impl Write,
    message: &str,
    parse: impl Fn(&str) -> Result<T, ScoringError>,
) -> Result<T> {
    loop {
        let answer = prompt_from(input, output, message)?;
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(e) => writeln!(output, "  Invalid: {}. Try again.", e)
                .context("Failed to write prompt")?,
        }
    }
}

/// Keep asking on stdin until `parse` accepts the answer.
pub fn prompt_until<T>(
    message: &str,
    parse: impl Fn(&str) -> Result<T, ScoringError>,
) -> Result<T> {
    ask_until(
        &mut std::io::stdin().lock(),
        &mut std::io::stdout(),
        message,
        parse,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::parse_count;
    use std::io::Cursor;

    #[test]
    fn test_asks_again_after_invalid_answer() {
        let mut input = Cursor::new("abc\n 42 \n");
        let mut output = Vec::new();
        let value =
            ask_until(&mut input, &mut output, "Reps: ", |s| parse_count("reps", s)).unwrap();
        assert_eq!(value, 42);

        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches("Reps: ").count(), 2);
        assert!(shown.contains("Invalid: invalid reps"));
    }

    #[test]
    fn test_end_of_input_is_invalid_input() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        let err = ask_until(&mut input, &mut output, "Reps: ", |s| parse_count("reps", s))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScoringError>(),
            Some(ScoringError::InvalidInput { field: "input", .. })
        ));
    }
}
