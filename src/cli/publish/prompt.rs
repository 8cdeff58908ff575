use anyhow::Result;
use std::io::{BufRead, Write};

/// Print `prompt` and read one line of input, trimmed.
///
/// End of input reads as an empty answer.
pub(super) fn ask(input: &mut impl BufRead, output: &mut impl Write, prompt: &str) -> Result<String> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// `y` or `yes` in any letter case.
pub(super) fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_affirmative_answers() {
        for answer in ["y", "Y", "yes", "YES", "Yes", " y "] {
            assert!(is_affirmative(answer), "{answer:?} should confirm");
        }
    }

    #[test]
    fn test_other_answers_decline() {
        for answer in ["", "n", "N", "no", "yeah", "yep", "ye", "sure", "1"] {
            assert!(!is_affirmative(answer), "{answer:?} should decline");
        }
    }

    #[test]
    fn test_ask_trims_and_echoes_prompt() {
        let mut input = Cursor::new("  fix typo \n");
        let mut output = Vec::new();
        let line = ask(&mut input, &mut output, "Message: ").unwrap();
        assert_eq!(line, "fix typo");
        assert_eq!(output, b"Message: ");
    }

    #[test]
    fn test_ask_at_end_of_input() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        assert_eq!(ask(&mut input, &mut output, "? ").unwrap(), "");
    }
}
