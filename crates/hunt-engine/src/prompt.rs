//! Interactive prompts for the grid size and cohort size.
//!
//! Prompts are generic over [`BufRead`] and [`Write`] so the re-prompt
//! loop can be driven from byte buffers in tests.

use std::io::{BufRead, Write};

use crate::error::EngineError;

/// Prompt for the grid side length.
pub const GRID_SIZE_PROMPT: &str = "Please, input grid size (N): ";

/// Prompt for the number of initial agents.
pub const AGENT_COUNT_PROMPT: &str = "Enter number of initial adventurers (T): ";

/// Ask `question` until a positive whole number is entered.
///
/// A blank line accepts `default`. Anything else that does not parse as a
/// positive `u32` prints an `Invalid input: ...` line and asks again.
///
/// # Errors
///
/// Returns [`EngineError::Prompt`] if input ends before a value is given,
/// and [`EngineError::Io`] if reading or writing fails.
pub fn read_positive<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
    default: u32,
) -> Result<u32, EngineError> {
    let mut line = String::new();
    loop {
        write!(output, "{question}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(EngineError::Prompt {
                message: format!("input closed while waiting for an answer to {:?}", question.trim()),
            });
        }

        let answer = line.trim();
        if answer.is_empty() {
            return Ok(default);
        }
        match answer.parse::<u32>() {
            Ok(value) if value > 0 => return Ok(value),
            Ok(_) => writeln!(output, "Invalid input: value must be at least 1")?,
            Err(_) => writeln!(output, "Invalid input: {answer:?} is not a whole number")?,
        }
    }
}
