//! Line-oriented operator input.

use crate::error::PromptError;
use std::io::{BufRead, Write};

/// Print `prompt` and read one line, without its trailing newline.
///
/// End-of-file is reported as `PromptError::Closed`.
pub fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<String, PromptError> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(PromptError::Closed);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Parse a 1-based menu selection into a 0-based index.
pub fn parse_choice(raw: &str, count: usize) -> Option<usize> {
    let n = raw.trim().parse::<usize>().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}
