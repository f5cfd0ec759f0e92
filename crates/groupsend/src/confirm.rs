//! Interactive send confirmation.

use groupsend_core::ConfirmGate;
use std::io::{self, BufRead, Write};

/// Gate that prompts on stdout and reads the answer from stdin.
///
/// Accepts `y`/`yes` (case-insensitive); anything else declines, which
/// aborts the run.
#[derive(Debug, Default)]
pub struct StdinGate;

impl StdinGate {
    fn prompt<R: BufRead, W: Write>(
        group: &str,
        n_files: usize,
        input: &mut R,
        output: &mut W,
    ) -> bool {
        let _ = write!(output, "Send {n_files} file(s) to group \"{group}\"? [y/N] ");
        let _ = output.flush();

        let mut answer = String::new();
        if input.read_line(&mut answer).is_err() {
            return false;
        }

        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

impl ConfirmGate for StdinGate {
    fn confirm(&mut self, group: &str, n_files: usize) -> bool {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        Self::prompt(group, n_files, &mut stdin.lock(), &mut stdout)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn answer(input: &str) -> bool {
        let mut output = Vec::new();
        StdinGate::prompt("Team Alpha", 2, &mut input.as_bytes(), &mut output)
    }

    #[test]
    fn test_yes_variants_accept() {
        assert!(answer("y\n"));
        assert!(answer("Y\n"));
        assert!(answer("yes\n"));
        assert!(answer("YES\n"));
    }

    #[test]
    fn test_anything_else_declines() {
        assert!(!answer("n\n"));
        assert!(!answer("no\n"));
        assert!(!answer("\n"));
        assert!(!answer(""));
        assert!(!answer("sure\n"));
    }

    #[test]
    fn test_prompt_text() {
        let mut output = Vec::new();
        let mut input = "y\n".as_bytes();
        StdinGate::prompt("Team Alpha", 2, &mut input, &mut output);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Send 2 file(s) to group \"Team Alpha\"?"));
    }
}
