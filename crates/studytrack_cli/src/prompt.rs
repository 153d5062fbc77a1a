//! Confirmation prompt for destructive commands.

use std::io::{self, BufRead, Write};

/// Asks `question` and returns whether the user answered yes.
///
/// Returns `true` without prompting when `assume_yes` is set. Anything other
/// than `y`/`yes` (case-insensitive), including end of input, declines.
pub fn confirm<I: BufRead, O: Write>(
    input: &mut I,
    out: &mut O,
    question: &str,
    assume_yes: bool,
) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    write!(out, "{question} [y/N] ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let accepted = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
    if !accepted {
        writeln!(out)?;
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::confirm;

    #[test]
    fn accepts_only_explicit_yes() {
        let mut out = Vec::new();
        assert!(confirm(&mut "Y\n".as_bytes(), &mut out, "Delete?", false).unwrap());
        assert!(confirm(&mut "yes".as_bytes(), &mut out, "Delete?", false).unwrap());
        assert!(!confirm(&mut "n\n".as_bytes(), &mut out, "Delete?", false).unwrap());
        assert!(!confirm(&mut "".as_bytes(), &mut out, "Delete?", false).unwrap());
        assert!(String::from_utf8(out).unwrap().contains("Delete? [y/N]"));
    }

    #[test]
    fn assume_yes_skips_reading() {
        let mut out = Vec::new();
        assert!(confirm(&mut "n\n".as_bytes(), &mut out, "Delete?", true).unwrap());
        assert!(out.is_empty());
    }
}
