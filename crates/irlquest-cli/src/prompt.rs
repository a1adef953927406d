//! Interactive prompts

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

/// Ask a yes/no question; anything but "y"/"yes" is no
///
/// Returns false without asking when stdin isn't a terminal.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

/// Read a password from stdin
///
/// Prompts only on a terminal so the password can also be piped in.
pub fn read_password(prompt: &str) -> Result<String> {
    if atty::is(atty::Stream::Stdin) {
        eprint!("{}: ", prompt);
        io::stderr().flush()?;
    }

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read password")?;

    let password = input.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("Password must not be empty");
    }
    Ok(password)
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("nope"));
    }
}
