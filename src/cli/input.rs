//! User input utilities for interactive CLI prompts

use crate::{Error, Result};
use std::io::{self, Write};
use std::path::Path;

/// Ask the user to confirm overwriting an existing report file
///
/// Anything other than an explicit yes declines, matching the cautious
/// default expected for destructive actions.
pub fn confirm_overwrite(path: &Path) -> Result<bool> {
    print!("Overwrite existing file? {} [y/N]: ", path.display());
    io::stdout()
        .flush()
        .map_err(|e| Error::io("Failed to flush stdout".to_string(), e))?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| Error::io("Failed to read user input".to_string(), e))?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input == "y" || input == "yes")
}
