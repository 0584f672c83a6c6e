//! Command-line maintenance tools

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::core::SessionStore;

fn prompt(label: &str, input: &mut impl BufRead) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompt for a username and a confirmed new password
fn read_credentials() -> Result<Option<(String, String)>> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let username = prompt("Username", &mut input)?;
    if username.is_empty() {
        println!("Error: Username cannot be empty");
        return Ok(None);
    }

    let password = prompt("New password", &mut input)?;
    if password.is_empty() {
        println!("Error: Password cannot be empty");
        return Ok(None);
    }

    let confirm = prompt("Confirm password", &mut input)?;
    if password != confirm {
        println!("Error: Passwords do not match");
        return Ok(None);
    }

    Ok(Some((username, password)))
}

/// Interactively reset a user's password; every open session of that user is revoked
pub async fn password_reset(sessions: &SessionStore) -> Result<()> {
    println!("=== muzee Password Reset ===\n");

    let Some((username, password)) = read_credentials()? else {
        return Ok(());
    };

    sessions
        .reset_password(&username, &password)
        .await
        .with_context(|| format!("Failed to reset password for {}", username))?;

    println!("\nPassword for '{}' has been reset.", username);
    Ok(())
}
