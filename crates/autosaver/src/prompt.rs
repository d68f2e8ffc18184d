//! Console interaction.

use std::io::{self, BufRead, Write};

use autosaver_oauth::{AuthorizationPrompt, OAuthError};

/// Runs the browser step of OAuth authorization on the terminal.
///
/// Prints the authorization URL, tries to open it, and reads the URL the
/// provider redirected to from stdin.
pub struct ConsolePrompt;

impl AuthorizationPrompt for ConsolePrompt {
    fn authorize(&self, url: &str) -> autosaver_oauth::Result<String> {
        println!("Open this URL in your browser and log in:");
        println!();
        println!("  {}", url);
        println!();

        if open_url(url).is_err() {
            println!("(Could not open browser automatically)");
            println!();
        }

        println!("After approving, paste the full URL you were redirected to:");
        let line = read_line(&mut io::stdin().lock(), &mut io::stdout(), "> ")
            .map_err(|e| OAuthError::Prompt(e.to_string()))?;
        let line = line.trim();
        if line.is_empty() {
            return Err(OAuthError::Prompt("No redirect URL provided".to_string()));
        }
        Ok(line.to_string())
    }
}

/// Ask for confirmation. Only a `y` answer counts as yes.
pub fn confirm(input: &mut dyn BufRead, output: &mut dyn Write, question: &str) -> io::Result<bool> {
    let answer = read_line(input, output, question)?;
    Ok(answer.trim() == "y")
}

fn read_line(input: &mut dyn BufRead, output: &mut dyn Write, prompt: &str) -> io::Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line)
}

/// Try to open a URL in the default browser.
fn open_url(url: &str) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).status()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).status()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .status()?;
    }
    Ok(())
}
