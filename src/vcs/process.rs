use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

/// Exit status and output of a finished command. `text` is stdout followed
/// by stderr.
#[derive(Debug)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub text: String,
}

impl CommandOutput {
    pub fn first_line(&self) -> &str {
        self.text.lines().next().unwrap_or("").trim()
    }
}

pub async fn run(program: &str, args: &[&str], cwd: &Path) -> Result<CommandOutput> {
    debug!("Running {program} {}", args.join(" "));

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .with_context(|| format!("failed to run {program}"))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let mut text = stdout.clone();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(CommandOutput {
        success: output.status.success(),
        stdout,
        text,
    })
}
