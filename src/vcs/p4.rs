use std::path::PathBuf;

use anyhow::{Result, bail};
use async_trait::async_trait;

use super::process::{CommandOutput, run};
use super::{Depot, EditOutcome, OpOutcome};

/// [`Depot`] backed by the `p4` command line.
#[derive(Clone, Debug)]
pub struct P4Cli {
    program: String,
    workspace: PathBuf,
}

impl P4Cli {
    pub fn new(program: impl Into<String>, workspace: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workspace: workspace.into(),
        }
    }

    async fn file_command(&self, command: &str, path: &str) -> Result<CommandOutput> {
        if path.trim().is_empty() {
            bail!("refusing to run '{} {command}' without a file", self.program);
        }
        run(&self.program, &[command, path], &self.workspace).await
    }
}

#[async_trait]
impl Depot for P4Cli {
    async fn edit(&self, path: &str) -> Result<EditOutcome> {
        let output = self.file_command("edit", path).await?;
        Ok(parse_edit_message(output.first_line()))
    }

    async fn add(&self, path: &str) -> Result<OpOutcome> {
        let output = self.file_command("add", path).await?;
        Ok(parse_add_message(output.first_line()))
    }

    async fn delete(&self, path: &str) -> Result<OpOutcome> {
        let output = self.file_command("delete", path).await?;
        Ok(parse_delete_message(output.first_line()))
    }

    async fn revert_unchanged(&self) -> Result<()> {
        let output = run(&self.program, &["revert", "-a"], &self.workspace).await?;
        if !output.success {
            bail!("reverting unchanged files failed: {}", output.first_line());
        }
        Ok(())
    }
}

pub fn parse_edit_message(line: &str) -> EditOutcome {
    if line.contains("opened for edit") || line.contains("can't edit (already opened for add)") {
        EditOutcome::Done
    } else if line.contains("file(s) not on client") {
        EditOutcome::NeedsAdd
    } else {
        EditOutcome::Unknown
    }
}

pub fn parse_add_message(line: &str) -> OpOutcome {
    if line.contains("opened for add") {
        OpOutcome::Done
    } else {
        OpOutcome::Unknown
    }
}

pub fn parse_delete_message(line: &str) -> OpOutcome {
    if line.contains("opened for delete") || line.contains("file(s) not on client") {
        OpOutcome::Done
    } else {
        OpOutcome::Unknown
    }
}
