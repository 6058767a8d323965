use std::process::Command;

use tracing::{debug, warn};

use crate::session::Explainer;

/// Runs a user-supplied program as `<program> <question> <options>` and
/// uses its stdout as the explanation.
#[derive(Debug, Clone)]
pub struct CommandExplainer {
    program: String,
}

impl CommandExplainer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Explainer for CommandExplainer {
    fn explain(&self, question: &str, options: &str) -> Result<String, String> {
        debug!(program = %self.program, "requesting explanation");
        let output = Command::new(&self.program)
            .arg(question)
            .arg(options)
            .output()
            .map_err(|e| format!("failed to run {}: {}", self.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(program = %self.program, status = %output.status, "explainer exited with failure");
            return Err(if stderr.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                stderr
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(format!("{} printed no explanation", self.program));
        }
        Ok(text)
    }
}
