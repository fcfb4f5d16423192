use super::errors::CleanMyMacError;

/// Captured output of a successful tool invocation
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// The single contract for invoking native tools (docker, brew, ...).
///
/// All scanners treat a failed invocation identically: `scan()` degrades
/// to an empty result, `clean()` reports a contained error. The trait seam
/// exists so tests can stand in for an absent daemon.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CleanMyMacError>;
}

/// Runs commands through the real system shell environment
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CleanMyMacError> {
        let rendered = format!("{} {}", program, args.join(" "));

        let output = std::process::Command::new(program)
            .args(args)
            .output()
            .map_err(|e| CleanMyMacError::command(&rendered, e.to_string()))?;

        if output.status.success() {
            Ok(CommandOutput {
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(CleanMyMacError::command(&rendered, stderr.trim().to_string()))
        }
    }
}
