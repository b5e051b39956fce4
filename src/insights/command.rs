use crate::error::{RiskError, Result};
use crate::insights::prompt::InsightPrompt;
use crate::insights::InsightGenerator;
use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Pipes the prompt into an external text-generation command and reads the
/// narrative back from its stdout.
#[derive(Debug, Clone)]
pub struct CommandInsightGenerator {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandInsightGenerator {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    fn timed_out(&self) -> RiskError {
        RiskError::Insight(format!("{} timed out after {:?}", self.program, self.timeout))
    }
}

impl InsightGenerator for CommandInsightGenerator {
    fn generate(&self, prompt: &InsightPrompt) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("CREDIT_RISK_SYSTEM_PROMPT", &prompt.system)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| RiskError::Insight(format!("failed to start {}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A generator may exit without reading its input.
            if let Err(e) = stdin.write_all(prompt.combined().as_bytes()) {
                tracing::debug!(error = %e, "insight command closed stdin early");
            }
        }

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| RiskError::Insight("insight command stdout unavailable".to_string()))?;
        // Descendants of the command can hold stdout open past its exit, so the
        // read is bounded by the same deadline as the process itself.
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buffer = String::new();
            let _ = tx.send(stdout.read_to_string(&mut buffer).map(|_| buffer));
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(self.timed_out());
            }
            thread::sleep(POLL_INTERVAL);
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        let output = match rx.recv_timeout(remaining) {
            Ok(read) => read?,
            Err(RecvTimeoutError::Timeout) => return Err(self.timed_out()),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(RiskError::Insight(
                    "insight reader stopped without output".to_string(),
                ))
            }
        };

        if !status.success() {
            return Err(RiskError::Insight(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        let narrative = output.trim();
        if narrative.is_empty() {
            return Err(RiskError::Insight(format!(
                "{} returned no text",
                self.program
            )));
        }
        Ok(narrative.to_string())
    }
}
