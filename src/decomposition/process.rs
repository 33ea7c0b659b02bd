use std::io::Read;
use std::io::Write;
use std::process::Child;
use std::process::Command;
use std::process::Stdio;
use std::sync::mpsc;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::Duration;

use log::debug;
use log::warn;

use crate::error::PtolemyError;
use crate::error::Result;

/// Runs the external decomposition program, feeding it the input on
/// stdin and collecting stdout. Every request gets a fresh process, so
/// a process killed after a timeout never affects the next request.
#[derive(Clone, Debug)]
pub struct ExternalDecomposer {
    command: String,
    arguments: Vec<String>,
    timeout: Duration,
}

impl ExternalDecomposer {
    pub fn new(command: impl Into<String>, arguments: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            arguments,
            timeout,
        }
    }

    fn spawn(&self) -> Result<Child> {
        Command::new(&self.command)
            .args(&self.arguments)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                PtolemyError::ExternalProcess(format!("failed to start {}: {}", self.command, e))
            })
    }

    pub fn run(&self, input: &str) -> Result<String> {
        debug!("Starting {} {:?}", self.command, self.arguments);
        let mut child = self.spawn()?;
        let missing_pipe = || PtolemyError::ExternalProcess("missing pipe to child process".into());
        let mut stdin = child.stdin.take().ok_or_else(missing_pipe)?;
        let mut stdout = child.stdout.take().ok_or_else(missing_pipe)?;
        let input = input.to_owned();
        thread::spawn(move || {
            // The process may exit without reading all of its input.
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                debug!("Writing to external process failed: {}", e);
            }
        });
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let mut output = String::new();
            let result = stdout.read_to_string(&mut output).map(|_| output);
            let _ = sender.send(result);
        });
        match receiver.recv_timeout(self.timeout) {
            Ok(Ok(output)) => {
                let status = child.wait().map_err(|e| {
                    PtolemyError::ExternalProcess(format!("failed to wait for {}: {}", self.command, e))
                })?;
                if !status.success() {
                    warn!("{} exited with {}", self.command, status);
                }
                Ok(output)
            }
            Ok(Err(e)) => {
                self.terminate(&mut child);
                Err(PtolemyError::ExternalProcess(format!(
                    "failed to read output of {}: {}",
                    self.command, e
                )))
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("{} timed out after {:?}, killing it", self.command, self.timeout);
                self.terminate(&mut child);
                Err(PtolemyError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.terminate(&mut child);
                Err(PtolemyError::ExternalProcess(
                    "output reader stopped unexpectedly".into(),
                ))
            }
        }
    }

    fn terminate(&self, child: &mut Child) {
        if let Err(e) = child.kill() {
            debug!("Failed to kill {}: {}", self.command, e);
        }
        if let Err(e) = child.wait() {
            debug!("Failed to reap {}: {}", self.command, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ExternalDecomposer;
    use crate::error::PtolemyError;

    fn shell(script: &str, timeout: Duration) -> ExternalDecomposer {
        ExternalDecomposer::new("sh", vec!["-c".into(), script.into()], timeout)
    }

    #[test]
    fn output_is_collected() {
        let decomposer = shell("tr a-z A-Z", Duration::from_secs(10));
        assert_eq!(decomposer.run("ideal\n").unwrap(), "IDEAL\n");
    }

    #[test]
    fn slow_requests_time_out_and_the_next_one_runs() {
        let decomposer = shell(
            "read line; if [ \"$line\" = slow ]; then exec sleep 10; fi; echo \"$line\"",
            Duration::from_millis(300),
        );
        assert!(matches!(decomposer.run("slow\n"), Err(PtolemyError::Timeout(_))));
        assert_eq!(decomposer.run("fast\n").unwrap(), "fast\n");
    }

    #[test]
    fn failing_program_still_returns_output() {
        let decomposer = shell("echo partial; exit 3", Duration::from_secs(10));
        assert_eq!(decomposer.run("").unwrap(), "partial\n");
    }

    #[test]
    fn missing_program() {
        let decomposer = ExternalDecomposer::new(
            "/nonexistent/decomposition-program",
            vec![],
            Duration::from_secs(1),
        );
        assert!(matches!(decomposer.run(""), Err(PtolemyError::ExternalProcess(_))));
    }
}
