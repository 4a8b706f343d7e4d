// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CUPS spooler backend.
//
// Talks to the local CUPS scheduler through its command-line tools:
//
//   lpstat -r                      scheduler reachable?
//   lpstat -l -p                   printers and their state
//   lpstat -d                      system default destination
//   lp -d NAME -o raw -t TITLE     submit stdin as a raw job
//
// The tools run with LC_ALL=C so their output can be parsed.

use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use tillprint_core::config::SpoolerConfig;
use tillprint_core::error::{Result, TillprintError};
use tillprint_core::types::{JobHandle, PrinterInfo, PrinterStatus};

use crate::spooler::Spooler;

/// How long `lp` may take to accept a job.
const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// How long an `lpstat` query may take.
const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Spooler backed by the host's CUPS installation.
#[derive(Debug, Clone)]
pub struct CupsSpooler {
    lp: String,
    lpstat: String,
}

impl CupsSpooler {
    pub fn new(lp: impl Into<String>, lpstat: impl Into<String>) -> Self {
        Self {
            lp: lp.into(),
            lpstat: lpstat.into(),
        }
    }

    pub fn from_config(config: &SpoolerConfig) -> Self {
        Self::new(config.lp_command.clone(), config.lpstat_command.clone())
    }

    async fn lpstat(&self, args: &[&str]) -> std::io::Result<Output> {
        let child = Command::new(&self.lpstat)
            .args(args)
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        match tokio::time::timeout(QUERY_TIMEOUT, child.wait_with_output()).await {
            Ok(output) => output,
            Err(_) => Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("{} {} timed out", self.lpstat, args.join(" ")),
            )),
        }
    }

    async fn lp(&self, data: &[u8], printer: &str, title: &str) -> std::io::Result<Output> {
        let mut child = Command::new(&self.lp)
            .args(["-d", printer, "-o", "raw", "-t", title])
            .env("LC_ALL", "C")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let run = async move {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(data).await?;
                stdin.shutdown().await?;
            }
            child.wait_with_output().await
        };

        match tokio::time::timeout(SUBMIT_TIMEOUT, run).await {
            Ok(output) => output,
            Err(_) => Err(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("lp timed out after {}s", SUBMIT_TIMEOUT.as_secs()),
            )),
        }
    }
}

#[async_trait]
impl Spooler for CupsSpooler {
    fn backend(&self) -> &'static str {
        "cups"
    }

    #[instrument(skip(self), fields(lpstat = %self.lpstat))]
    async fn initialize(&self) -> Result<()> {
        let output = self.lpstat(&["-r"]).await.map_err(|e| {
            TillprintError::SpoolerUnavailable(format!("cannot run {}: {e}", self.lpstat))
        })?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if output.status.success() && scheduler_running(&stdout) {
            debug!("CUPS scheduler is running");
            Ok(())
        } else {
            Err(TillprintError::SpoolerUnavailable(
                first_line(&stdout, &output.stderr)
                    .unwrap_or_else(|| "scheduler is not running".into()),
            ))
        }
    }

    #[instrument(skip(self))]
    async fn list_printers(&self) -> Result<Vec<PrinterInfo>> {
        let output = self
            .lpstat(&["-l", "-p"])
            .await
            .map_err(|e| TillprintError::Spooler(format!("cannot run {}: {e}", self.lpstat)))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            if stderr.contains("No destinations added") {
                return Ok(Vec::new());
            }
            return Err(TillprintError::Spooler(
                first_line(&stdout, &output.stderr)
                    .unwrap_or_else(|| format!("lpstat exited with {}", output.status)),
            ));
        }

        let mut printers = parse_printers(&stdout);

        // The default is optional; failing to read it is not fatal.
        match self.lpstat(&["-d"]).await {
            Ok(out) => {
                if let Some(default) = parse_default(&String::from_utf8_lossy(&out.stdout)) {
                    for p in printers.iter_mut() {
                        p.is_default = p.name == default;
                    }
                }
            }
            Err(e) => warn!(error = %e, "could not read default destination"),
        }

        debug!(count = printers.len(), "listed CUPS printers");
        Ok(printers)
    }

    #[instrument(skip(self, data), fields(printer = %printer, bytes = data.len()))]
    async fn submit(&self, data: &[u8], printer: &str, title: &str) -> Result<JobHandle> {
        let output = self
            .lp(data, printer, title)
            .await
            .map_err(|e| TillprintError::PrintFailed {
                printer: printer.to_string(),
                reason: e.to_string(),
            })?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            return Err(TillprintError::PrintFailed {
                printer: printer.to_string(),
                reason: first_line(&stdout, &output.stderr)
                    .unwrap_or_else(|| format!("lp exited with {}", output.status)),
            });
        }

        let handle = parse_request_id(&stdout).unwrap_or_else(|| {
            warn!(stdout = %stdout.trim(), "lp gave no request id");
            format!("{printer}-unknown")
        });
        debug!(handle = %handle, "job accepted by CUPS");
        Ok(JobHandle(handle))
    }
}

// ---------------------------------------------------------------------------
// Output parsing
// ---------------------------------------------------------------------------

fn scheduler_running(stdout: &str) -> bool {
    stdout
        .lines()
        .any(|l| l.contains("scheduler is running") && !l.contains("not running"))
}

/// First non-empty line of stderr, falling back to stdout.
fn first_line(stdout: &str, stderr: &[u8]) -> Option<String> {
    let stderr = String::from_utf8_lossy(stderr);
    stderr
        .lines()
        .chain(stdout.lines())
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// Parse `lpstat -l -p` output.
///
/// Each printer starts with an unindented `printer NAME ...` line; indented
/// lines after it are details.
pub(crate) fn parse_printers(stdout: &str) -> Vec<PrinterInfo> {
    let mut printers: Vec<PrinterInfo> = Vec::new();

    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("printer ") {
            let mut parts = rest.splitn(2, ' ');
            let Some(name) = parts.next().filter(|n| !n.is_empty()) else {
                continue;
            };
            let state = parts.next().unwrap_or_default();
            let status = if state.contains("disabled") {
                PrinterStatus::Offline
            } else {
                PrinterStatus::Online
            };
            printers.push(PrinterInfo::new(name, status));
            continue;
        }

        let Some(current) = printers.last_mut() else {
            continue;
        };
        let detail = line.trim();
        if let Some(value) = detail.strip_prefix("Description:") {
            current.description = non_empty(value);
        } else if let Some(value) = detail.strip_prefix("Location:") {
            current.location = non_empty(value);
        } else if let Some(value) = detail.strip_prefix("Make and Model:") {
            current.model = non_empty(value);
        } else if let Some(alerts) = detail.strip_prefix("Alerts:") {
            let alerts = alerts.to_ascii_lowercase();
            if current.status == PrinterStatus::Online {
                if alerts.contains("offline") {
                    current.status = PrinterStatus::Offline;
                } else if alerts.contains("-error") {
                    current.status = PrinterStatus::Error;
                }
            }
        }
    }

    printers
}

/// Parse `lpstat -d` output.
pub(crate) fn parse_default(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|l| {
        l.trim()
            .strip_prefix("system default destination:")
            .and_then(non_empty)
    })
}

/// Parse `request id is Rongta-42 (1 file(s))`.
pub(crate) fn parse_request_id(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|l| {
        l.trim()
            .strip_prefix("request id is ")
            .and_then(|rest| rest.split_whitespace().next())
            .map(str::to_string)
    })
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LPSTAT_LP: &str = "\
printer Rongta is idle.  enabled since Sat 14 Mar 2026 09:00:01 AM UTC
\tForm mounted:
\tContent types: any
\tDescription: Rongta RP80 USB
\tAlerts: none
\tLocation: Front counter
\tConnection: direct
printer Kitchen disabled since Sat 14 Mar 2026 08:12:44 AM UTC -
\treason unknown
\tDescription: Kitchen ticket printer
\tAlerts: none
printer Bar now printing Bar-17.  enabled since Sat 14 Mar 2026 09:10:00 AM UTC
\tAlerts: offline-report
printer Office is idle.  enabled since Sat 14 Mar 2026 09:00:01 AM UTC
\tAlerts: media-empty-error
";

    #[test]
    fn parses_printer_list() {
        let printers = parse_printers(LPSTAT_LP);
        let names: Vec<&str> = printers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Rongta", "Kitchen", "Bar", "Office"]);

        assert_eq!(printers[0].status, PrinterStatus::Online);
        assert_eq!(printers[0].description.as_deref(), Some("Rongta RP80 USB"));
        assert_eq!(printers[0].location.as_deref(), Some("Front counter"));

        assert_eq!(printers[1].status, PrinterStatus::Offline);
        assert_eq!(printers[2].status, PrinterStatus::Offline);
        assert_eq!(printers[3].status, PrinterStatus::Error);
    }

    #[test]
    fn empty_output_means_no_printers() {
        assert!(parse_printers("").is_empty());
    }

    #[test]
    fn parses_default_destination() {
        assert_eq!(
            parse_default("system default destination: Rongta\n"),
            Some("Rongta".into())
        );
        assert_eq!(parse_default("no system default destination\n"), None);
    }

    #[test]
    fn parses_request_id() {
        assert_eq!(
            parse_request_id("request id is Rongta-42 (1 file(s))\n"),
            Some("Rongta-42".into())
        );
        assert_eq!(parse_request_id(""), None);
    }

    #[test]
    fn detects_running_scheduler() {
        assert!(scheduler_running("scheduler is running\n"));
        assert!(!scheduler_running("scheduler is not running\n"));
    }

    #[test]
    fn first_line_prefers_stderr() {
        assert_eq!(
            first_line("out\n", b"\nlp: The printer or class does not exist.\n"),
            Some("lp: The printer or class does not exist.".into())
        );
        assert_eq!(first_line("  out \n", b""), Some("out".into()));
        assert_eq!(first_line("", b""), None);
    }

    #[tokio::test]
    async fn missing_binary_is_spooler_unavailable() {
        let cups = CupsSpooler::new("/nonexistent/lp", "/nonexistent/lpstat");
        let err = cups.initialize().await.expect_err("should fail");
        assert!(matches!(err, TillprintError::SpoolerUnavailable(_)));
    }

    #[tokio::test]
    async fn missing_lp_is_print_failed() {
        let cups = CupsSpooler::new("/nonexistent/lp", "/nonexistent/lpstat");
        let err = cups.submit(b"x", "Rongta", "t").await.expect_err("should fail");
        assert!(matches!(err, TillprintError::PrintFailed { .. }));
    }
}
