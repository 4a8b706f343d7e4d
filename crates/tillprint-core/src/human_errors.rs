// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for till staff.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The HTTP layer returns both alongside the machine-readable kind, so the POS
// front-end can show them without its own lookup table.

use crate::error::TillprintError;

/// Severity of an error from the cashier's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Printer blip or spooler hiccup; trying again may work.
    Transient,
    /// Someone has to do something (turn on the printer, fix the receipt).
    ActionRequired,
    /// Retrying will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the cashier should try.
    pub suggestion: String,
    /// Whether sending the same request again could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `TillprintError` into something a cashier can act on.
pub fn humanize_error(err: &TillprintError) -> HumanError {
    match err {
        TillprintError::Validation(detail) => HumanError {
            message: "The receipt data is incomplete or malformed.".into(),
            suggestion: format!("Check the receipt fields and send it again. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        TillprintError::NoPrintersAvailable => HumanError {
            message: "No printers are set up on this computer.".into(),
            suggestion: "Connect the receipt printer and add it in the printer settings, then try again.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        TillprintError::PrinterNotFound(name) => HumanError {
            message: format!("The printer \"{name}\" isn't known to this computer."),
            suggestion: "Check the printer name in the till settings matches the printer list exactly.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        TillprintError::QueueFull { capacity } => HumanError {
            message: "Too many receipts are waiting for the printer.".into(),
            suggestion: format!(
                "{capacity} receipts are already waiting. Turn the printer on or check its cable so they can print, then try again."
            ),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        TillprintError::PrintFailed { reason, .. } => humanize_print_failure(reason),

        TillprintError::SpoolerUnavailable(_) => HumanError {
            message: "The printing system on this computer isn't running.".into(),
            suggestion: "Start the printing service (CUPS), then restart Tillprint.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        TillprintError::Spooler(_) => HumanError {
            message: "We couldn't ask the printing system which printers exist.".into(),
            suggestion: "Try again in a moment. If this keeps happening, restart the printing service.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        TillprintError::Config(detail) => HumanError {
            message: "Tillprint's settings are invalid.".into(),
            suggestion: format!("Fix the configuration and restart. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        TillprintError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file or program Tillprint needs couldn't be found.".into(),
                    suggestion: "Check that the printing tools are installed.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing data.".into(),
                    suggestion: "Try again. If this keeps happening, restart Tillprint.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        TillprintError::Serialization(_) => HumanError {
            message: "Tillprint had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}

/// Parse spooler failure text into something specific where we can.
fn humanize_print_failure(reason: &str) -> HumanError {
    let lower = reason.to_ascii_lowercase();

    if lower.contains("not accepting") || lower.contains("disabled") {
        HumanError {
            message: "The printer is paused in the printing system.".into(),
            suggestion: "Resume the printer in the printer settings, then try again.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("unknown destination") || lower.contains("does not exist") {
        HumanError {
            message: "The printer disappeared from the printing system.".into(),
            suggestion: "Check the printer is still installed, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        }
    } else if lower.contains("timed out") || lower.contains("busy") {
        HumanError {
            message: "The printer didn't respond in time.".into(),
            suggestion: "Wait a moment and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        }
    } else {
        HumanError {
            message: "The receipt couldn't be sent to the printer.".into(),
            suggestion: format!(
                "Try again. If this keeps happening, turn the printer off and on again. (Detail: {reason})"
            ),
            retriable: true,
            severity: Severity::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_permanent() {
        let human = humanize_error(&TillprintError::Validation("cashier missing".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("cashier missing"));
    }

    #[test]
    fn queue_full_mentions_capacity() {
        let human = humanize_error(&TillprintError::QueueFull { capacity: 10 });
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.suggestion.contains("10"));
    }

    #[test]
    fn unknown_printer_names_the_printer() {
        let human = humanize_error(&TillprintError::PrinterNotFound("Kitchen".into()));
        assert!(human.message.contains("Kitchen"));
    }

    #[test]
    fn paused_printer_is_action_required() {
        let err = TillprintError::PrintFailed {
            printer: "Rongta".into(),
            reason: "lp: Destination \"Rongta\" is not accepting jobs.".into(),
        };
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }

    #[test]
    fn generic_print_failure_is_transient() {
        let err = TillprintError::PrintFailed {
            printer: "Rongta".into(),
            reason: "exit status 1".into(),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }
}
