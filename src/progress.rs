//! Progress output for user-facing status updates.
//!
//! One line per processed file on stderr, coloured when the terminal allows
//! it. In verbose mode output is suppressed since tracing handles everything.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::rename::{ExecutionRecord, Outcome, OutcomeSummary};

/// Progress reporter for user-facing output
pub struct Progress {
    writer: Box<dyn Write>,
    /// When true, all output is suppressed (verbose mode uses tracing instead)
    silent: bool,
    /// When true, output is colorized
    colors_enabled: bool,
}

/// Check if we should use colors in output
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    io::stderr().is_terminal()
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Create a new progress reporter writing to stderr
    pub fn new() -> Self {
        Self::new_with_ui(false, should_use_colors())
    }

    /// Create a progress reporter that respects UI mode.
    /// When verbose=true, output is suppressed (tracing handles it)
    pub fn new_with_ui(verbose: bool, colors_enabled: bool) -> Self {
        Self {
            writer: Box::new(io::stderr()),
            silent: verbose,
            colors_enabled,
        }
    }

    /// Create a progress reporter with a custom writer (for testing)
    #[cfg(test)]
    pub fn with_writer(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            silent: false,
            colors_enabled: false,
        }
    }

    /// Create a silent progress reporter
    pub fn silent() -> Self {
        Self {
            writer: Box::new(io::sink()),
            silent: true,
            colors_enabled: false,
        }
    }

    /// Report the number of candidate files found
    pub fn scan_complete(&mut self, count: usize, directory: &Path) {
        if self.silent {
            return;
        }
        let line = format!("Found {} video files in {}", count, directory.display());
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{}", line.dimmed());
        } else {
            let _ = writeln!(self.writer, "{}", line);
        }
    }

    /// Report the start of a rename batch
    pub fn rename_start(&mut self, renames: usize) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(
                self.writer,
                "{}",
                format!("Renaming {} files", renames).bold()
            );
        } else {
            let _ = writeln!(self.writer, "Renaming {} files", renames);
        }
    }

    /// Report what happened to one file
    pub fn outcome(&mut self, current: usize, total: usize, record: &ExecutionRecord) {
        if self.silent {
            return;
        }

        let counter = format!("[{}/{}]", current, total);
        let from = record.source_name.as_str();

        match (&record.outcome, record.destination_name.as_deref()) {
            (Outcome::Renamed { .. }, Some(to)) => {
                if self.colors_enabled {
                    let _ = writeln!(
                        self.writer,
                        "{} {} {} {}",
                        counter.cyan(),
                        from.dimmed(),
                        "→".cyan(),
                        to
                    );
                } else {
                    let _ = writeln!(self.writer, "{} {} -> {}", counter, from, to);
                }
            }
            (Outcome::Failed(_), _) => {
                let reason = record.outcome.description();
                if self.colors_enabled {
                    let _ = writeln!(
                        self.writer,
                        "{} {} {}",
                        counter.cyan(),
                        from,
                        reason.red()
                    );
                } else {
                    let _ = writeln!(self.writer, "{} {} ({})", counter, from, reason);
                }
            }
            (outcome, _) => {
                let reason = outcome.description();
                if self.colors_enabled {
                    let _ = writeln!(
                        self.writer,
                        "{} {} {}",
                        counter.cyan(),
                        from.dimmed(),
                        format!("skipped: {}", reason).yellow()
                    );
                } else {
                    let _ = writeln!(self.writer, "{} {} (skipped: {})", counter, from, reason);
                }
            }
        }
    }

    /// Report the end of a rename batch
    pub fn rename_complete(&mut self, summary: &OutcomeSummary) {
        if self.silent {
            return;
        }
        let _ = writeln!(self.writer);
        let line = format!(
            "{} renamed, {} skipped, {} failed",
            summary.renamed,
            summary.skipped(),
            summary.failed
        );
        if !self.colors_enabled {
            let _ = writeln!(self.writer, "{}", line);
        } else if summary.failed > 0 {
            let _ = writeln!(self.writer, "{} {}", "✗".red().bold(), line.red());
        } else {
            let _ = writeln!(self.writer, "{} {}", "✓".green().bold(), line.green());
        }
    }

    /// Report an error during operation (non-fatal)
    pub fn warn(&mut self, message: &str) {
        if self.silent {
            return;
        }
        if self.colors_enabled {
            let _ = writeln!(self.writer, "{} {}", "!".yellow().bold(), message.yellow());
        } else {
            let _ = writeln!(self.writer, "Warning: {}", message);
        }
    }
}
