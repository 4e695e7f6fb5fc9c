//! The live report written to the error stream.
//!
//! [`Reporter`] knows two kinds of writes: durable lines that stay on screen,
//! and ephemeral lines (progress) that the next write overwrites in place.
//! [`ReportState`] pairs a reporter with the running [`Summary`] and owns all
//! the user-facing wording of failures and errors.

use std::io;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use unicode_width::UnicodeWidthStr;

use crate::model::Location;
use crate::summary::{Outcome, Summary};

// ============================================================================
// REPORT SINK
// ============================================================================

/// A line-overwriting writer.
pub struct Reporter<W> {
    out: W,
    interactive: bool,
    /// Width of the ephemeral text currently sitting on the last line.
    pending: usize,
}

impl Reporter<StandardStream> {
    /// A reporter on stderr; ephemeral output and automatic color are enabled
    /// only on a terminal.
    pub fn stderr(color: ColorChoice) -> Self {
        let interactive = atty::is(atty::Stream::Stderr);
        Self::new(StandardStream::stderr(effective_color(color, interactive)), interactive)
    }
}

/// `Auto` never colors a stream that is not a terminal.
pub fn effective_color(color: ColorChoice, interactive: bool) -> ColorChoice {
    match color {
        ColorChoice::Auto if !interactive => ColorChoice::Never,
        other => other,
    }
}

impl<W: WriteColor> Reporter<W> {
    pub fn new(out: W, interactive: bool) -> Self {
        Self {
            out,
            interactive,
            pending: 0,
        }
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Writes a durable line.
    pub fn report(&mut self, message: &str) -> io::Result<()> {
        self.report_styled(message, None)
    }

    /// Writes a durable line in the given color (when the stream supports it).
    pub fn report_colored(&mut self, message: &str, color: Color) -> io::Result<()> {
        self.report_styled(message, Some(color))
    }

    /// Writes every line of `block` durably.
    pub fn report_block(&mut self, block: &str) -> io::Result<()> {
        for line in block.lines() {
            self.report(line)?;
        }
        Ok(())
    }

    /// Writes a line the next write replaces. A no-op on non-interactive streams.
    pub fn report_ephemeral(&mut self, message: &str) -> io::Result<()> {
        if !self.interactive {
            return Ok(());
        }
        self.overwrite(message, None)?;
        self.out.flush()?;
        self.pending = message.width();
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn report_styled(&mut self, message: &str, color: Option<Color>) -> io::Result<()> {
        self.overwrite(message, color)?;
        writeln!(self.out)?;
        self.out.flush()?;
        self.pending = 0;
        Ok(())
    }

    fn overwrite(&mut self, message: &str, color: Option<Color>) -> io::Result<()> {
        if self.pending > 0 {
            write!(self.out, "\r")?;
        }
        match color {
            Some(color) => {
                self.out
                    .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
                write!(self.out, "{}", message)?;
                self.out.reset()?;
            }
            None => write!(self.out, "{}", message)?,
        }
        let padding = self.pending.saturating_sub(message.width());
        if padding > 0 {
            write!(self.out, "{:padding$}", "", padding = padding)?;
        }
        Ok(())
    }
}

// ============================================================================
// REPORT STATE
// ============================================================================

/// The reporter plus the running summary, threaded through the whole run.
pub struct ReportState<W> {
    reporter: Reporter<W>,
    summary: Summary,
}

impl<W: WriteColor> ReportState<W> {
    pub fn new(reporter: Reporter<W>, examples: usize) -> Self {
        Self {
            reporter,
            summary: Summary::with_examples(examples),
        }
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn into_reporter(self) -> Reporter<W> {
        self.reporter
    }

    pub fn update_summary(&mut self, delta: Summary) {
        self.summary += delta;
    }

    /// Shows the running summary as an ephemeral heartbeat.
    pub fn report_progress(&mut self) -> io::Result<()> {
        let line = self.summary.to_string();
        self.reporter.report_ephemeral(&line)
    }

    /// Durable final summary line.
    pub fn report_summary(&mut self) -> io::Result<()> {
        let line = self.summary.to_string();
        self.reporter.report(&line)
    }

    /// Records an outcome, printing its diagnostic when it is not a success.
    pub fn record(&mut self, location: &Location, expression: &str, outcome: Outcome) -> io::Result<()> {
        match &outcome {
            Outcome::Success => {}
            Outcome::Failure(diagnostic) => self.report_failure(location, expression, diagnostic)?,
            Outcome::Error(message) => self.report_error(location, expression, message)?,
        }
        self.update_summary(outcome.delta());
        Ok(())
    }

    fn report_failure(&mut self, location: &Location, expression: &str, diagnostic: &str) -> io::Result<()> {
        self.reporter.report_colored(
            &format!("### Failure in {}: expression `{}'", location, expression),
            Color::Red,
        )?;
        self.reporter.report_block(diagnostic)?;
        self.reporter.report("")
    }

    fn report_error(&mut self, location: &Location, expression: &str, message: &str) -> io::Result<()> {
        self.reporter.report_colored(
            &format!("### Error in {}: expression `{}'", location, expression),
            Color::Yellow,
        )?;
        self.reporter.report_block(message)?;
        self.reporter.report("")
    }
}
