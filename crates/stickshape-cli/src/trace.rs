//! Sample traces and replay.
//!
//! A trace is JSON lines, one raw left-stick sample per line:
//!
//! ```text
//! {"x": 208, "y": 128}
//! {"x": 128, "y": 170, "up": true, "repeat": 30}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use stickshape_limiter::prelude::*;
use tracing::{debug, info};

use crate::error::CliError;

/// One line of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceSample {
    pub x: u8,
    pub y: u8,
    /// Digital up held.
    #[serde(default)]
    pub up: bool,
    /// Number of consecutive samples this line stands for.
    #[serde(default = "one")]
    pub repeat: u32,
    /// Per-line override of the sample spacing, in 4 µs ticks.
    #[serde(default)]
    pub spacing: Option<u16>,
}

fn one() -> u32 {
    1
}

/// One shaped sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReplayRecord {
    pub sample: usize,
    pub raw_x: u8,
    pub raw_y: u8,
    pub x: u8,
    pub y: u8,
    /// Packed SDI verdict: patterns in the high nibble, cardinal in the low.
    pub sdi: u8,
    pub pivot: PivotDirection,
    pub lockout_x: bool,
    pub lockout_y: bool,
    pub jump: bool,
}

/// Parse a trace.
///
/// # Errors
///
/// Returns [`CliError::TraceParse`] with the 1-based line number of the first
/// malformed line, or an IO error from the reader.
pub fn parse_trace(reader: impl BufRead) -> Result<Vec<TraceSample>, CliError> {
    let mut samples = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let sample = serde_json::from_str(trimmed).map_err(|source| CliError::TraceParse {
            line: index + 1,
            source,
        })?;
        samples.push(sample);
    }
    debug!(lines = samples.len(), "trace parsed");
    Ok(samples)
}

/// Run a trace through a fresh limiter.
pub fn replay(
    config: LimiterConfig,
    samples: &[TraceSample],
    default_spacing: u16,
    start: u16,
) -> Vec<ReplayRecord> {
    let mut limiter = Limiter::with_start_time(config, start);
    let mut records = Vec::new();
    for sample in samples {
        let inputs = InputState {
            up: sample.up,
            ..InputState::default()
        };
        let raw = OutputState::with_left_stick(Coordinate::new(sample.x, sample.y));
        let spacing = sample.spacing.unwrap_or(default_spacing);
        for _ in 0..sample.repeat {
            let out = limiter.limit_outputs(&inputs, &raw, spacing);
            let diag = limiter.diagnostics();
            records.push(ReplayRecord {
                sample: records.len(),
                raw_x: sample.x,
                raw_y: sample.y,
                x: out.left_stick_x,
                y: out.left_stick_y,
                sdi: diag.sdi.bits(),
                pivot: diag.pivot,
                lockout_x: diag.lockout.x,
                lockout_y: diag.lockout.y,
                jump: diag.jumping,
            });
        }
    }
    info!(samples = records.len(), "replay finished");
    records
}
