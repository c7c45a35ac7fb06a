//! Subcommand implementations

use std::fs;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::Result;
use stickshape_limiter::prelude::*;
use tracing::{debug, info};

use crate::error::CliError;
use crate::output;
use crate::trace::{self, TraceSample};

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<LimiterConfig, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: LimiterConfig =
        serde_json::from_str(&text).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

fn read_trace(input: Option<&Path>) -> Result<Vec<TraceSample>, CliError> {
    match input {
        None => trace::parse_trace(io::stdin().lock()),
        Some(path) if path == Path::new("-") => trace::parse_trace(io::stdin().lock()),
        Some(path) => {
            let file = fs::File::open(path).map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            trace::parse_trace(BufReader::new(file))
        }
    }
}

/// `replay`: shape a recorded trace.
pub fn replay(
    config: Option<&Path>,
    spacing: u16,
    start: u16,
    input: Option<&Path>,
    json: bool,
) -> Result<()> {
    TimeBase::try_new(spacing).map_err(CliError::from)?;
    let config = match config {
        Some(path) => load_config(path)?,
        None => LimiterConfig::default(),
    };
    let samples = read_trace(input)?;
    info!(lines = samples.len(), spacing, "replaying trace");
    let records = trace::replay(config, &samples, spacing, start);
    output::print_replay(&records, json).map_err(CliError::from)?;
    Ok(())
}

/// `check-config`: validate a configuration file.
pub fn check_config(path: &Path, json: bool) -> Result<()> {
    load_config(path)?;
    output::print_config_ok(&path.display().to_string(), json);
    Ok(())
}

/// `defaults`: print the default configuration.
pub fn defaults(pure_easing: bool) -> Result<()> {
    let config = if pure_easing {
        LimiterConfig::pure_easing()
    } else {
        LimiterConfig::default()
    };
    output::print_config(&config).map_err(CliError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_load_config_accepts_partial_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, r#"{{ "jitter": false, "wank_rule": "sequential" }}"#)?;
        let config = load_config(file.path())?;
        assert!(!config.jitter);
        assert_eq!(config.wank_rule, WankRule::Sequential);
        assert_eq!(config.timing, Timing::DEFAULT);
        Ok(())
    }

    #[test]
    fn test_load_config_rejects_invalid_timing() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, r#"{{ "timing": {{ "tap_inner_us": 0 }} }}"#)?;
        let result = load_config(file.path());
        assert!(matches!(result, Err(CliError::ConfigInvalid(_))), "{result:?}");
        Ok(())
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/stickshape.json"));
        assert!(matches!(result, Err(CliError::Read { .. })), "{result:?}");
    }
}
