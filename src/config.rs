use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::logging::LogLevel;

/// Options that can be set via CLI or config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// 1-based subsong to inspect; `None` means the first
    pub subsong: Option<u32>,
    /// Explicit header file for split banks
    pub header_path: Option<PathBuf>,
    pub log_level: LogLevel,
    /// Print every subsong instead of one
    pub list_all: bool,
}

/// Load options from a `key = value` file, or defaults when no file is given
pub fn load_config(path: Option<&Path>) -> Result<Options> {
    let Some(path) = path else {
        return Ok(Options::default());
    };

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_config(&data).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Apply every recognized key in `data` over the default options
pub fn parse_config(data: &str) -> Result<Options> {
    let mut entries = Vec::new();
    parse_properties(data, &mut |key, value| {
        entries.push((key.to_string(), value.to_string()))
    });

    let mut opts = Options::default();
    for (key, value) in entries {
        match key.to_lowercase().as_str() {
            "subsong" => opts.subsong = Some(parse_subsong(&value)?),
            "header" => opts.header_path = Some(PathBuf::from(value)),
            "log_level" | "loglevel" => {
                opts.log_level = LogLevel::parse(&value)
                    .with_context(|| format!("Invalid log level: {}", value))?;
            }
            "all" | "list_all" => opts.list_all = parse_bool(&value)?,
            _ => log::warn!("Unknown config key '{}'", key),
        }
    }
    Ok(opts)
}

/// Parse a 1-based subsong index
pub fn parse_subsong(s: &str) -> Result<u32> {
    let n: u32 = s.trim().parse().context("Invalid subsong number")?;
    if n == 0 {
        anyhow::bail!("Subsong numbers start at 1");
    }
    Ok(n)
}

pub fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid boolean value: {}", s),
    }
}

/// Split property-file text into key/value pairs
///
/// One `key = value` per line; `#` starts a comment anywhere on a line.
/// Keys keep their case, surrounding whitespace is trimmed, and lines
/// without `=` are skipped with a warning.
fn parse_properties(data: &str, handler: &mut dyn FnMut(&str, &str)) {
    for (lineno, line) in data.lines().enumerate() {
        let line = match line.find('#') {
            Some(hash) => &line[..hash],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => handler(key.trim_end(), value.trim_start()),
            None => log::warn!("Key without value on line {}", lineno + 1),
        }
    }
}
