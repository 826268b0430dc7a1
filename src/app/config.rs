//! Config file loading and the merge of file values with CLI flags.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use mediadump_core::download::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, MAX_CONCURRENCY, MIN_CONCURRENCY, READ_TIMEOUT_SECS,
};
use thiserror::Error;

use crate::cli::Args;

/// Defaults read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FileConfig {
    /// Remote domain.
    pub domain: Option<String>,
    /// Output directory.
    pub output_dir: Option<PathBuf>,
    /// Concurrency (same range as the CLI).
    pub parallel: Option<usize>,
    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Whole-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Validates config values against the CLI constraints.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(parallel) = self.parallel
            && !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&parallel)
        {
            bail!(
                "Invalid config value for `parallel`: {parallel}. Expected range: {MIN_CONCURRENCY}..={MAX_CONCURRENCY}"
            );
        }
        if let Some(domain) = &self.domain
            && domain.trim().is_empty()
        {
            bail!("Invalid config value for `domain`: must not be empty");
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("timeout_secs", self.timeout_secs)?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RunSettings {
    pub values_file: Option<PathBuf>,
    pub content_file: Option<PathBuf>,
    pub domain: String,
    pub output_dir: PathBuf,
    pub parallel: usize,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
    pub strict_exit: bool,
}

/// Required values absent from both the command line and the config file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing required arguments: {}", .0.join(", "))]
pub(crate) struct MissingArguments(pub Vec<&'static str>);

/// Merges CLI flags over file values over built-in defaults.
///
/// # Errors
///
/// Returns [`MissingArguments`] naming every required value that is absent.
pub(crate) fn resolve_settings(
    args: &Args,
    file: &FileConfig,
) -> Result<RunSettings, MissingArguments> {
    let domain = args.domain.clone().or_else(|| file.domain.clone());
    let output_dir = args.output_dir.clone().or_else(|| file.output_dir.clone());

    let mut missing = Vec::new();
    if args.values.is_none() && args.content.is_none() {
        missing.push("--values or --content");
    }
    if domain.is_none() {
        missing.push("--domain");
    }
    if output_dir.is_none() {
        missing.push("--output-dir");
    }

    let (Some(domain), Some(output_dir)) = (domain, output_dir) else {
        return Err(MissingArguments(missing));
    };
    if !missing.is_empty() {
        return Err(MissingArguments(missing));
    }

    Ok(RunSettings {
        values_file: args.values.clone(),
        content_file: args.content.clone(),
        domain,
        output_dir,
        parallel: args
            .parallel
            .map(usize::from)
            .or(file.parallel)
            .unwrap_or(DEFAULT_CONCURRENCY),
        connect_timeout_secs: args
            .connect_timeout
            .or(file.connect_timeout_secs)
            .unwrap_or(CONNECT_TIMEOUT_SECS),
        timeout_secs: args
            .timeout
            .or(file.timeout_secs)
            .unwrap_or(READ_TIMEOUT_SECS),
        strict_exit: args.strict_exit,
    })
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/mediadump/config.toml`
/// 2. `$HOME/.config/mediadump/config.toml`
#[must_use]
pub(crate) fn resolve_default_config_path() -> Option<PathBuf> {
    config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg_config_home) = xdg_config_home {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("mediadump")
                .join("config.toml"),
        );
    }

    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("mediadump")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path; a missing file yields the defaults.
pub(crate) fn load_default_file_config() -> Result<FileConfig> {
    match resolve_default_config_path() {
        Some(path) if path.exists() => load_file_config(&path),
        _ => Ok(FileConfig::default()),
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_number = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_number}: expected key = value");
        };

        let value = raw_value.trim();
        match raw_key.trim() {
            "domain" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `domain` value on line {line_number}"))?;
                cfg.domain = Some(parsed);
            }
            "output_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `output_dir` value on line {line_number}"))?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "parallel" => {
                let parsed = parse_integer_u64(value)
                    .with_context(|| format!("Invalid `parallel` value on line {line_number}"))?;
                let n = usize::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("parallel out of range for usize"))?;
                cfg.parallel = Some(n);
            }
            "connect_timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `connect_timeout_secs` value on line {line_number}")
                })?;
                cfg.connect_timeout_secs = Some(parsed);
            }
            "timeout_secs" => {
                let parsed = parse_integer_u64(value).with_context(|| {
                    format!("Invalid `timeout_secs` value on line {line_number}")
                })?;
                cfg.timeout_secs = Some(parsed);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_number}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}
