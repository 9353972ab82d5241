//! Configuration
//!
//! Settings are layered, lowest precedence first:
//! 1. Built-in defaults
//! 2. Optional TOML file named by `JSHON_CONFIG`
//! 3. `JSHON_*` environment variables (e.g. `JSHON_SORT_KEYS=true`)
//! 4. Modifiers given on the command line

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::interpreter::stack::DEFAULT_DEPTH;
use crate::interpreter::Modifier;

pub const CONFIG_PATH_VAR: &str = "JSHON_CONFIG";
pub const ENV_PREFIX: &str = "JSHON";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Emit object members (and `keys` output) in sorted order
    pub sort_keys: bool,
    /// Suppress diagnostics on stderr
    pub quiet: bool,
    /// Deep-copy values pushed by `extract` and `across`
    pub by_value: bool,
    /// Report data errors and keep going
    pub continue_on_error: bool,
    /// Tolerate a JSONP callback wrapper around the input
    pub jsonp: bool,
    /// Terminate `unstring` output with NUL instead of newline
    pub null_delimiter: bool,
    /// Write the result back to the input file
    pub in_place: bool,
    /// Unrecognized `literal-value` arguments become strings
    pub legacy_literals: bool,
    /// Depth bound for the Value Stack and the Iteration Frame Stack
    pub stack_depth: usize,
    /// Input file; stdin when absent or `-`
    pub file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sort_keys: false,
            quiet: false,
            by_value: false,
            continue_on_error: false,
            jsonp: false,
            null_delimiter: false,
            in_place: false,
            legacy_literals: false,
            stack_depth: DEFAULT_DEPTH,
            file: None,
        }
    }
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Apply one command-line modifier
    pub fn apply(&mut self, modifier: &Modifier) {
        match modifier {
            Modifier::Jsonp => self.jsonp = true,
            Modifier::SortKeys => self.sort_keys = true,
            Modifier::Quiet => self.quiet = true,
            Modifier::ByValue => self.by_value = true,
            Modifier::ContinueOnError => self.continue_on_error = true,
            Modifier::InPlace => self.in_place = true,
            Modifier::NullDelimiter => self.null_delimiter = true,
            Modifier::File(path) => self.file = Some(PathBuf::from(path)),
        }
    }
}

/* ===================== Builder ===================== */

#[derive(Debug)]
pub struct SettingsBuilder {
    config_path: Option<PathBuf>,
    use_env: bool,
    modifiers: Vec<Modifier>,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            config_path: None,
            use_env: true,
            modifiers: Vec::new(),
        }
    }

    /// Config file path (overrides `JSHON_CONFIG`)
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Skip `JSHON_CONFIG` and `JSHON_*` lookups
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    pub fn modifiers(mut self, modifiers: &[Modifier]) -> Self {
        self.modifiers.extend_from_slice(modifiers);
        self
    }

    pub fn build(self) -> Result<Settings> {
        let defaults = Settings::default();
        let mut builder = config::Config::builder()
            .set_default("sort_keys", defaults.sort_keys)?
            .set_default("quiet", defaults.quiet)?
            .set_default("by_value", defaults.by_value)?
            .set_default("continue_on_error", defaults.continue_on_error)?
            .set_default("jsonp", defaults.jsonp)?
            .set_default("null_delimiter", defaults.null_delimiter)?
            .set_default("in_place", defaults.in_place)?
            .set_default("legacy_literals", defaults.legacy_literals)?
            .set_default("stack_depth", defaults.stack_depth as i64)?;

        let config_path = self.config_path.or_else(|| {
            self.use_env
                .then(|| std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from))
                .flatten()
        });
        if let Some(path) = &config_path {
            builder = builder.add_source(config::File::from(path.as_path()).required(true));
        }
        if self.use_env {
            builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        }

        let mut settings: Settings = builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        for modifier in &self.modifiers {
            settings.apply(modifier);
        }
        ensure!(settings.stack_depth > 0, "Invalid configuration: stack_depth must be at least 1");
        Ok(settings)
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
