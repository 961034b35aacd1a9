//! JSON configuration documents
//!
//! A document declares named appenders and assigns levels, additivity, and
//! appender references to loggers:
//!
//! ```json
//! {
//!   "root": { "level": "INFO", "appenders": ["stdout"] },
//!   "loggers": {
//!     "net.http": { "level": "WARN", "additivity": false, "appenders": ["stdout"] }
//!   },
//!   "appenders": { "stdout": { "type": "console", "colors": false } }
//! }
//! ```
//!
//! Parsing validates the whole document up front, so applying a parsed
//! [`Configuration`] cannot fail halfway through.

use crate::appenders::ConsoleAppender;
use crate::core::hierarchy::Hierarchy;
use crate::core::{Appender, LogLevel, LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDocument {
    #[serde(default)]
    root: Option<LoggerDocument>,
    #[serde(default)]
    loggers: BTreeMap<String, LoggerDocument>,
    #[serde(default)]
    appenders: BTreeMap<String, AppenderConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggerDocument {
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    additivity: Option<bool>,
    #[serde(default)]
    appenders: Vec<String>,
}

/// Appender declaration inside a configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppenderConfig {
    Console {
        #[serde(default = "default_colors")]
        colors: bool,
        #[serde(default)]
        location: bool,
    },
}

fn default_colors() -> bool {
    true
}

impl AppenderConfig {
    fn build(&self) -> Arc<dyn Appender> {
        match self {
            AppenderConfig::Console { colors, location } => {
                Arc::new(ConsoleAppender::with_colors(*colors).with_location(*location))
            }
        }
    }
}

/// What a configuration does to a logger's own level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSetting {
    /// Leave the current level alone
    Keep,
    /// Clear the level so it is inherited from ancestors
    Inherit,
    Set(LogLevel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerSettings {
    pub level: LevelSetting,
    pub additivity: Option<bool>,
    pub appenders: Vec<String>,
}

/// A validated configuration, ready to be applied to an engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    root: Option<LoggerSettings>,
    loggers: BTreeMap<String, LoggerSettings>,
    appenders: BTreeMap<String, AppenderConfig>,
}

fn resolve_logger(
    name: &str,
    doc: LoggerDocument,
    declared: &BTreeMap<String, AppenderConfig>,
) -> Result<LoggerSettings> {
    let level = match doc.level.as_deref().map(str::trim) {
        None => LevelSetting::Keep,
        Some(s) if s.eq_ignore_ascii_case("NOT_SET") || s.eq_ignore_ascii_case("INHERITED") => {
            LevelSetting::Inherit
        }
        Some(s) => LevelSetting::Set(s.parse().map_err(|e: String| {
            LoggerError::config_parse(format!("logger '{}': {}", name, e))
        })?),
    };

    if let Some(missing) = doc.appenders.iter().find(|a| !declared.contains_key(*a)) {
        return Err(LoggerError::config_parse(format!(
            "logger '{}' references undeclared appender '{}'",
            name, missing
        )));
    }

    Ok(LoggerSettings {
        level,
        additivity: doc.additivity,
        appenders: doc.appenders,
    })
}

impl Configuration {
    /// Parse and validate a JSON configuration document
    pub fn parse(text: &str) -> Result<Self> {
        let ConfigDocument {
            root,
            loggers,
            appenders,
        } = serde_json::from_str(text).map_err(|e| LoggerError::config_parse(e.to_string()))?;

        let root = match root {
            Some(doc) => {
                let settings = resolve_logger("root", doc, &appenders)?;
                if settings.level == LevelSetting::Inherit {
                    return Err(LoggerError::config_parse(
                        "root logger must have a concrete level",
                    ));
                }
                Some(settings)
            }
            None => None,
        };

        let mut resolved = BTreeMap::new();
        for (name, doc) in loggers {
            if name.is_empty() {
                return Err(LoggerError::config_parse(
                    "empty logger name; configure the root logger under \"root\"",
                ));
            }
            let settings = resolve_logger(&name, doc, &appenders)?;
            resolved.insert(name, settings);
        }

        Ok(Self {
            root,
            loggers: resolved,
            appenders,
        })
    }

    /// Read and parse a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("reading configuration", path.display().to_string(), e)
        })?;
        Self::parse(&text)
    }

    pub fn root(&self) -> Option<&LoggerSettings> {
        self.root.as_ref()
    }

    pub fn logger(&self, name: &str) -> Option<&LoggerSettings> {
        self.loggers.get(name)
    }

    pub fn appender(&self, name: &str) -> Option<&AppenderConfig> {
        self.appenders.get(name)
    }

    /// Merge into the tree. Existing appenders stay attached.
    pub(crate) fn apply(&self, hierarchy: &mut Hierarchy) {
        let built: BTreeMap<&str, Arc<dyn Appender>> = self
            .appenders
            .iter()
            .map(|(name, config)| (name.as_str(), config.build()))
            .collect();

        let targets = self
            .root
            .iter()
            .map(|settings| ("", settings))
            .chain(self.loggers.iter().map(|(n, s)| (n.as_str(), s)));

        for (name, settings) in targets {
            let node = hierarchy.node_mut(name);
            match settings.level {
                LevelSetting::Keep => {}
                LevelSetting::Inherit => node.level = None,
                LevelSetting::Set(level) => node.level = Some(level),
            }
            if let Some(additive) = settings.additivity {
                node.additive = additive;
            }
            node.appenders.extend(
                settings
                    .appenders
                    .iter()
                    .filter_map(|a| built.get(a.as_str()).cloned()),
            );
        }
    }
}
