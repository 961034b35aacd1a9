//! Named logger tree
//!
//! Only materialized nodes are stored. Ancestors of a dotted name are
//! resolved by stripping trailing segments and looking them up, so
//! `"a.b.c"` inherits from `"a.b"` or `"a"` only if those were created by a
//! lookup, an explicit level, or configuration.

use super::{appender::Appender, log_level::LogLevel};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Name carried by records logged on the root logger
pub const ROOT_LOGGER_NAME: &str = "root";

/// Level the root logger starts with
pub const DEFAULT_ROOT_LEVEL: LogLevel = LogLevel::Debug;

pub(crate) struct LoggerNode {
    pub(crate) level: Option<LogLevel>,
    pub(crate) additive: bool,
    pub(crate) appenders: Vec<Arc<dyn Appender>>,
}

impl LoggerNode {
    fn new(level: Option<LogLevel>) -> Self {
        Self {
            level,
            additive: true,
            appenders: Vec::new(),
        }
    }
}

pub(crate) struct Hierarchy {
    root: LoggerNode,
    nodes: BTreeMap<String, LoggerNode>,
}

/// Iterate `name` and its ancestors, nearest first: `a.b.c`, `a.b`, `a`
fn lineage(name: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(name), |current| {
        let current: &str = *current;
        current.rfind('.').map(|idx| &current[..idx])
    })
    .filter(|n| !n.is_empty())
}

impl Hierarchy {
    pub(crate) fn new() -> Self {
        Self {
            root: LoggerNode::new(Some(DEFAULT_ROOT_LEVEL)),
            nodes: BTreeMap::new(),
        }
    }

    pub(crate) fn is_root(name: &str) -> bool {
        name.is_empty()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        Self::is_root(name) || self.nodes.contains_key(name)
    }

    pub(crate) fn node(&self, name: &str) -> Option<&LoggerNode> {
        if Self::is_root(name) {
            Some(&self.root)
        } else {
            self.nodes.get(name)
        }
    }

    /// Look up a node, creating it with no level if it does not exist yet
    pub(crate) fn node_mut(&mut self, name: &str) -> &mut LoggerNode {
        if Self::is_root(name) {
            &mut self.root
        } else {
            self.nodes
                .entry(name.to_string())
                .or_insert_with(|| LoggerNode::new(None))
        }
    }

    pub(crate) fn root_level(&self) -> LogLevel {
        self.root.level.unwrap_or(DEFAULT_ROOT_LEVEL)
    }

    /// Walk from `name` toward root until a concrete level is found
    pub(crate) fn effective_level(&self, name: &str) -> LogLevel {
        lineage(name)
            .filter_map(|n| self.nodes.get(n))
            .find_map(|node| node.level)
            .unwrap_or_else(|| self.root_level())
    }

    /// Appenders reachable from `name`: its own, then each ancestor's, then
    /// root's. A non-additive node ends the walk after its own appenders.
    pub(crate) fn collect_appenders(&self, name: &str) -> Vec<Arc<dyn Appender>> {
        let mut collected = Vec::new();
        for node in lineage(name).filter_map(|n| self.nodes.get(n)) {
            collected.extend(node.appenders.iter().cloned());
            if !node.additive {
                return collected;
            }
        }
        collected.extend(self.root.appenders.iter().cloned());
        collected
    }

    /// Every appender attached anywhere in the tree, each instance once
    pub(crate) fn all_appenders(&self) -> Vec<Arc<dyn Appender>> {
        let mut seen: Vec<Arc<dyn Appender>> = Vec::new();
        let nodes = std::iter::once(&self.root).chain(self.nodes.values());
        for appender in nodes.flat_map(|node| node.appenders.iter()) {
            if !seen.iter().any(|s| Arc::ptr_eq(s, appender)) {
                seen.push(Arc::clone(appender));
            }
        }
        seen
    }

    /// Names of all materialized loggers, root excluded, in sorted order
    pub(crate) fn logger_names(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }
}
