//! Named text transformations
//!
//! A rule is a pure `fn(&str) -> String` over a file's full text. Rules are
//! identified by [`RuleId`] and looked up in a [`RuleRegistry`] built once
//! at startup, so a rule chain is just an ordered list of ids.
//!
//! # Examples
//!
//! ```
//! use gae_setup::rules::{RuleId, RuleRegistry};
//!
//! let registry = RuleRegistry::builtin();
//! let (patched, fired) = registry
//!     .apply_chain("'compiled' => '/tmp',", &[RuleId::ReplaceCompiledPath])
//!     .unwrap();
//!
//! assert!(patched.starts_with("'compiled' => env('COMPILED_PATH'"));
//! assert_eq!(fired, vec![RuleId::ReplaceCompiledPath]);
//! ```

pub mod catalog;
pub mod primitives;

use crate::error::{SetupError, SetupResult};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Identifier of a built-in rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    ReplaceAppClass,
    ReplaceCompiledPath,
    AddQueueConfig,
    AddCloudSqlConfig,
    AddGaeDisk,
}

impl RuleId {
    pub const ALL: [RuleId; 5] = [
        RuleId::ReplaceAppClass,
        RuleId::ReplaceCompiledPath,
        RuleId::AddQueueConfig,
        RuleId::AddCloudSqlConfig,
        RuleId::AddGaeDisk,
    ];

    /// Stable kebab-case name, as accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            RuleId::ReplaceAppClass => "replace-app-class",
            RuleId::ReplaceCompiledPath => "replace-compiled-path",
            RuleId::AddQueueConfig => "add-queue-config",
            RuleId::AddCloudSqlConfig => "add-cloud-sql-config",
            RuleId::AddGaeDisk => "add-gae-disk",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleId {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = RuleId::ALL.iter().map(|id| id.name()).collect();
                SetupError::config(format!(
                    "unknown rule '{s}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

/// A named transformation and the notice shown when it changes a file
#[derive(Clone, Copy)]
pub struct Rule {
    pub id: RuleId,
    pub apply: fn(&str) -> String,
    /// Past-tense summary, completed with the file name when reported
    pub summary: &'static str,
}

impl Rule {
    pub const fn new(id: RuleId, apply: fn(&str) -> String, summary: &'static str) -> Self {
        Self { id, apply, summary }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("summary", &self.summary)
            .finish()
    }
}

/// Lookup table from rule id to rule
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<RuleId, Rule>,
}

impl RuleRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in rule
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Rule::new(
            RuleId::ReplaceAppClass,
            catalog::replace_app_class,
            "Replaced the application class",
        ));
        registry.register(Rule::new(
            RuleId::ReplaceCompiledPath,
            catalog::replace_compiled_path,
            "Replaced the 'compiled' path",
        ));
        registry.register(Rule::new(
            RuleId::AddQueueConfig,
            catalog::add_queue_config,
            "Added queue driver configuration",
        ));
        registry.register(Rule::new(
            RuleId::AddCloudSqlConfig,
            catalog::add_cloud_sql_config,
            "Added Cloud SQL driver configuration",
        ));
        registry.register(Rule::new(
            RuleId::AddGaeDisk,
            catalog::add_gae_disk,
            "Added GAE filesystem driver configuration",
        ));
        registry
    }

    /// Add or replace a rule
    pub fn register(&mut self, rule: Rule) {
        self.rules.insert(rule.id, rule);
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(&id)
    }

    /// Fold a rule chain over `contents`
    ///
    /// Returns the final text and the rules that changed it, in chain order.
    /// Fails before touching anything if a rule is not registered.
    pub fn apply_chain(&self, contents: &str, chain: &[RuleId]) -> SetupResult<(String, Vec<RuleId>)> {
        let rules = chain
            .iter()
            .map(|id| {
                self.get(*id)
                    .ok_or_else(|| SetupError::config(format!("rule '{id}' is not registered")))
            })
            .collect::<SetupResult<Vec<&Rule>>>()?;

        let mut text = contents.to_string();
        let mut fired = Vec::new();
        for rule in rules {
            let next = (rule.apply)(&text);
            if next != text {
                trace!("Rule {} changed the contents", rule.id);
                fired.push(rule.id);
                text = next;
            } else {
                trace!("Rule {} left the contents unchanged", rule.id);
            }
        }
        Ok((text, fired))
    }
}
