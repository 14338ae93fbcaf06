//! The rewrite engine.
//!
//! [`rewrite`] runs every rule of a [`RuleSet`] over the content, in order,
//! replacing all occurrences of each pattern. It is a pure function: it
//! never fails, and content with nothing to rewrite comes back unchanged.

use serde::Serialize;

use crate::rules::{RuleContext, RuleSet};

/// How often one rule fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    pub context: RuleContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub count: usize,
}

/// Result of running the engine over one piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Rewritten content.
    pub content: String,
    /// True iff `content` differs from the input.
    pub changed: bool,
    /// Rules that fired at least once, in rule order.
    pub hits: Vec<RuleHit>,
}

impl RewriteOutcome {
    /// Total number of replacements across all rules.
    pub fn substitutions(&self) -> usize {
        self.hits.iter().map(|h| h.count).sum()
    }
}

/// Apply the rule table to `content`.
pub fn rewrite(content: &str, rules: &RuleSet) -> RewriteOutcome {
    let mut current = content.to_string();
    let mut hits = Vec::new();

    for rule in rules.rules() {
        let (next, count) = rule.apply(&current);
        if count == 0 {
            continue;
        }
        current = next.into_owned();
        hits.push(RuleHit {
            context: rule.context(),
            key: rule.key().map(str::to_string),
            count,
        });
    }

    let changed = current != content;
    RewriteOutcome {
        content: current,
        changed,
        hits,
    }
}
