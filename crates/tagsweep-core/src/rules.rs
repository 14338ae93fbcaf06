//! Substitution rules generated from a category table.
//!
//! Every rule is a fixed textual shape: one string literal in one
//! syntactic context, bounded on both sides by its quote marks and the
//! surrounding operator or paren tokens. Because the closing quote is part
//! of every pattern, a longer literal such as `"fruits_extra"` can never be
//! matched by the `fruits` rule.
//!
//! Rule order is fixed: equality rules, inequality rules, the membership
//! list, then call-argument rules. Within a family, entries follow the
//! table's canonical order. Patterns are mutually exclusive, so the order
//! only pins the output bytes.

use std::borrow::Cow;
use std::fmt;

use regex::{NoExpand, Regex};
use serde::Serialize;

use crate::categories::CategoryTable;

/// Syntactic context a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleContext {
    /// `=== "tag"`
    Equality,
    /// `!== "tag"`
    Inequality,
    /// `["a", "b", ...]` holding every tag in canonical order.
    MembershipList,
    /// `("tag")` as the sole call argument.
    CallArgument,
}

impl fmt::Display for RuleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleContext::Equality => write!(f, "equality"),
            RuleContext::Inequality => write!(f, "inequality"),
            RuleContext::MembershipList => write!(f, "membership_list"),
            RuleContext::CallArgument => write!(f, "call_argument"),
        }
    }
}

/// A single pattern → replacement pair.
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    context: RuleContext,
    /// Category key, absent for the membership list.
    key: Option<String>,
    literal_text: String,
    pattern: Regex,
    replacement: String,
}

impl SubstitutionRule {
    fn new(context: RuleContext, key: Option<&str>, from: String, to: String) -> Self {
        // An escaped literal is always a valid pattern.
        let pattern = Regex::new(&regex::escape(&from)).unwrap();
        SubstitutionRule {
            context,
            key: key.map(str::to_string),
            literal_text: from,
            pattern,
            replacement: to,
        }
    }

    /// Context this rule targets.
    pub fn context(&self) -> RuleContext {
        self.context
    }

    /// Category key for single-tag rules.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The exact text the rule matches.
    pub fn pattern_text(&self) -> &str {
        &self.literal_text
    }

    /// The exact text each match becomes.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every non-overlapping occurrence, returning the new text and
    /// the number of replacements made.
    pub fn apply<'a>(&self, content: &'a str) -> (Cow<'a, str>, usize) {
        let count = self.pattern.find_iter(content).count();
        if count == 0 {
            return (Cow::Borrowed(content), 0);
        }
        let replaced = self
            .pattern
            .replace_all(content, NoExpand(&self.replacement));
        (replaced, count)
    }
}

/// The ordered rule table.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<SubstitutionRule>,
}

impl RuleSet {
    /// Generate the rule table for `table`.
    pub fn from_table(table: &CategoryTable) -> Self {
        let entries = table.entries();
        let mut rules = Vec::with_capacity(entries.len() * 3 + 1);

        for (context, op) in [
            (RuleContext::Equality, "==="),
            (RuleContext::Inequality, "!=="),
        ] {
            for entry in entries {
                rules.push(SubstitutionRule::new(
                    context,
                    Some(&entry.key),
                    format!("{} \"{}\"", op, entry.literal),
                    format!("{} {}", op, table.reference(entry)),
                ));
            }
        }

        let literals: Vec<String> = entries
            .iter()
            .map(|e| format!("\"{}\"", e.literal))
            .collect();
        let references: Vec<String> = entries.iter().map(|e| table.reference(e)).collect();
        rules.push(SubstitutionRule::new(
            RuleContext::MembershipList,
            None,
            format!("[{}]", literals.join(", ")),
            format!("[{}]", references.join(", ")),
        ));

        for entry in entries {
            rules.push(SubstitutionRule::new(
                RuleContext::CallArgument,
                Some(&entry.key),
                format!("(\"{}\")", entry.literal),
                format!("({})", table.reference(entry)),
            ));
        }

        RuleSet { rules }
    }

    /// Rules in application order.
    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
