// 🏷️ Rank Classification - Rules as Data
// Maps free-text job titles to hierarchy levels with an ordered keyword table

use crate::models::Employee;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

// ============================================================================
// LEVEL
// ============================================================================

/// Organizational rank: 1 is the top of the pyramid, higher numbers sit lower
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(pub u32);

impl Level {
    pub const TOP: Level = Level(1);
    pub const INTERN: Level = Level(7);

    /// Sentinel for titles no keyword matched
    pub const UNRANKED: Level = Level(999);

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_ranked(self) -> bool {
        self != Level::UNRANKED
    }

    /// Heading shown above a level in rendered charts
    pub fn label(self) -> String {
        if self.is_ranked() {
            format!("Level {}", self.0)
        } else {
            "Unranked".to_string()
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRule {
    /// Level assigned when any keyword matches
    pub level: Level,

    /// Keywords, matched as case-insensitive substrings
    pub keywords: Vec<String>,
}

impl RankRule {
    pub fn new(level: u32, keywords: &[&str]) -> Self {
        RankRule {
            level: Level(level),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Check a lower-cased title against this rule's keywords
    fn matches(&self, title_lower: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| title_lower.contains(keyword.as_str()))
    }
}

/// Canonical table, most senior first. Order is priority: first match wins.
fn standard_rules() -> Vec<RankRule> {
    vec![
        RankRule::new(1, &["chief executive officer", "ceo", "founder", "president"]),
        RankRule::new(2, &["cto", "cfo", "coo", "vice president"]),
        RankRule::new(3, &["director"]),
        RankRule::new(4, &["manager", "team lead", "head of"]),
        RankRule::new(5, &["senior"]),
        RankRule::new(6, &["junior", "associate"]),
        RankRule::new(7, &["intern"]),
    ]
}

// ============================================================================
// RANK CLASSIFIER
// ============================================================================

#[derive(Debug, Clone)]
pub struct RankClassifier {
    rules: Vec<RankRule>,
}

impl RankClassifier {
    /// Shared classifier over the canonical table, built once per process
    pub fn standard() -> &'static RankClassifier {
        static STANDARD: OnceLock<RankClassifier> = OnceLock::new();
        STANDARD.get_or_init(|| RankClassifier::from_rules(standard_rules()))
    }

    /// Create classifier from an ordered list of rules
    pub fn from_rules(rules: Vec<RankRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| RankRule {
                level: rule.level,
                keywords: rule
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();

        RankClassifier { rules }
    }

    /// Load an ordered rule table from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rank rules file: {:?}", path.as_ref()))?;

        let rules: Vec<RankRule> =
            serde_json::from_str(&content).context("Failed to parse rank rules JSON")?;

        for rule in &rules {
            if rule.level.value() == 0 || !rule.level.is_ranked() {
                bail!("Rank rule level must be between 1 and 998, got {}", rule.level);
            }
        }

        Ok(RankClassifier::from_rules(rules))
    }

    /// Level for a title; never fails, unmatched titles get `Level::UNRANKED`
    pub fn classify(&self, title: &str) -> Level {
        let title_lower = title.to_lowercase();

        self.rules
            .iter()
            .find(|rule| rule.matches(&title_lower))
            .map(|rule| rule.level)
            .unwrap_or(Level::UNRANKED)
    }

    pub fn classify_opt(&self, title: Option<&str>) -> Level {
        self.classify(title.unwrap_or(""))
    }

    /// Overwrite every employee's level from their title
    pub fn assign_levels(&self, employees: &mut [Employee]) {
        for employee in employees.iter_mut() {
            employee.level = Some(self.classify(&employee.title));
        }
    }

    pub fn rules(&self) -> &[RankRule] {
        &self.rules
    }

    /// Get number of rules loaded
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for RankClassifier {
    fn default() -> Self {
        RankClassifier::standard().clone()
    }
}

// ============================================================================
// TESTS
// ============================================================================
