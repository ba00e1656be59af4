// 🏢 Company Network Models
// Employee and company records as handed over by the scraper (JSON)

use crate::config::BLANK_PHOTO_PREFIX;
use crate::rank::Level;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// Scrapers emit `null` for fields they could not read
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// EMPLOYEE
// ============================================================================

/// One member of the employee roster
///
/// `name` and `title` may be empty; display helpers substitute placeholders.
/// `level` is always derived from `title` and overwritten on every run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,

    /// Computed hierarchy level; any level in the input is ignored
    #[serde(skip_deserializing)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
}

impl Employee {
    pub fn new(name: &str, title: &str) -> Self {
        Employee {
            name: name.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    /// Builder pattern: add profile URL
    pub fn with_profile_url(mut self, url: &str) -> Self {
        self.profile_url = Some(url.to_string());
        self
    }

    /// Builder pattern: add photo URL
    pub fn with_photo_url(mut self, url: &str) -> Self {
        self.photo_url = Some(url.to_string());
        self
    }

    /// Builder pattern: set level directly
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Level, or the unranked sentinel when classification has not run
    pub fn level(&self) -> Level {
        self.level.unwrap_or(Level::UNRANKED)
    }

    /// Name for display; `index` is the zero-based position in the roster
    pub fn display_name(&self, index: usize) -> String {
        if self.name.trim().is_empty() {
            format!("Employee {}", index + 1)
        } else {
            self.name.clone()
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Unknown"
        } else {
            &self.title
        }
    }

    /// Photo URL worth rendering, skipping empty values and the blank pixel
    pub fn photo(&self) -> Option<&str> {
        self.photo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty() && !url.starts_with(BLANK_PHOTO_PREFIX))
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Split into (first, last) on the first space
    pub fn split_name(&self) -> (&str, &str) {
        let name = self.name.trim();
        match name.split_once(' ') {
            Some((first, last)) => (first, last.trim()),
            None => (name, ""),
        }
    }
}

// ============================================================================
// COMPANY
// ============================================================================

/// Company profile, passed through to the renderers untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// Scraper output: the company plus its employee roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyNetwork {
    #[serde(default)]
    pub company: Company,

    #[serde(default)]
    pub employees: Vec<Employee>,
}

impl CompanyNetwork {
    /// Load a network from the scraper's JSON document
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read company data: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse company data JSON")
    }

    /// Company name, falling back to `fallback` when the profile has none
    pub fn company_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.company.name.trim().is_empty() {
            fallback
        } else {
            &self.company.name
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scraper_document() {
        let json = r#"{
            "company": {"name": "Acme", "description": "Widgets", "logo_url": "https://x/logo.png"},
            "employees": [
                {"name": "Alice Smith", "title": "CEO", "profile_url": "https://x/alice"},
                {"title": "Intern"},
                {"name": "Bob", "hierarchy_level": 4}
            ]
        }"#;

        let network = CompanyNetwork::from_json(json).unwrap();

        assert_eq!(network.company.name, "Acme");
        assert_eq!(network.employees.len(), 3);
        assert_eq!(network.employees[1].name, "");
        assert_eq!(network.employees[2].title, "");
        assert_eq!(network.employees[2].level, None);
    }

    #[test]
    fn test_stale_levels_in_input_are_ignored() {
        let json = r#"{"employees": [
            {"name": "A", "title": "CEO", "level": 3, "hierarchy_level": 5},
            {"name": "B", "title": "Intern", "level": "1"},
            {"name": "C", "level": null, "hierarchy_level": [1]}
        ]}"#;

        let network = CompanyNetwork::from_json(json).unwrap();

        assert_eq!(network.employees.len(), 3);
        assert!(network.employees.iter().all(|e| e.level.is_none()));
        assert_eq!(network.employees[1].title, "Intern");
    }

    #[test]
    fn test_null_fields_become_empty() {
        let json = r#"{"company": {"name": null}, "employees": [{"name": null, "title": null}]}"#;

        let network = CompanyNetwork::from_json(json).unwrap();

        assert_eq!(network.company.name, "");
        assert_eq!(network.employees[0], Employee::default());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let network = CompanyNetwork::from_json("{}").unwrap();

        assert!(network.employees.is_empty());
        assert_eq!(network.company_name_or("fallback"), "fallback");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(CompanyNetwork::from_json("not json").is_err());
    }

    #[test]
    fn test_display_placeholders() {
        let employee = Employee::new("", "  ");

        assert_eq!(employee.display_name(0), "Employee 1");
        assert_eq!(employee.display_name(4), "Employee 5");
        assert_eq!(employee.display_title(), "Unknown");
        assert_eq!(employee.level(), Level::UNRANKED);
    }

    #[test]
    fn test_photo_skips_blank_pixel() {
        let blank = Employee::new("A", "B").with_photo_url("data:image/gif;base64,R0lGOD");
        let empty = Employee::new("A", "B").with_photo_url("");
        let real = Employee::new("A", "B").with_photo_url("https://media/a.jpg");

        assert_eq!(blank.photo(), None);
        assert_eq!(empty.photo(), None);
        assert_eq!(real.photo(), Some("https://media/a.jpg"));
    }

    #[test]
    fn test_split_name() {
        assert_eq!(Employee::new("Ada Lovelace King", "").split_name(), ("Ada", "Lovelace King"));
        assert_eq!(Employee::new("Plato", "").split_name(), ("Plato", ""));
        assert_eq!(Employee::new("", "").split_name(), ("", ""));
    }
}
