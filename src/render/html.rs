//! Interactive HTML org chart rendered with Liquid.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use crate::config::{GENERIC_USER_IMAGE, HTML_SUFFIX};
use crate::hierarchy::RosterEntry;
use crate::models::Company;
use crate::rank::Level;
use crate::workspace::sanitize_component;

const ORG_CHART_TEMPLATE: &str = include_str!("../../templates/org_chart.html.liquid");

/// Inline data URI for the generic avatar
pub fn generic_avatar_src() -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(GENERIC_USER_IMAGE.as_bytes())
    )
}

// ============================================================================
// TEMPLATE CONTEXT
// ============================================================================

#[derive(Debug, Serialize)]
struct ChartContext<'a> {
    company: CompanyView<'a>,
    levels: Vec<LevelView>,
}

#[derive(Debug, Serialize)]
struct CompanyView<'a> {
    name: &'a str,
    description: &'a str,
    logo_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct LevelView {
    level: u32,
    label: String,
    employees: Vec<CardView>,
}

#[derive(Debug, Serialize)]
struct CardView {
    name: String,
    title: String,
    profile_url: Option<String>,
    photo_src: String,
}

fn build_context<'a>(
    company: &'a Company,
    groups: &BTreeMap<Level, Vec<RosterEntry>>,
) -> ChartContext<'a> {
    let avatar = generic_avatar_src();

    let levels = groups
        .iter()
        .map(|(level, members)| LevelView {
            level: level.value(),
            label: level.label(),
            employees: members
                .iter()
                .map(|entry| CardView {
                    name: entry.display_name(),
                    title: entry.employee.display_title().to_string(),
                    profile_url: entry.employee.profile().map(str::to_string),
                    photo_src: entry
                        .employee
                        .photo()
                        .map(str::to_string)
                        .unwrap_or_else(|| avatar.clone()),
                })
                .collect(),
        })
        .collect();

    ChartContext {
        company: CompanyView {
            name: &company.name,
            description: &company.description,
            logo_url: company.logo_url.as_deref().filter(|url| !url.trim().is_empty()),
        },
        levels,
    }
}

// ============================================================================
// RENDERER
// ============================================================================

pub struct OrgChartRenderer {
    template: liquid::Template,
}

impl OrgChartRenderer {
    pub fn new() -> Result<Self> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| anyhow!("Failed to build template parser: {e}"))?;

        let template = parser
            .parse(ORG_CHART_TEMPLATE)
            .map_err(|e| anyhow!("Failed to parse org chart template: {e}"))?;

        Ok(OrgChartRenderer { template })
    }

    /// Render the chart to a string; `groups` comes from `group_by_level`
    pub fn render_to_string(
        &self,
        company: &Company,
        groups: &BTreeMap<Level, Vec<RosterEntry>>,
    ) -> Result<String> {
        let context = build_context(company, groups);
        let globals = liquid::to_object(&context)
            .map_err(|e| anyhow!("Failed to build template context: {e}"))?;

        self.template
            .render(&globals)
            .map_err(|e| anyhow!("Failed to render org chart: {e}"))
    }

    /// Write `<company>_pyramid.html` into `output_dir`
    pub fn render(
        &self,
        company: &Company,
        groups: &BTreeMap<Level, Vec<RosterEntry>>,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let html = self.render_to_string(company, groups)?;
        let name = if company.name.trim().is_empty() {
            "company"
        } else {
            company.name.as_str()
        };
        let path = output_dir.join(format!("{}{}", sanitize_component(name), HTML_SUFFIX));

        fs::write(&path, html).with_context(|| format!("Failed to write HTML chart: {:?}", path))?;

        tracing::info!(path = %path.display(), "HTML company hierarchy pyramid created");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::group_by_level;
    use crate::models::Employee;

    fn company() -> Company {
        Company {
            name: "Acme".to_string(),
            description: "Widgets & gadgets".to_string(),
            logo_url: Some("https://cdn/logo.png".to_string()),
        }
    }

    #[test]
    fn test_missing_photo_uses_generic_avatar() {
        let employees = vec![Employee::new("Solo", "CEO").with_level(Level(1))];
        let renderer = OrgChartRenderer::new().unwrap();

        let html = renderer
            .render_to_string(&company(), &group_by_level(&employees))
            .unwrap();

        assert!(html.contains(&generic_avatar_src()));
        assert!(!html.contains("src=\"\""));
    }

    #[test]
    fn test_levels_rendered_in_order_with_cards() {
        let employees = vec![
            Employee::new("Zed", "Manager")
                .with_level(Level(4))
                .with_profile_url("https://linkedin/in/zed")
                .with_photo_url("https://media/zed.jpg"),
            Employee::new("Amy", "CEO").with_level(Level(1)),
            Employee::new("", "Engineer"),
        ];
        let renderer = OrgChartRenderer::new().unwrap();

        let html = renderer
            .render_to_string(&company(), &group_by_level(&employees))
            .unwrap();

        let level_1 = html.find("Level 1").unwrap();
        let level_4 = html.find("Level 4").unwrap();
        let unranked = html.find("Unranked").unwrap();
        assert!(level_1 < level_4 && level_4 < unranked);

        assert!(html.contains("data-profile=\"https://linkedin/in/zed\""));
        assert!(html.contains("src=\"https://media/zed.jpg\""));
        assert!(html.contains("Employee 3"));
        assert!(html.contains("Widgets &amp; gadgets"));
        assert!(html.contains("class=\"company-logo\""));
    }

    #[test]
    fn test_placeholder_numbered_by_roster_position() {
        let employees = vec![
            Employee::new("Zed", "CEO").with_level(Level(1)),
            Employee::new("", "Founder").with_level(Level(1)),
        ];
        let renderer = OrgChartRenderer::new().unwrap();

        let html = renderer
            .render_to_string(&company(), &group_by_level(&employees))
            .unwrap();

        assert!(html.contains("Employee 2"));
        assert!(!html.contains("Employee 1"));
    }

    #[test]
    fn test_empty_roster_renders_header_only() {
        let renderer = OrgChartRenderer::new().unwrap();

        let html = renderer
            .render_to_string(&company(), &BTreeMap::new())
            .unwrap();

        assert!(html.contains("<h1 class=\"company-name\">Acme</h1>"));
        assert!(!html.contains("class=\"hierarchy-level\""));
    }

    #[test]
    fn test_render_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = OrgChartRenderer::new().unwrap();

        let path = renderer
            .render(&company(), &BTreeMap::new(), dir.path())
            .unwrap();

        assert_eq!(path, dir.path().join("Acme_pyramid.html"));
        assert!(fs::read_to_string(path).unwrap().contains("Acme"));
    }
}
