// 🔄 Pipeline - classify, export and render one company network
// CSV always; pyramid and HTML chart on request

use crate::config::RunOptions;
use crate::export::write_employees_csv;
use crate::hierarchy::{build_graph, group_by_level};
use crate::models::CompanyNetwork;
use crate::rank::{Level, RankClassifier};
use crate::render::{OrgChartRenderer, PyramidOutput, PyramidRenderer};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub employee_count: usize,

    /// Head count per level
    pub level_counts: BTreeMap<Level, usize>,

    pub csv_path: Option<PathBuf>,
    pub pyramid: Option<PyramidOutput>,
    pub html_path: Option<PathBuf>,

    /// Renderer failures, already logged
    pub failures: Vec<String>,
}

impl PipelineReport {
    pub fn summary(&self) -> String {
        let levels: Vec<String> = self
            .level_counts
            .iter()
            .map(|(level, count)| format!("{}: {}", level.label(), count))
            .collect();

        format!(
            "{} employees ({}) | {} artifact failure(s)",
            self.employee_count,
            if levels.is_empty() { "none".to_string() } else { levels.join(", ") },
            self.failures.len()
        )
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

pub struct Pipeline {
    classifier: RankClassifier,
    options: RunOptions,
    pyramid_renderer: PyramidRenderer,
}

impl Pipeline {
    /// Build a pipeline; a custom rules file replaces the built-in table
    pub fn new(options: RunOptions) -> Result<Self> {
        let classifier = match &options.rules_path {
            Some(path) => {
                let classifier = RankClassifier::from_file(path)?;
                tracing::info!(rules = classifier.rule_count(), path = %path.display(), "Loaded custom rank rules");
                classifier
            }
            None => RankClassifier::standard().clone(),
        };

        Ok(Pipeline {
            classifier,
            options,
            pyramid_renderer: PyramidRenderer::new(),
        })
    }

    /// Swap the pyramid renderer (tests use a source-only one)
    pub fn with_pyramid_renderer(mut self, renderer: PyramidRenderer) -> Self {
        self.pyramid_renderer = renderer;
        self
    }

    pub fn classifier(&self) -> &RankClassifier {
        &self.classifier
    }

    pub fn run(
        &self,
        mut network: CompanyNetwork,
        company_name: &str,
        output_dir: &Path,
    ) -> Result<PipelineReport> {
        self.classifier.assign_levels(&mut network.employees);

        let mut report = PipelineReport {
            employee_count: network.employees.len(),
            ..Default::default()
        };
        for employee in &network.employees {
            *report.level_counts.entry(employee.level()).or_default() += 1;
        }
        tracing::debug!(counts = ?report.level_counts, "Levels assigned");

        report.csv_path = Some(write_employees_csv(&network.employees, output_dir)?);

        if self.options.create_pyramid {
            let name = network.company_name_or(company_name);
            let graph = build_graph(&network.employees);
            tracing::debug!(nodes = graph.nodes.len(), edges = graph.edges.len(), "Hierarchy graph built");

            match self.pyramid_renderer.render(&graph, name, output_dir) {
                Ok(output) => report.pyramid = Some(output),
                Err(e) => {
                    tracing::error!("Error creating hierarchy pyramid: {e:#}");
                    report.failures.push(format!("pyramid: {e:#}"));
                }
            }
        }

        if self.options.create_html_pyramid {
            if network.company.name.trim().is_empty() {
                network.company.name = company_name.to_string();
            }
            let groups = group_by_level(&network.employees);

            let rendered = OrgChartRenderer::new()
                .and_then(|renderer| renderer.render(&network.company, &groups, output_dir));
            match rendered {
                Ok(path) => report.html_path = Some(path),
                Err(e) => {
                    tracing::error!("Error creating HTML pyramid: {e:#}");
                    report.failures.push(format!("html: {e:#}"));
                }
            }
        }

        tracing::info!("{}", report.summary());
        Ok(report)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> CompanyNetwork {
        CompanyNetwork::from_json(
            r#"{
                "company": {"name": "Acme", "description": "Widgets"},
                "employees": [
                    {"name": "Dan", "title": "Senior Engineer"},
                    {"name": "Alice", "title": "Founder & CEO", "profile_url": "https://x/alice"},
                    {"name": "Carol", "title": "Engineering Manager"},
                    {"name": "", "title": "Software Engineer"}
                ]
            }"#,
        )
        .unwrap()
    }

    fn pipeline(options: RunOptions) -> Pipeline {
        Pipeline::new(options)
            .unwrap()
            .with_pyramid_renderer(PyramidRenderer::source_only())
    }

    #[test]
    fn test_csv_only_by_default() {
        let dir = tempfile::tempdir().unwrap();

        let report = pipeline(RunOptions::default())
            .run(network(), "acme", dir.path())
            .unwrap();

        assert_eq!(report.employee_count, 4);
        assert_eq!(report.level_counts.get(&Level(1)), Some(&1));
        assert_eq!(report.level_counts.get(&Level::UNRANKED), Some(&1));
        assert!(report.csv_path.as_ref().unwrap().exists());
        assert!(report.pyramid.is_none());
        assert!(report.html_path.is_none());
        assert!(report.is_complete());
    }

    #[test]
    fn test_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let options = RunOptions::default().with_pyramid().with_html_pyramid();

        let report = pipeline(options).run(network(), "acme", dir.path()).unwrap();

        let pyramid = report.pyramid.unwrap();
        assert!(matches!(pyramid, PyramidOutput::DotOnly(_)));
        let dot = std::fs::read_to_string(pyramid.path()).unwrap();
        assert!(dot.contains("0 -> 1;"));
        assert!(dot.contains("1 -> 2;"));
        assert!(dot.contains("2 -> 3;"));

        let html = std::fs::read_to_string(report.html_path.unwrap()).unwrap();
        assert!(html.contains("Level 1"));
        assert!(html.contains("Employee 4"));
    }

    #[test]
    fn test_custom_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let rules = dir.path().join("rules.json");
        std::fs::write(&rules, r#"[{"level": 3, "keywords": ["engineer"]}]"#).unwrap();

        let report = pipeline(RunOptions::default().with_rules(rules))
            .run(network(), "acme", dir.path())
            .unwrap();

        // "Engineering Manager" contains "engineer" too
        assert_eq!(report.level_counts.get(&Level(3)), Some(&3));
        assert_eq!(report.level_counts.get(&Level::UNRANKED), Some(&1));
    }

    #[test]
    fn test_missing_rules_file_is_an_error() {
        let options = RunOptions::default().with_rules(PathBuf::from("/nonexistent/rules.json"));

        assert!(Pipeline::new(options).is_err());
    }

    #[test]
    fn test_summary() {
        let report = PipelineReport::default();

        assert_eq!(report.summary(), "0 employees (none) | 0 artifact failure(s)");
    }
}
