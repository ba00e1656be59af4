//! Graphviz output for the hierarchy pyramid.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::config::PYRAMID_SUFFIX;
use crate::hierarchy::HierarchyGraph;
use crate::rank::Level;
use crate::workspace::sanitize_component;

/// Quote-safe label text; newlines become DOT's `\n` line break
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

/// Line-oriented writer for the pyramid's `digraph`
pub struct DotBuilder {
    output: String,
}

impl DotBuilder {
    pub fn new(name: &str) -> Self {
        DotBuilder {
            output: format!("digraph {name} {{\n"),
        }
    }

    fn line(&mut self, statement: std::fmt::Arguments<'_>) -> &mut Self {
        let _ = writeln!(self.output, "  {statement}");
        self
    }

    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        self.line(format_args!("{key}=\"{}\";", escape_label(value)))
    }

    /// Default style applied to every employee box
    pub fn node_style(&mut self, attrs: &str) -> &mut Self {
        self.line(format_args!("node [{attrs}];"))
    }

    pub fn node(&mut self, id: usize, label: &str) -> &mut Self {
        self.line(format_args!("{id}[label=\"{}\"];", escape_label(label)))
    }

    pub fn edge(&mut self, parent: usize, child: usize) -> &mut Self {
        self.line(format_args!("{parent} -> {child};"))
    }

    /// Keep one level's nodes on a single row
    pub fn same_rank(&mut self, ids: &[usize]) -> &mut Self {
        let members: Vec<String> = ids.iter().map(usize::to_string).collect();
        self.line(format_args!("{{ rank=same; {}; }}", members.join("; ")))
    }

    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    pub fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

/// Render a hierarchy graph as DOT text, one row per level.
pub fn graph_to_dot(graph: &HierarchyGraph, company_name: &str) -> String {
    let mut dot = DotBuilder::new("hierarchy");
    dot.attr("label", &format!("{company_name} Hierarchy Pyramid"))
        .attr("labelloc", "t")
        .attr("rankdir", "TB")
        .node_style("shape=box, style=\"rounded,filled\", fillcolor=\"#f5f5f5\", fontname=\"Helvetica\"")
        .blank();

    for node in &graph.nodes {
        dot.node(node.id, &node.label);
    }

    // Nodes arrive in level order, so each level is a contiguous run
    let mut rows: Vec<(Level, Vec<usize>)> = Vec::new();
    for node in &graph.nodes {
        let same_row = rows.last().is_some_and(|(level, _)| *level == node.level);
        if same_row {
            if let Some((_, ids)) = rows.last_mut() {
                ids.push(node.id);
            }
        } else {
            rows.push((node.level, vec![node.id]));
        }
    }
    for (_, ids) in rows.iter().filter(|(_, ids)| ids.len() > 1) {
        dot.same_rank(ids);
    }

    dot.blank();
    for edge in &graph.edges {
        dot.edge(edge.parent, edge.child);
    }

    dot.build()
}

// ============================================================================
// PYRAMID RENDERER
// ============================================================================

/// What the pyramid renderer managed to produce
#[derive(Debug, Clone, PartialEq)]
pub enum PyramidOutput {
    /// Rasterized by Graphviz
    Png(PathBuf),

    /// Graphviz missing; only the DOT source was written
    DotOnly(PathBuf),
}

impl PyramidOutput {
    pub fn path(&self) -> &Path {
        match self {
            PyramidOutput::Png(path) | PyramidOutput::DotOnly(path) => path,
        }
    }
}

pub struct PyramidRenderer {
    dot_binary: Option<PathBuf>,
}

impl PyramidRenderer {
    /// Look up the Graphviz `dot` executable on PATH
    pub fn new() -> Self {
        let dot_binary = which::which("dot").ok();
        if dot_binary.is_none() {
            tracing::warn!("Graphviz 'dot' executable not found in PATH; pyramid will be DOT source only");
        }
        PyramidRenderer { dot_binary }
    }

    /// Renderer that never invokes Graphviz
    pub fn source_only() -> Self {
        PyramidRenderer { dot_binary: None }
    }

    pub fn has_graphviz(&self) -> bool {
        self.dot_binary.is_some()
    }

    pub fn render(
        &self,
        graph: &HierarchyGraph,
        company_name: &str,
        output_dir: &Path,
    ) -> Result<PyramidOutput> {
        let stem = format!("{}{}", sanitize_component(company_name), PYRAMID_SUFFIX);
        let dot_path = output_dir.join(format!("{stem}.dot"));

        fs::write(&dot_path, graph_to_dot(graph, company_name))
            .with_context(|| format!("Failed to write DOT file: {:?}", dot_path))?;

        let Some(binary) = &self.dot_binary else {
            tracing::error!(path = %dot_path.display(), "Graphviz is not installed; PNG pyramid skipped");
            return Ok(PyramidOutput::DotOnly(dot_path));
        };

        let png_path = output_dir.join(format!("{stem}.png"));
        let status = Command::new(binary)
            .arg("-Tpng")
            .arg(&dot_path)
            .arg("-o")
            .arg(&png_path)
            .status()
            .with_context(|| format!("Failed to run Graphviz: {:?}", binary))?;

        if !status.success() {
            bail!("Graphviz exited with {status} while rendering {:?}", dot_path);
        }

        fs::remove_file(&dot_path)
            .with_context(|| format!("Failed to remove DOT file: {:?}", dot_path))?;

        tracing::info!(path = %png_path.display(), "Hierarchy pyramid created");
        Ok(PyramidOutput::Png(png_path))
    }
}

impl Default for PyramidRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_graph;
    use crate::models::Employee;

    fn roster() -> Vec<Employee> {
        vec![
            Employee::new("Alice", "CEO").with_level(Level(1)),
            Employee::new("Bob", "CTO").with_level(Level(2)),
            Employee::new("Carol \"CC\"", "CFO").with_level(Level(2)),
        ]
    }

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label("a\"b\nc\\"), "a\\\"b\\nc\\\\");
    }

    #[test]
    fn test_builder_writes_indented_statements() {
        let mut dot = DotBuilder::new("g");
        dot.attr("label", "Acme \"A\"").node(0, "Ann").edge(0, 1);

        assert_eq!(
            dot.build(),
            "digraph g {\n  label=\"Acme \\\"A\\\"\";\n  0[label=\"Ann\"];\n  0 -> 1;\n}\n"
        );
    }

    #[test]
    fn test_graph_to_dot() {
        let dot = graph_to_dot(&build_graph(&roster()), "Acme");

        assert!(dot.starts_with("digraph hierarchy {"));
        assert!(dot.contains("0[label=\"Alice\\nCEO\"];"));
        assert!(dot.contains("2[label=\"Carol \\\"CC\\\"\\nCFO\"];"));
        assert!(dot.contains("{ rank=same; 1; 2; }"));
        assert!(dot.contains("0 -> 1;"));
        assert!(dot.contains("0 -> 2;"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_empty_graph_is_valid_dot() {
        let dot = graph_to_dot(&HierarchyGraph::default(), "Empty");

        assert!(!dot.contains("->"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_render_without_graphviz_keeps_source() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PyramidRenderer::source_only();

        let output = renderer
            .render(&build_graph(&roster()), "Acme Corp", dir.path())
            .unwrap();

        assert!(!renderer.has_graphviz());
        assert_eq!(
            output,
            PyramidOutput::DotOnly(dir.path().join("Acme_Corp_hierarchy_pyramid.dot"))
        );
        assert!(output.path().exists());
    }
}
