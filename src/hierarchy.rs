// 🔺 Hierarchy Layout Engine
// Turns leveled employees into a supervision forest (pyramid) or a level grid (HTML)

use crate::models::Employee;
use crate::rank::Level;
use serde::Serialize;
use std::collections::BTreeMap;

// ============================================================================
// GRAPH TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    /// Position in level order; also the DOT node id
    pub id: usize,

    /// "name\ntitle" with placeholders for missing values
    pub label: String,

    pub level: Level,
}

/// Directed "supervises" edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub parent: usize,
    pub child: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HierarchyGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl HierarchyGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn parent_of(&self, id: usize) -> Option<usize> {
        self.edges
            .iter()
            .find(|edge| edge.child == id)
            .map(|edge| edge.parent)
    }

    pub fn children_of(&self, id: usize) -> Vec<usize> {
        self.edges
            .iter()
            .filter(|edge| edge.parent == id)
            .map(|edge| edge.child)
            .collect()
    }

    /// Nodes without an incoming edge
    pub fn roots(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .map(|node| node.id)
            .filter(|id| self.parent_of(*id).is_none())
            .collect()
    }

    /// Every node has at most one parent and following parents always terminates
    pub fn is_forest(&self) -> bool {
        let mut parents: Vec<Option<usize>> = vec![None; self.nodes.len()];

        for edge in &self.edges {
            if edge.child >= parents.len() || edge.parent >= parents.len() {
                return false;
            }
            if parents[edge.child].replace(edge.parent).is_some() {
                return false;
            }
        }

        (0..parents.len()).all(|start| {
            let mut current = start;
            for _ in 0..=parents.len() {
                match parents[current] {
                    Some(parent) => current = parent,
                    None => return true,
                }
            }
            false
        })
    }
}

// ============================================================================
// LAYOUT ENGINE
// ============================================================================

/// An employee together with its zero-based position in the input roster
///
/// Placeholder names ("Employee N") are numbered from this position, so the
/// pyramid and the grid agree on who is who.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub index: usize,
    pub employee: Employee,
}

impl RosterEntry {
    pub fn display_name(&self) -> String {
        self.employee.display_name(self.index)
    }

    pub fn level(&self) -> Level {
        self.employee.level()
    }
}

/// Stable sort by level; equal levels keep roster order
pub fn sort_for_graph(employees: &[Employee]) -> Vec<(usize, &Employee)> {
    let mut sorted: Vec<(usize, &Employee)> = employees.iter().enumerate().collect();
    sorted.sort_by_key(|(_, employee)| employee.level());
    sorted
}

/// Sort by (level, name) for the grid view
pub fn sort_for_grid(employees: &[Employee]) -> Vec<RosterEntry> {
    let mut sorted: Vec<RosterEntry> = employees
        .iter()
        .enumerate()
        .map(|(index, employee)| RosterEntry {
            index,
            employee: employee.clone(),
        })
        .collect();
    sorted.sort_by(|a, b| {
        a.level()
            .cmp(&b.level())
            .then_with(|| a.employee.name.cmp(&b.employee.name))
    });
    sorted
}

/// Build the supervision forest
///
/// Each employee hangs under the most recently processed node of the nearest
/// occupied level above its own. Empty intermediate levels are skipped, and
/// employees with no occupied level above them become roots.
pub fn build_graph(employees: &[Employee]) -> HierarchyGraph {
    let sorted = sort_for_graph(employees);
    let mut graph = HierarchyGraph::default();

    // Scratch state for this call only: level -> last node assigned to it
    let mut last_at_level: BTreeMap<Level, usize> = BTreeMap::new();

    for (id, (index, employee)) in sorted.into_iter().enumerate() {
        let level = employee.level();

        graph.nodes.push(GraphNode {
            id,
            label: format!("{}\n{}", employee.display_name(index), employee.display_title()),
            level,
        });

        if let Some((_, &parent)) = last_at_level.range(..level).next_back() {
            graph.edges.push(GraphEdge { parent, child: id });
        }

        last_at_level.insert(level, id);
    }

    graph
}

/// Group employees by level, ascending, name-sorted within each level
pub fn group_by_level(employees: &[Employee]) -> BTreeMap<Level, Vec<RosterEntry>> {
    let mut groups: BTreeMap<Level, Vec<RosterEntry>> = BTreeMap::new();

    for entry in sort_for_grid(employees) {
        groups.entry(entry.level()).or_default().push(entry);
    }

    groups
}

// ============================================================================
// TESTS
// ============================================================================
