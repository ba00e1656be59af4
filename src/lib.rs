// Company Pyramid - Core Library
// Title ranking, hierarchy layout and rendering for scraped company rosters

pub mod config;
pub mod models;
pub mod rank;        // Title -> level classification
pub mod hierarchy;   // Supervision forest + level grid
pub mod render;
pub mod export;
pub mod workspace;
pub mod pipeline;

// Re-export commonly used types
pub use config::RunOptions;
pub use models::{Company, CompanyNetwork, Employee};
pub use rank::{Level, RankClassifier, RankRule};
pub use hierarchy::{
    build_graph, group_by_level, sort_for_graph, sort_for_grid,
    GraphEdge, GraphNode, HierarchyGraph, RosterEntry,
};
pub use render::{OrgChartRenderer, PyramidOutput, PyramidRenderer};
pub use export::write_employees_csv;
pub use workspace::{company_from_input, company_from_json_path, OutputWorkspace};
pub use pipeline::{Pipeline, PipelineReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
