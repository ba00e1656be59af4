//! Renderers for the two hierarchy views: Graphviz pyramid and HTML org chart.

pub mod dot;
pub mod html;

pub use dot::{graph_to_dot, DotBuilder, PyramidOutput, PyramidRenderer};
pub use html::{generic_avatar_src, OrgChartRenderer};
