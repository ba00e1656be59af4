// ⚙️ Configuration - constants and run options shared by the CLI and pipeline

use std::path::PathBuf;

/// Generic avatar used wherever an employee has no usable photo
pub const GENERIC_USER_IMAGE: &str = r##"
<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
  <circle cx="50" cy="50" r="50" fill="#e0e0e0"/>
  <circle cx="50" cy="40" r="20" fill="#bdbdbd"/>
  <path d="M50 65 Q50 85 80 85 A40 40 0 0 1 20 85 Q50 85 50 65" fill="#bdbdbd"/>
</svg>
"##;

/// LinkedIn serves this 1x1 pixel when a member hides their photo
pub const BLANK_PHOTO_PREFIX: &str = "data:image/gif;base64,";

pub const IMAGES_DIR: &str = "images";
pub const EMPLOYEES_CSV: &str = "employees.csv";
pub const JSON_SUFFIX: &str = "_linkedin_data";
pub const PYRAMID_SUFFIX: &str = "_hierarchy_pyramid";
pub const HTML_SUFFIX: &str = "_pyramid.html";
pub const DEFAULT_LOG_FILE: &str = "company_pyramid.log";

/// Date format used in output directory names (`acme_2024-05-01`)
pub const DIR_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// RUN OPTIONS
// ============================================================================

/// Which artifacts a pipeline run produces
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Render the Graphviz hierarchy pyramid
    pub create_pyramid: bool,

    /// Render the interactive HTML org chart
    pub create_html_pyramid: bool,

    /// Optional JSON file replacing the built-in rank table
    pub rules_path: Option<PathBuf>,
}

impl RunOptions {
    pub fn with_pyramid(mut self) -> Self {
        self.create_pyramid = true;
        self
    }

    pub fn with_html_pyramid(mut self) -> Self {
        self.create_html_pyramid = true;
        self
    }

    pub fn with_rules(mut self, path: PathBuf) -> Self {
        self.rules_path = Some(path);
        self
    }
}
