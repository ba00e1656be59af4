// 📁 Output Workspace - dated per-company directories
// One directory per company scan: `<company>_<YYYY-MM-DD>/` with an `images/` folder

use crate::config::{DIR_DATE_FORMAT, IMAGES_DIR, JSON_SUFFIX};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// COMPANY NAMES
// ============================================================================

/// Company slug from a LinkedIn company URL or a bare name
///
/// `https://www.linkedin.com/company/acme%20corp/about/` -> `acme-corp`
pub fn company_from_input(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if !(input.starts_with("http://") || input.starts_with("https://")) {
        return Some(input.to_string());
    }

    let path = input
        .splitn(4, '/')
        .nth(3)
        .unwrap_or_default()
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let mut parts = path.split('/');
    parts.find(|part| *part == "company")?;
    parts
        .next()
        .filter(|slug| !slug.is_empty())
        .map(|slug| slug.replace("%20", "-"))
}

/// Company name from a scraper export: `acme_linkedin_data.json` -> `acme`
pub fn company_from_json_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    stem.replace(JSON_SUFFIX, "")
}

/// Make a name safe for use in file and directory names
pub fn sanitize_component(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

// ============================================================================
// OUTPUT WORKSPACE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OutputWorkspace {
    pub root: PathBuf,
    pub images: PathBuf,

    /// True when an earlier scan directory was reused
    pub reused: bool,
}

impl OutputWorkspace {
    /// Reuse the most recent `<company>_<date>` directory under `base`,
    /// or create `<company>_<today>` when none exists or `force` is set
    pub fn prepare(base: &Path, company: &str, force: bool, today: NaiveDate) -> Result<Self> {
        let company = sanitize_component(company);

        if !force {
            if let Some(root) = find_existing(base, &company)? {
                tracing::info!(dir = %root.display(), "Using cached company directory");
                return Self::open(root, true);
            }
        }

        let root = base.join(format!("{}_{}", company, today.format(DIR_DATE_FORMAT)));
        tracing::info!(dir = %root.display(), "Starting a new company directory");
        Self::open(root, false)
    }

    fn open(root: PathBuf, reused: bool) -> Result<Self> {
        let images = root.join(IMAGES_DIR);
        fs::create_dir_all(&images)
            .with_context(|| format!("Failed to create output directory: {:?}", images))?;

        Ok(OutputWorkspace { root, images, reused })
    }
}

/// Latest dated directory for `company` directly under `base`
fn find_existing(base: &Path, company: &str) -> Result<Option<PathBuf>> {
    if !base.is_dir() {
        return Ok(None);
    }

    let prefix = format!("{company}_");
    let mut best: Option<(NaiveDate, PathBuf)> = None;

    let entries = fs::read_dir(base)
        .with_context(|| format!("Failed to list directory: {:?}", base))?;

    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        if !entry.path().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        let Some(date_part) = name.strip_prefix(&prefix) else {
            continue;
        };
        let Ok(date) = NaiveDate::parse_from_str(date_part, DIR_DATE_FORMAT) else {
            continue;
        };

        if best.as_ref().map_or(true, |(current, _)| date > *current) {
            best = Some((date, entry.path()));
        }
    }

    Ok(best.map(|(_, path)| path))
}

// ============================================================================
// TESTS
// ============================================================================
