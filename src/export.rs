// 📄 CSV Export - employee roster as a flat table
// Photo path, split name, job title and computed level per employee

use crate::config::{EMPLOYEES_CSV, GENERIC_USER_IMAGE, IMAGES_DIR};
use crate::models::Employee;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const CSV_HEADERS: [&str; 5] = ["Photo Path", "First Name", "Last Name", "Job Title", "Level"];

/// Columns follow `CSV_HEADERS`
#[derive(Debug, Serialize)]
struct EmployeeRow<'a> {
    photo_path: String,
    first_name: &'a str,
    last_name: &'a str,
    job_title: &'a str,
    level: String,
}

/// Letters and digits kept, everything else becomes `_`
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Write the generic avatar for `name`; returns the path relative to `output_dir`
fn write_generic_avatar(output_dir: &Path, name: &str) -> Result<String> {
    let file_name = format!("generic_{}.svg", sanitize_file_name(name));
    let path = output_dir.join(IMAGES_DIR).join(&file_name);

    fs::write(&path, GENERIC_USER_IMAGE)
        .with_context(|| format!("Failed to write generic avatar: {:?}", path))?;

    Ok(format!("{IMAGES_DIR}/{file_name}"))
}

/// Write `employees.csv` into `output_dir`
///
/// Employees without a usable photo get a generic avatar under `images/`.
pub fn write_employees_csv(employees: &[Employee], output_dir: &Path) -> Result<PathBuf> {
    let images_dir = output_dir.join(IMAGES_DIR);
    fs::create_dir_all(&images_dir)
        .with_context(|| format!("Failed to create images directory: {:?}", images_dir))?;

    let csv_path = output_dir.join(EMPLOYEES_CSV);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(&csv_path)
        .with_context(|| format!("Failed to create CSV file: {:?}", csv_path))?;

    // Header written up front so an empty roster still yields a valid file
    writer
        .write_record(CSV_HEADERS)
        .context("Failed to write CSV header")?;

    for employee in employees {
        let photo_path = match employee.photo() {
            Some(url) => url.to_string(),
            None => {
                tracing::warn!(name = %employee.name, "No image URL, using generic image");
                write_generic_avatar(output_dir, &employee.name)?
            }
        };

        let (first_name, last_name) = employee.split_name();

        writer
            .serialize(EmployeeRow {
                photo_path,
                first_name,
                last_name,
                job_title: &employee.title,
                level: employee.level.map(|l| l.to_string()).unwrap_or_default(),
            })
            .context("Failed to write employee row")?;
    }

    writer.flush().context("Failed to flush CSV file")?;

    tracing::info!(path = %csv_path.display(), rows = employees.len(), "CSV file created");
    Ok(csv_path)
}
