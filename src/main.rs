use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use company_pyramid::config::DEFAULT_LOG_FILE;
use company_pyramid::{
    company_from_input, company_from_json_path, CompanyNetwork, OutputWorkspace, Pipeline,
    PyramidOutput, RunOptions,
};

#[derive(Parser, Debug)]
#[command(
    name = "company-pyramid",
    about = "Rank a company's employees by title and render hierarchy pyramids",
    version
)]
struct Cli {
    /// Scraper export (`<company>_linkedin_data.json`)
    #[arg(value_name = "JSON")]
    json: PathBuf,

    /// Company name or LinkedIn company URL (defaults to the JSON file name)
    #[arg(long, value_name = "NAME_OR_URL")]
    company: Option<String>,

    /// Create the Graphviz hierarchy pyramid
    #[arg(long, default_value_t = false)]
    create_pyramid: bool,

    /// Create the interactive HTML hierarchy pyramid
    #[arg(long, default_value_t = false)]
    create_html_pyramid: bool,

    /// Start a new output directory even if one exists
    #[arg(long, default_value_t = false)]
    force: bool,

    /// JSON rank rules replacing the built-in title table
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Where company output directories are created
    #[arg(long, value_name = "DIR", default_value = ".")]
    base_dir: PathBuf,

    /// Log file (RUST_LOG controls verbosity, default info)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

fn init_logging(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file: {:?}", log_file))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    if let Err(e) = run(cli) {
        tracing::error!("{e:#}");
        return Err(e);
    }

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    if !cli.json.is_file() {
        bail!("Specified JSON file does not exist: {:?}", cli.json);
    }

    let company_name = match &cli.company {
        Some(input) => company_from_input(input)
            .with_context(|| format!("Invalid LinkedIn company URL or name: {input}"))?,
        None => company_from_json_path(&cli.json),
    };

    println!("📂 Loading {}...", cli.json.display());
    let network = CompanyNetwork::load(&cli.json)?;
    println!("✓ Loaded {} employees", network.employees.len());

    let today = chrono::Local::now().date_naive();
    let workspace = OutputWorkspace::prepare(&cli.base_dir, &company_name, cli.force, today)?;
    if workspace.reused {
        println!("Using cached data from {}", workspace.root.display());
    } else {
        println!("Saving output in {}", workspace.root.display());
    }

    let mut options = RunOptions::default();
    if cli.create_pyramid {
        options = options.with_pyramid();
    }
    if cli.create_html_pyramid {
        options = options.with_html_pyramid();
    }
    if let Some(rules) = cli.rules {
        options = options.with_rules(rules);
    }

    let pipeline = Pipeline::new(options)?;
    let report = pipeline.run(network, &company_name, &workspace.root)?;

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", report.summary());
    if let Some(path) = &report.csv_path {
        println!("✓ CSV: {}", path.display());
    }
    match &report.pyramid {
        Some(PyramidOutput::Png(path)) => println!("✓ Pyramid: {}", path.display()),
        Some(PyramidOutput::DotOnly(path)) => {
            println!("⚠️  Graphviz not found, pyramid source only: {}", path.display())
        }
        None => {}
    }
    if let Some(path) = &report.html_path {
        println!("✓ HTML: {}", path.display());
    }
    for failure in &report.failures {
        eprintln!("❌ {failure}");
    }

    Ok(())
}
