// Entry point and interactive menu.
//
// - Option [1] loads the transaction CSV and prints diagnostics.
// - Options [2] and [3] change the active platforms and region.
// - Option [4] recomputes the dashboard and writes every report.
// Filters live in the app state; reports are always rebuilt from the
// loaded rows.
use anyhow::Context;
use ca_ranking::config::{load_config, Config};
use ca_ranking::scope::{available_regions, parse_platforms, ALL_REGIONS};
use ca_ranking::types::TransactionRow;
use ca_ranking::{loader, output, reports, util, Dashboard, RegionScope, ScopeFilter, YearPair};
use clap::Parser;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ca-ranking")]
#[command(about = "Revenue rankings and top/flop reports for cooperative members")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./ca-ranking.toml, then built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Transaction CSV to load
    #[arg(short, long)]
    input: Option<String>,

    /// Directory for generated reports
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        data: None,
        scope: ScopeFilter::default(),
    })
});

struct AppState {
    data: Option<Vec<TransactionRow>>,
    scope: ScopeFilter,
}

fn state() -> MutexGuard<'static, AppState> {
    APP_STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn prompt(label: &str) -> String {
    print!("{label}: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask whether to go back to the menu after generating reports.
fn prompt_back_to_menu() -> bool {
    loop {
        match prompt("Back to menu (Y/N)").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(path: &str) {
    match loader::load_and_clean(path) {
        Ok((data, report)) => {
            println!(
                "Processing dataset... ({} rows read, {} loaded)",
                util::format_int(report.total_rows),
                util::format_int(report.loaded_rows)
            );
            println!(
                "Note: {} rows skipped (no fiscal year), {} skipped (no member code).",
                util::format_int(report.parse_errors),
                util::format_int(report.missing_member_code)
            );
            if report.defaulted_revenue > 0 {
                println!(
                    "Info: revenue defaulted to 0 for {} rows.",
                    util::format_int(report.defaulted_revenue)
                );
            }
            println!();
            state().data = Some(data);
        }
        Err(e) => {
            tracing::error!("Failed to load {}: {}", path, e);
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

fn handle_platforms() {
    let current: Vec<String> = state().scope.platforms.iter().map(|p| p.to_string()).collect();
    println!("Active platforms: {}", current.join(", "));
    let input = prompt("Platforms (all, or e.g. acr,dca)");
    match parse_platforms(&input) {
        Ok(platforms) => {
            state().scope.platforms = platforms;
            println!("Platforms updated.\n");
        }
        Err(e) => println!("{}\n", e),
    }
}

fn handle_region() {
    let regions = match &state().data {
        Some(data) => available_regions(data),
        None => {
            println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
            return;
        }
    };
    println!("[0] All regions");
    for (i, r) in regions.iter().enumerate() {
        println!("[{}] {}", i + 1, r);
    }
    let choice = prompt("Enter choice");
    let selected = match choice.parse::<usize>() {
        Ok(0) => RegionScope::from_selection(ALL_REGIONS),
        Ok(n) if n <= regions.len() => RegionScope::Only(regions[n - 1].clone()),
        _ => {
            println!("Invalid choice.\n");
            return;
        }
    };
    println!("Region set to {}.\n", selected);
    state().scope.region = selected;
}

fn write_report<T>(dir: &Path, file: &str, title: &str, rows: &[T], preview: usize)
where
    T: serde::Serialize + tabled::Tabled + Clone,
{
    let path = dir.join(file);
    if let Err(e) = output::write_csv(&path, rows) {
        tracing::error!("Write error for {}: {}", path.display(), e);
        eprintln!("Write error: {}", e);
    }
    println!("{}\n", title);
    output::preview_table_rows(rows, preview);
    println!("(Full table exported to {})\n", path.display());
}

fn handle_generate_reports(config: &Config) -> anyhow::Result<()> {
    let (data, scope) = {
        let st = state();
        (st.data.clone(), st.scope.clone())
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return Ok(());
    };

    let years = YearPair {
        year1: config.scope.year1,
        year2: config.scope.year2,
    };
    let dash = Dashboard::compute(&data, &scope, years, config.classifier.fallback);
    let dir = Path::new(&config.output.dir);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;
    let preview = config.output.preview_rows;

    println!("Generating reports...\n");
    write_report(
        dir,
        "members_ranking.csv",
        "Member Ranking",
        &reports::member_ranking_report(&dash),
        preview,
    );
    write_report(
        dir,
        "suppliers.csv",
        "Supplier Performance",
        &reports::supplier_report(&dash.suppliers),
        preview,
    );
    write_report(
        dir,
        "families.csv",
        "Product Family Performance",
        &reports::family_report(&dash.families),
        preview,
    );
    write_report(
        dir,
        "top_revenue.csv",
        "Top 10 Revenue",
        &reports::leaderboard_report(&dash.members.top_revenue),
        preview,
    );
    write_report(
        dir,
        "top_progression.csv",
        "Top 10 Progression",
        &reports::leaderboard_report(&dash.members.top_progression),
        preview,
    );
    write_report(
        dir,
        "top_regression.csv",
        "Top 10 Regression",
        &reports::leaderboard_report(&dash.members.top_regression),
        preview,
    );

    let summary = reports::generate_summary(&dash);
    output::write_json(dir.join("summary.json"), &summary).context("writing summary.json")?;
    println!("Summary Stats (summary.json):");
    println!(
        "{{\"revenue_year1\": {}, \"revenue_year2\": {}, \"progression\": \"{}\"}}\n",
        util::format_number(summary.metrics.revenue_year1, 2),
        util::format_number(summary.metrics.revenue_year2, 2),
        util::format_pct(summary.metrics.progression_pct)
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(input) = cli.input {
        config.input.path = input;
    }
    if let Some(dir) = cli.output_dir {
        config.output.dir = dir;
    }
    state().scope = config.scope_filter();

    loop {
        println!("Select an option:");
        println!("[1] Load the file ({})", config.input.path);
        println!("[2] Select platforms");
        println!("[3] Select region");
        println!("[4] Generate reports");
        println!("[5] Exit\n");
        match prompt("Enter choice").as_str() {
            "1" => handle_load(&config.input.path),
            "2" => handle_platforms(),
            "3" => handle_region(),
            "4" => {
                println!();
                handle_generate_reports(&config)?;
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "5" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1 to 5.\n"),
        }
    }
    Ok(())
}
