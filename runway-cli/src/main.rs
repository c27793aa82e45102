use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use runway_core::time::today_in;
use runway_finance::pipeline::error_kind;
use runway_finance::pocketsmith::DEFAULT_BASE_URL;
use runway_finance::steps;
use runway_finance::{refresh, PocketsmithClient, RunContext, RunReport, StepStatus};
use runway_sheets::schema::ALL_TABS;
use runway_sheets::CsvWorkbook;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};

mod config;
mod logging;
mod state;

use config::{init_config, load_config, load_settings, mask_secret, Settings};

#[derive(Parser, Debug)]
#[command(name = "runway", version, about = "Financial runway from PocketSmith data")]
struct Cli {
    /// Config file (default: ~/.runway/config.toml)
    #[arg(long, global = true, env = "RUNWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Workbook directory, overriding config
    #[arg(long, global = true)]
    workbook: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every step: accounts, mandatory spending, runway, history
    Refresh,

    /// Fetch and classify accounts; rewrite the account tabs
    Accounts,

    /// Fetch the trailing year of debits; rewrite "Mandatory Spending"
    Spending,

    /// Recompute runway from the current account and spending tabs
    Runway,

    /// Record today's runway in "Runway History"
    History,

    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Show the resolved settings (secrets masked)
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config_path = match &cli.config {
        Some(p) => p.clone(),
        None => state::default_config_path()?,
    };

    if let Command::Config { command } = &cli.command {
        return match command {
            ConfigCommand::Init => init_config(&config_path),
            ConfigCommand::Show => show_config(&config_path, cli.workbook.clone()),
        };
    }

    let settings = load_settings(&config_path, cli.workbook.clone())?;
    let today = today_in(settings.timezone);
    info!(%today, workbook = %settings.workbook_dir.display(), "runway starting");
    let mut wb = CsvWorkbook::open(&settings.workbook_dir)?;

    match cli.command {
        Command::Refresh => {
            let client = client(&settings)?;
            let ctx = RunContext {
                rules: settings.rules.clone(),
                spend: settings.spend.clone(),
                today,
            };
            let report = refresh(&client, &mut wb, &ctx).await?;
            if cli.json {
                print_json(&report)?;
            } else {
                print_report(&report, &settings);
            }
            if !report.is_success() {
                for failed in report.failures() {
                    error!(step = %failed.step, status = ?failed.status, "refresh step failed");
                }
                bail!("{} step(s) failed", report.failures().count());
            }
        }

        Command::Accounts => {
            let client = client(&settings)?;
            let out = steps::update_accounts(&client, &mut wb, &settings.rules).await?;
            if cli.json {
                print_json(&out)?;
            } else {
                println!("Classified {} accounts\n", out.accounts.len());
                for a in &out.accounts {
                    println!("{:<40} {:>14.2}  {}", a.title, a.balance, a.type_label());
                }
                println!();
                for s in &out.by_type {
                    println!("{:<16} {:>14.2}", s.account_type, s.total_balance);
                }
            }
        }

        Command::Spending => {
            let client = client(&settings)?;
            let out =
                steps::update_mandatory_spending(&client, &mut wb, &settings.spend, today).await?;
            if cli.json {
                print_json(&out)?;
            } else {
                println!("Fetched {} transactions", out.transactions);
                if let Some(reason) = &out.stopped_early {
                    println!("Warning: retrieval stopped early ({reason})");
                }
                println!();
                for r in out.spend.rows() {
                    println!("{:<48} {:>12.2}", r.label, r.annual_amount);
                }
            }
        }

        Command::Runway => {
            let result = steps::update_runway(&mut wb, today).map_err(|e| {
                let kind = error_kind(&e);
                e.context(format!("runway calculation failed ({kind})"))
            })?;
            if cli.json {
                print_json(&result)?;
            } else {
                println!("Runway (Days)   {}", result.days);
                println!("Runway (Years)  {}", result.years_display());
                println!("Last Until      {}", result.exhaustion_date);
            }
        }

        Command::History => {
            let out = steps::update_history(&mut wb, today).map_err(|e| {
                let kind = error_kind(&e);
                e.context(format!("runway history update failed ({kind})"))
            })?;
            if cli.json {
                print_json(&out)?;
            } else {
                println!(
                    "Recorded {}: {} days (until {}); {} entries",
                    out.snapshot_date, out.runway_days, out.exhaustion_date, out.entries
                );
                if out.dropped > 0 {
                    println!("Dropped {} unreadable history rows", out.dropped);
                }
            }
        }

        Command::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}

fn client(settings: &Settings) -> Result<PocketsmithClient> {
    let credentials = settings.credentials()?;
    Ok(PocketsmithClient::new(credentials, settings.base_url.as_deref()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serialize output")?);
    Ok(())
}

fn print_report(report: &RunReport, settings: &Settings) {
    println!("# Refresh for {}\n", report.run_date);
    println!("Workbook: {}\n", settings.workbook_dir.display());

    for s in &report.steps {
        match &s.status {
            StepStatus::Ok => println!("[ok]     {}", s.step),
            StepStatus::Failed { kind, message } => {
                println!("[failed] {} ({kind}): {message}", s.step)
            }
        }
    }

    if let Some(accounts) = &report.accounts {
        println!("\n## Accounts by type\n");
        for s in &accounts.by_type {
            println!("- {:<16} ${:.2}", s.account_type, s.total_balance);
        }
    }

    if let Some(spending) = &report.spending {
        println!("\n## Mandatory spending\n");
        println!("- transactions: {}", spending.transactions);
        println!("- annual total: ${:.2}", spending.spend.grand_total);
        println!("- daily:        ${:.2}", spending.spend.daily());
        if let Some(reason) = &spending.stopped_early {
            println!("- warning: retrieval stopped early ({reason})");
        }
    }

    if let Some(r) = &report.runway {
        println!("\n## Runway\n");
        println!(
            "- {} days ({} years), lasts until {}",
            r.days,
            r.years_display(),
            r.exhaustion_date
        );
    }

    if let Some(h) = &report.history {
        println!("\n## History\n");
        println!("- {} snapshots recorded", h.entries);
    }
}

fn show_config(path: &std::path::Path, workbook: Option<PathBuf>) -> Result<()> {
    let exists = path.exists();
    let mut cfg = load_config(path)?;
    cfg.apply_env(|k| std::env::var(k).ok());
    let api_key = cfg.pocketsmith.api_key.clone();
    let settings = cfg.resolve(workbook)?;

    let note = if exists { "" } else { " (not found, using defaults)" };
    println!("Config file: {}{note}", path.display());
    let masked = api_key.as_deref().map(mask_secret);
    println!("API key:     {}", masked.as_deref().unwrap_or("(missing)"));
    println!("User id:     {}", settings.user_id.as_deref().unwrap_or("(missing)"));
    let base_url = settings.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    println!("Base URL:    {base_url}");
    println!("Workbook:    {}", settings.workbook_dir.display());
    println!("Time zone:   {}", settings.timezone);
    println!("Categories:  {}", settings.spend.categories.join(", "));
    for m in &settings.spend.manual_estimates {
        println!("Estimate:    {} = {:.2}", m.label, m.amount);
    }

    let wb = CsvWorkbook::open(&settings.workbook_dir)?;
    println!("\nTabs in {}:", wb.dir().display());
    for tab in &ALL_TABS {
        let state = if wb.tab_path(tab.name).exists() { "present" } else { "missing" };
        println!("  {:<24} {state}", tab.name);
    }
    Ok(())
}
