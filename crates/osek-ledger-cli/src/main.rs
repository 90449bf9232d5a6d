mod commands;
mod input;
mod output;
mod store;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process;

use osek_ledger_core::clock::RealClock;

use commands::analysis::{MonthlyArgs, RecommendArgs};
use commands::ledger::{DepositArgs, InitArgs, SetNiArgs, UpdateArgs};
use commands::settings::SettingsArgs;
use commands::simulation::SetMonthArgs;
use commands::tax::{IncomeTaxArgs, NationalInsuranceArgs};
use commands::Context;
use store::StateStore;

/// Bookkeeping and tax planning for a VAT-exempt self-employed business
#[derive(Parser)]
#[command(
    name = "osek",
    version,
    about = "Bookkeeping and tax planning for a VAT-exempt self-employed business",
    long_about = "Keeps a yearly ledger of income, expenses and pension / study-fund \
                  deposits, and computes income tax, national insurance, deductible \
                  caps and deposit recommendations with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to the ledger state document
    #[arg(long, env = "OSEK_STATE_FILE", default_value = "state.json", global = true)]
    state: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Full year-to-date analysis: totals, caps, suggestions, tax and NI
    Analyze,
    /// Suggested deposits for this month
    Recommend(RecommendArgs),
    /// Tax and NI estimate for a single month
    Monthly(MonthlyArgs),
    /// Year-end projection from the year-to-date average
    Projection,
    /// December top-up amounts that max out the deductible caps
    Optimizer,
    /// Add amounts to a month, e.g. `update income=1000 expenses=200`
    Update(UpdateArgs),
    /// Record pension and/or study-fund deposits
    Deposit(DepositArgs),
    /// Record the national insurance already paid this year
    SetNi(SetNiArgs),
    /// Pin the ledger to a simulated month, or `off` to use the real clock
    SetMonth(SetMonthArgs),
    /// Advance the simulated month by one
    NextMonth,
    /// Show or replace the settings block
    Settings(SettingsArgs),
    /// Calculate income tax on an annual income
    IncomeTax(IncomeTaxArgs),
    /// Calculate national insurance on a monthly income
    NationalInsurance(NationalInsuranceArgs),
    /// Create a new state document
    Init(InitArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
    Yaml,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let ctx = Context::new(StateStore::new(cli.state), Box::new(RealClock));

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze => commands::analysis::run_analyze(&ctx),
        Commands::Recommend(args) => commands::analysis::run_recommend(&ctx, args),
        Commands::Monthly(args) => commands::analysis::run_monthly(&ctx, args),
        Commands::Projection => commands::analysis::run_projection(&ctx),
        Commands::Optimizer => commands::analysis::run_optimizer(&ctx),
        Commands::Update(args) => commands::ledger::run_update(&ctx, args),
        Commands::Deposit(args) => commands::ledger::run_deposit(&ctx, args),
        Commands::SetNi(args) => commands::ledger::run_set_ni(&ctx, args),
        Commands::SetMonth(args) => commands::simulation::run_set_month(&ctx, args),
        Commands::NextMonth => commands::simulation::run_next_month(&ctx),
        Commands::Settings(args) => commands::settings::run_settings(&ctx, args),
        Commands::IncomeTax(args) => commands::tax::run_income_tax(&ctx, args),
        Commands::NationalInsurance(args) => commands::tax::run_national_insurance(&ctx, args),
        Commands::Init(args) => commands::ledger::run_init(&ctx, args),
        Commands::Version => {
            println!("osek {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
