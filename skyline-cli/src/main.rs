use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use skyline_core::calculations::{AmortizationCalculator, ProjectionCalculator};
use skyline_core::{ConstructionMaterial, ProjectionResult, PropertyType};
use skyline_data::MarketDataError;
use tracing::{debug, info};

use skyline_cli::app::{self, Dashboard};
use skyline_cli::config::Settings;
use skyline_cli::form::{LoanForm, PropertyForm};
use skyline_cli::report::{BatchTable, ProjectionSummary, ScheduleTable};
use skyline_cli::utils::parse_decimal;
use skyline_cli::{csv_loader, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Real-estate valuation dashboard.
///
/// Loads the trained price model once at startup, then values a property,
/// sizes its loan, projects its growth or summarizes the market dataset.
#[derive(Debug, Parser)]
#[command(name = "skyline", version)]
struct Cli {
    /// Settings file. Defaults to `skyline.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `skyline_core=trace`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Model artifact, overriding the settings file.
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Market dataset CSV, overriding the settings file.
    #[arg(long, global = true)]
    market_data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Value a property and summarize its loan.
    Report(ReportArgs),
    /// Compute the monthly installment for a loan.
    Emi {
        #[command(flatten)]
        loan: LoanArgs,

        /// Also print the month-by-month repayment table.
        #[arg(long)]
        schedule: bool,
    },
    /// Compound a present value forward.
    Project {
        /// Present value in rupees.
        #[arg(long, value_parser = parse_decimal)]
        value: Decimal,

        /// Annual growth percent. Defaults to the configured rate.
        #[arg(long, value_parser = parse_decimal)]
        growth: Option<Decimal>,

        /// Horizon in years. Defaults to the configured horizon.
        #[arg(long)]
        years: Option<i32>,
    },
    /// Summarize the historical market dataset.
    Market,
    /// Value every property in a CSV file.
    Batch {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// `house` or `apartment`.
    #[arg(long = "type", default_value = "house", value_parser = parse_property_type)]
    property_type: PropertyType,

    /// Construction date, `YYYY-MM-DD`.
    #[arg(long)]
    built: Option<NaiveDate>,

    #[arg(long)]
    plot_area: Option<f64>,

    #[arg(long)]
    floors: Option<f64>,

    #[arg(long)]
    carpet_area: Option<f64>,

    #[arg(long)]
    balcony_area: Option<f64>,

    #[arg(long)]
    bedrooms: Option<u32>,

    /// Distance to the city centre in km.
    #[arg(long)]
    distance: Option<f64>,

    /// `rcc`, `steel` or `brick`.
    #[arg(long, default_value = "rcc", value_parser = parse_material)]
    material: ConstructionMaterial,

    #[command(flatten)]
    loan: LoanArgs,
}

impl ReportArgs {
    fn form(&self) -> PropertyForm {
        let defaults = PropertyForm::default();
        PropertyForm {
            property_type: self.property_type,
            construction_date: self.built.unwrap_or(defaults.construction_date),
            plot_area: self.plot_area.unwrap_or(defaults.plot_area),
            floors: self.floors.unwrap_or(defaults.floors),
            carpet_area: self.carpet_area.unwrap_or(defaults.carpet_area),
            balcony_area: self.balcony_area.unwrap_or(defaults.balcony_area),
            bedrooms: self.bedrooms.unwrap_or(defaults.bedrooms),
            distance_km: self.distance.unwrap_or(defaults.distance_km),
        }
    }
}

/// Loan flags; anything left out comes from the `[loan]` settings.
#[derive(Debug, Args)]
struct LoanArgs {
    /// Loan amount in rupees. Commas are accepted.
    #[arg(long, value_parser = parse_decimal)]
    principal: Option<Decimal>,

    /// Annual interest rate percent.
    #[arg(long, value_parser = parse_decimal)]
    rate: Option<Decimal>,

    #[arg(long)]
    tenure: Option<i32>,
}

impl LoanArgs {
    fn form(
        &self,
        settings: &Settings,
    ) -> LoanForm {
        LoanForm {
            principal: self.principal.unwrap_or(settings.loan.principal),
            rate_percent: self.rate.unwrap_or(settings.loan.rate_percent),
            tenure_years: self.tenure.unwrap_or(settings.loan.tenure_years),
        }
    }
}

fn parse_property_type(s: &str) -> Result<PropertyType, String> {
    PropertyType::parse(s).ok_or_else(|| format!("expected 'house' or 'apartment', got '{s}'"))
}

fn parse_material(s: &str) -> Result<ConstructionMaterial, String> {
    ConstructionMaterial::parse(s).ok_or_else(|| format!("expected 'rcc', 'steel' or 'brick', got '{s}'"))
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging("info");

    let mut settings = Settings::load(cli.config.as_deref()).context("loading settings")?;
    if let Some(path) = cli.model {
        settings.model.path = path;
    }
    if let Some(path) = cli.market_data {
        settings.data.market_csv = path;
    }

    let level = cli.log_level.as_deref().unwrap_or(&settings.logging.level);
    logging::set_log_level(level)?;
    if let Some(file) = &settings.logging.file {
        logging::enable_file_logging(file)?;
    }
    debug!(?settings, "settings resolved");

    match cli.command {
        Command::Report(args) => {
            let dashboard = start_dashboard(&settings);
            let property = args
                .form()
                .validate(dashboard.today())
                .context("invalid property details")?;
            let loan = args
                .loan
                .form(&settings)
                .validate()
                .context("invalid loan details")?;
            print!("{}", dashboard.valuation_report(&property, args.material, &loan));
        }
        Command::Emi { loan, schedule } => {
            let calculator = AmortizationCalculator::default();
            let loan = loan.form(&settings).validate().context("invalid loan details")?;
            print!("{}", app::loan_summary(&calculator, &loan)?);
            if schedule {
                let periods = calculator.schedule(&loan)?;
                println!();
                print!("{}", ScheduleTable(&periods));
            }
        }
        Command::Project {
            value,
            growth,
            years,
        } => {
            let calculator = ProjectionCalculator::new(settings.projection_config());
            let growth = growth.unwrap_or(calculator.config().annual_growth_percent);
            let years = years.unwrap_or(calculator.config().horizon_years);
            let future_value = calculator.project_value(value, growth, years)?;
            print!(
                "{}",
                ProjectionSummary(ProjectionResult {
                    present_value: value,
                    annual_growth_percent: growth,
                    years,
                    future_value,
                })
            );
        }
        Command::Market => match app::market_report(&settings.data.market_csv) {
            Ok(report) => print!("{report}"),
            Err(MarketDataError::DataUnavailable(path)) => {
                info!(path = %path.display(), "market dataset missing");
                println!("Market data unavailable.");
            }
            Err(e) => return Err(e).context("loading market data"),
        },
        Command::Batch { file } => {
            let dashboard = start_dashboard(&settings);
            if let Some(e) = dashboard.model_error() {
                anyhow::bail!("cannot value batch: {e}");
            }
            let forms = csv_loader::load_from_file(&file)
                .with_context(|| format!("reading batch file '{}'", file.display()))?;
            let rows = dashboard.value_batch(&forms);
            print!("{}", BatchTable(&rows));
        }
    }

    Ok(())
}

fn start_dashboard(settings: &Settings) -> Dashboard {
    let registry = app::build_registry();
    Dashboard::start(&registry, &settings.model_config(), settings.projection_config())
}
