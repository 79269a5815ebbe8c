use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use vita_core::config::ProfileConfig;
use vita_core::*;

#[derive(Parser)]
#[command(name = "vita")]
#[command(about = "Personal BMI and calorie tracking dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a new measurement
    Record {
        /// Subject name
        #[arg(long)]
        name: String,

        /// Height in centimeters
        #[arg(long)]
        height: f64,

        /// Weight in kilograms
        #[arg(long)]
        weight: f64,
    },

    /// Show the dashboard for a subject
    Status {
        #[arg(long)]
        name: String,

        /// Target BMI (config default: 22.0)
        #[arg(long)]
        target_bmi: Option<f64>,

        /// Age in years
        #[arg(long)]
        age: Option<u32>,

        /// male or female
        #[arg(long)]
        sex: Option<String>,

        /// sedentary, light, moderate or high
        #[arg(long)]
        activity: Option<String>,
    },

    /// List recorded measurements
    History {
        /// Restrict to one subject
        #[arg(long)]
        name: Option<String>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete measurements
    Delete {
        #[arg(long)]
        name: String,

        /// Comma-separated record ids; prompts interactively when omitted
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<i64>>,
    },

    /// Write a health report file for a subject
    Report {
        #[arg(long)]
        name: String,

        /// Output directory (defaults to the current directory)
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long)]
        target_bmi: Option<f64>,

        #[arg(long)]
        age: Option<u32>,

        /// male or female
        #[arg(long)]
        sex: Option<String>,

        /// sedentary, light, moderate or high
        #[arg(long)]
        activity: Option<String>,
    },

    /// Analyze a landslide damage CSV
    Damage {
        /// Path of the damage table CSV
        #[arg(long)]
        csv: PathBuf,

        /// Number of top regions to list
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Forecast this many future years
        #[arg(long)]
        forecast: Option<usize>,

        /// Show the volatility ranking
        #[arg(long)]
        volatility: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    vita_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Commands::Record {
            name,
            height,
            weight,
        } => cmd_record(data_dir, name, height, weight),
        Commands::Status {
            name,
            target_bmi,
            age,
            sex,
            activity,
        } => {
            let profile = resolve_profile(&config, target_bmi, age, sex, activity)?;
            cmd_status(data_dir, name, &profile)
        }
        Commands::History { name, json } => cmd_history(data_dir, name, json),
        Commands::Delete { name, ids } => cmd_delete(data_dir, name, ids),
        Commands::Report {
            name,
            out,
            target_bmi,
            age,
            sex,
            activity,
        } => {
            let profile = resolve_profile(&config, target_bmi, age, sex, activity)?;
            cmd_report(data_dir, name, out, &profile)
        }
        Commands::Damage {
            csv,
            top,
            forecast,
            volatility,
        } => cmd_damage(csv, top, forecast, volatility),
    }
}

/// Fill omitted profile flags from the config defaults
fn resolve_profile(
    config: &Config,
    target_bmi: Option<f64>,
    age: Option<u32>,
    sex: Option<String>,
    activity: Option<String>,
) -> Result<ProfileConfig> {
    let mut profile = config.profile.clone();
    if let Some(target_bmi) = target_bmi {
        profile.target_bmi = target_bmi;
    }
    if let Some(age) = age {
        profile.age = age;
    }
    if let Some(sex) = sex {
        profile.sex = sex.parse()?;
    }
    if let Some(activity) = activity {
        profile.activity = activity.parse()?;
    }
    Ok(profile)
}

fn open_store(data_dir: &PathBuf) -> Result<HistoryStore> {
    std::fs::create_dir_all(data_dir)?;
    HistoryStore::open(&data_dir.join("bmi.db"))
}

fn cmd_record(data_dir: PathBuf, name: String, height: f64, weight: f64) -> Result<()> {
    let store = open_store(&data_dir)?;

    let stored = store.append(&NewMeasurement {
        name,
        height_cm: height,
        weight_kg: weight,
    })?;

    println!(
        "✓ Recorded BMI {:.2} ({}) for {}",
        stored.bmi, stored.status, stored.name
    );
    Ok(())
}

fn cmd_status(data_dir: PathBuf, name: String, profile: &ProfileConfig) -> Result<()> {
    let store = open_store(&data_dir)?;

    let Some(summary) = store.summary_for(&name)? else {
        print_unknown_subject(&store, &name)?;
        return Ok(());
    };

    let report = HealthReport::build(&summary, profile);
    display_dashboard(&summary, &report);
    Ok(())
}

/// Point the user at the recorded subjects when a name has no history
fn print_unknown_subject(store: &HistoryStore, name: &str) -> Result<()> {
    println!("No records for {name}. Save one with `vita record`.");
    let names = store.names()?;
    if !names.is_empty() {
        println!("Known subjects: {}", names.join(", "));
    }
    Ok(())
}

fn display_dashboard(summary: &HistorySummary, report: &HealthReport) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  HEALTH DASHBOARD: {}", report.name);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Latest BMI: {:.2} ({})  recorded {}",
        report.bmi, report.status, report.date
    );
    println!(
        "  Max BMI: {:.2}   Min BMI: {:.2}   Records: {}",
        summary.max_bmi, summary.min_bmi, summary.count
    );
    println!();
    println!("  Calorie Analysis");
    println!("  → BMR:  {} kcal", report.bmr as i64);
    println!("  → TDEE: {} kcal", report.tdee as i64);
    println!(
        "  → Recommended intake: {} kcal ({})",
        report.recommended_calories as i64, report.plan
    );
    println!();
    println!("  Workout: {}", report.workout.title);
    for line in report.workout.content.lines() {
        println!("  {line}");
    }
    println!();
    println!("  Diet Guide");
    for line in report.diet.lines() {
        println!("  {line}");
    }
    println!();
    println!("  {}", report.assessment.message());
    if let Some(trend) = report.trend {
        println!("  {}", trend.describe());
    }
    println!();
}

fn cmd_history(data_dir: PathBuf, name: Option<String>, json: bool) -> Result<()> {
    let store = open_store(&data_dir)?;

    let records = match name {
        Some(ref name) => store.query_by_name(name)?,
        None => store.query_all()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No records yet.");
        return Ok(());
    }

    println!(
        "{:>4}  {:<16}  {:<12}  {:>7}  {:>7}  {:>6}  status",
        "id", "date", "name", "height", "weight", "bmi"
    );
    for record in &records {
        println!(
            "{:>4}  {:<16}  {:<12}  {:>7.1}  {:>7.1}  {:>6.2}  {}",
            record.id,
            record.recorded_at,
            record.name,
            record.height_cm,
            record.weight_kg,
            record.bmi,
            record.status
        );
    }
    Ok(())
}

fn cmd_delete(data_dir: PathBuf, name: String, ids: Option<Vec<i64>>) -> Result<()> {
    let store = open_store(&data_dir)?;

    let ids = match ids {
        Some(ids) => ids,
        None => {
            let records = store.query_by_name(&name)?;
            if records.is_empty() {
                println!("No records for {name}.");
                return Ok(());
            }
            match prompt_delete_selection(&records)? {
                Some(ids) => ids,
                None => {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
        }
    };

    let deleted = store.delete_by_ids(&ids)?;
    println!("✓ Deleted {deleted} records");
    Ok(())
}

/// List a subject's records and read a comma-separated id selection
fn prompt_delete_selection(records: &[Record]) -> Result<Option<Vec<i64>>> {
    println!("{:>4}  {:<16}  {:>6}  status", "id", "date", "bmi");
    for record in records {
        println!(
            "{:>4}  {:<16}  {:>6.2}  {}",
            record.id, record.recorded_at, record.bmi, record.status
        );
    }
    println!("─────────────────────────────────────────");
    print!("Ids to delete (comma-separated, blank to cancel): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let ids = input
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| Error::InvalidInput(format!("not a record id: {part}")))
        })
        .collect::<Result<Vec<i64>>>()?;
    Ok(Some(ids))
}

fn cmd_report(
    data_dir: PathBuf,
    name: String,
    out: Option<PathBuf>,
    profile: &ProfileConfig,
) -> Result<()> {
    let store = open_store(&data_dir)?;

    let Some(summary) = store.summary_for(&name)? else {
        print_unknown_subject(&store, &name)?;
        return Ok(());
    };

    let report = HealthReport::build(&summary, profile);
    let out_dir = out.unwrap_or_else(|| PathBuf::from("."));
    let path = report.write_to(&out_dir)?;

    println!("✓ Report written to {}", path.display());
    Ok(())
}

fn cmd_damage(
    csv: PathBuf,
    top: usize,
    forecast: Option<usize>,
    volatility: bool,
) -> Result<()> {
    let table = DamageTable::load(&csv)?;

    println!("\nYearly damage totals");
    for (year, total) in table.yearly_totals() {
        println!("  {year}  {total:.2} ha");
    }

    println!("\nTop {top} regions by cumulative damage");
    for (rank, (region, total)) in table.top_regions(top).iter().enumerate() {
        println!("  {:>2}. {:<20} {:.2} ha", rank + 1, region, total);
    }

    if let Some(years) = forecast {
        println!("\nForecast (next {years} years)");
        for (year, predicted) in table.forecast(years)? {
            println!("  {year}  {predicted:.2} ha");
        }
    }

    if volatility {
        println!("\nVolatility ranking (sample std dev)");
        println!("  {:<20} {:>10}  {:>10}  {:>10}", "region", "mean", "std", "max");
        for stats in table.volatility(10) {
            println!(
                "  {:<20} {:>10.2}  {:>10.2}  {:>10.2}",
                stats.region, stats.mean, stats.std_dev, stats.max
            );
        }
    }

    println!();
    Ok(())
}
