use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bqjobs::{BqJobsError, BigQueryError, JobResults, Warehouse, WarehouseConfig};

#[derive(Parser)]
#[command(name = "bqjobs")]
#[command(about = "Run BigQuery query, extract and load jobs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the service account secret file
    #[arg(short, long, env = "BQ_SECRET_LOCATION")]
    secret: Option<PathBuf>,

    /// YAML config file (flags override its values)
    #[arg(short, long, env = "BQJOBS_CONFIG")]
    config: Option<PathBuf>,

    /// Where the secret is copied before the client is built
    #[arg(long)]
    local_key_file: Option<PathBuf>,

    /// Job status polling interval in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Location to run jobs in (e.g. US, EU)
    #[arg(long)]
    location: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query and export its results to Cloud Storage
    Export {
        /// GCP project the jobs run in
        #[arg(short, long, env = "GCP_PROJECT_ID")]
        project: String,

        /// SQL to run
        #[arg(short, long)]
        query: String,

        /// Destination URI; its extension selects the format (parquet, json, avro, else CSV)
        #[arg(short, long)]
        output: String,

        /// Field delimiter for CSV output
        #[arg(short, long, default_value = ",")]
        delimiter: String,
    },

    /// Append a Cloud Storage file to an existing table
    Load {
        /// Destination table as project.dataset.table
        #[arg(short, long)]
        table: String,

        /// Source URI; its extension selects the format (parquet, json, avro, else CSV)
        #[arg(short, long)]
        input: String,
    },

    /// Copy tables into a destination table
    Copy {
        /// Destination table as project.dataset.table
        #[arg(short, long)]
        destination: String,

        /// Source tables as project.dataset.table
        #[arg(short, long, required = true, num_args = 1..)]
        source: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("bqjobs=debug,info")
    } else {
        EnvFilter::new("bqjobs=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(e);
            ExitCode::FAILURE
        }
    }
}

fn print_error(err: BqJobsError) {
    if let BqJobsError::BigQuery(bq) = &err {
        print_bq_error(bq);
        return;
    }

    eprintln!("\x1b[31m✗ Error:\x1b[0m {}", err);
}

fn print_bq_error(err: &BigQueryError) {
    eprintln!("\n\x1b[31m✗ BigQuery Error [{}]\x1b[0m", err.error_code());
    eprintln!("  {}", err);
    eprintln!("\n\x1b[33mSuggestion:\x1b[0m");
    for line in err.suggestion().lines() {
        eprintln!("  {}", line);
    }
    eprintln!();
}

fn build_config(cli: &Cli) -> Result<WarehouseConfig, BqJobsError> {
    let mut config = match (&cli.config, &cli.secret) {
        (Some(path), _) => WarehouseConfig::from_file(path)?,
        (None, Some(secret)) => WarehouseConfig::new(secret.clone()),
        (None, None) => {
            return Err(BqJobsError::Config(
                "no service account secret given; pass --secret or --config".to_string(),
            ))
        }
    };

    if let (Some(_), Some(secret)) = (&cli.config, &cli.secret) {
        config.secret_path = secret.clone();
    }
    if let Some(path) = &cli.local_key_file {
        config = config.with_local_key_file(path.clone());
    }
    if let Some(ms) = cli.poll_interval_ms {
        config = config.with_poll_interval_ms(ms);
    }
    if let Some(location) = &cli.location {
        config = config.with_location(location.clone());
    }

    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), BqJobsError> {
    let config = build_config(&cli)?;
    let warehouse = Warehouse::connect(config).await?;

    let results = match &cli.command {
        Commands::Export { project, query, output, delimiter } => {
            info!("Exporting query results to {}", output);
            warehouse.export_query_to_storage(query, project, output, delimiter).await?
        }

        Commands::Load { table, input } => {
            info!("Loading {} into {}", input, table);
            warehouse.load_storage_to_table(table, input).await?
        }

        Commands::Copy { destination, source } => {
            let sources: Vec<&str> = source.iter().map(String::as_str).collect();
            warehouse.copy_table(destination, &sources).await?
        }
    };

    print_results(&results)
}

fn print_results(results: &JobResults) -> Result<(), BqJobsError> {
    println!("{}", serde_json::to_string_pretty(results)?);
    Ok(())
}
