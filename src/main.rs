use clap::{Parser, Subcommand, builder::styling};
use dim_users_etl::cli::{
    check_credentials, import_csv, list_tables, load_cleaning_config, preview_pipeline,
    run_pipeline,
};
use dim_users_etl::config::StoreSettings;
use dim_users_etl::storage::ConflictPolicy;
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// dimclean: extract the raw user table, clean it into dim_users, and upload the result
#[derive(Parser)]
#[command(name = "dimclean", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source settings from, if it exists
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Table store directory (overrides DIMCLEAN_STORE)
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tables in the store
    List,

    /// Import a CSV file into the store
    Import {
        /// CSV file with a header row
        csv: PathBuf,

        /// Name of the table to create
        #[arg(short, long)]
        table: String,

        /// What to do if the table already exists
        #[arg(short, long, value_enum, default_value_t = ConflictPolicy::Replace)]
        policy: ConflictPolicy,
    },

    /// Extract, clean and upload the user table
    Run {
        /// Raw table to read (overrides DIMCLEAN_SOURCE_TABLE)
        #[arg(long)]
        source: Option<String>,

        /// Table to upload to (overrides DIMCLEAN_TARGET_TABLE)
        #[arg(long)]
        target: Option<String>,

        /// What to do if the target exists (overrides DIMCLEAN_CONFLICT_POLICY)
        #[arg(short, long, value_enum)]
        policy: Option<ConflictPolicy>,

        /// YAML file with cleaning rules
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Row count to expect after cleaning
        #[arg(long, conflicts_with = "no_row_check")]
        expected_rows: Option<usize>,

        /// Don't compare the cleaned row count to an expectation
        #[arg(long)]
        no_row_check: bool,

        /// Database credential file to validate before running
        #[arg(long)]
        creds: Option<PathBuf>,

        /// Clean and print a report without uploading
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a database credential file
    Creds {
        /// YAML credential file
        #[arg(default_value = "db_creds.yaml")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if std::path::Path::new(&cli.env).exists() {
        dotenvy::from_filename(&cli.env)?;
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::List => {
            let settings = StoreSettings::resolve(cli.store, None, None, None)?;
            log::info!("Tables in {}", settings.store.display().bright_black());
            for name in list_tables(&settings.store)? {
                println!("{}", name);
            }
        }
        Commands::Import { csv, table, policy } => {
            let settings = StoreSettings::resolve(cli.store, None, None, Some(policy))?;
            log::info!(
                "Importing {} as {}",
                csv.display().bright_black(),
                table.cyan()
            );
            let count = import_csv(&settings.store, &csv, &table, policy)?;
            log::info!("✓ Imported {} row(s) into {}", count, table.cyan());
        }
        Commands::Run {
            source,
            target,
            policy,
            rules,
            expected_rows,
            no_row_check,
            creds,
            dry_run,
        } => {
            // Configuration problems surface before any pipeline step
            if let Some(creds) = creds {
                check_credentials(creds)?;
            }
            let settings = StoreSettings::resolve(cli.store, source, target, policy)?;
            let config = load_cleaning_config(rules.as_deref(), expected_rows, no_row_check)?;

            if dry_run {
                let report = preview_pipeline(&settings, config)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let count = run_pipeline(&settings, config)?;
                log::info!(
                    "✓ Uploaded {} row(s) to {}",
                    count,
                    settings.target_table.cyan()
                );
            }
        }
        Commands::Creds { file } => {
            let creds = check_credentials(&file)?;
            println!("{}", creds.redacted_url().green());
        }
    }

    Ok(())
}
