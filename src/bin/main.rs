//! translayer CLI - compile predicates over translated attributes to SQL
//!
//! Usage:
//!   translayer compile --config <translayer.toml> --model <name> --locale <locale> "<predicate>"
//!   translayer check --config <translayer.toml>
//!
//! Examples:
//!   translayer compile --model posts --locale fr "title = 'foo' OR title IS NULL"
//!   translayer compile --model posts --locale en --invert --dialect tsql "title = 'foo'"
//!   translayer compile --model posts --locale en --output plan "content IS NULL"
//!   translayer check --config translayer.toml

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use translayer::compile::{compile_predicate, CompileOptions};
use translayer::config::Settings;
use translayer::registry::Registry;
use translayer::sql::Dialect;

#[derive(Parser)]
#[command(name = "translayer")]
#[command(about = "translayer - Infer translation-table joins for predicates over translated attributes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a predicate on a model to SQL
    Compile {
        /// Path to the configuration file
        #[arg(short, long, default_value = "translayer.toml")]
        config: PathBuf,

        /// Model (table name) the predicate filters
        #[arg(short, long)]
        model: String,

        /// Locale translated attributes are read in
        #[arg(short, long)]
        locale: String,

        /// Select records for which the predicate does not hold
        #[arg(long)]
        invert: bool,

        /// SQL dialect to generate
        #[arg(short, long, default_value = "postgres")]
        dialect: DialectArg,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,

        /// SQL boolean expression, e.g. "title = 'foo'"
        predicate: String,
    },

    /// Validate a configuration file and list translated attributes
    Check {
        /// Path to the configuration file
        #[arg(short, long, default_value = "translayer.toml")]
        config: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Postgres,
    Mysql,
    Tsql,
    Duckdb,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Tsql => Dialect::TSql,
            DialectArg::Duckdb => Dialect::DuckDb,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Output SQL only
    Sql,
    /// Output the inferred joins as JSON
    Plan,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            config,
            model,
            locale,
            invert,
            dialect,
            output,
            predicate,
        } => {
            let options = CompileOptions::new(locale.as_str())
                .with_dialect(dialect.into())
                .inverted(invert);
            cmd_compile(config, &model, &predicate, options, output)
        }
        Commands::Check { config } => cmd_check(config),
    }
}

fn load_registry(config: &Path) -> Option<Registry> {
    let registry = Settings::from_file(config).and_then(|settings| settings.build_registry());
    match registry {
        Ok(registry) => Some(registry),
        Err(e) => {
            eprintln!("Configuration error in '{}': {}", config.display(), e);
            None
        }
    }
}

fn cmd_compile(
    config: PathBuf,
    model: &str,
    predicate: &str,
    options: CompileOptions,
    output: OutputFormat,
) -> ExitCode {
    let Some(registry) = load_registry(&config) else {
        return ExitCode::FAILURE;
    };

    let model = match registry.model(model) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match compile_predicate(model, predicate, &options) {
        Ok(compiled) => {
            match output {
                OutputFormat::Sql => {
                    println!("{}", compiled.sql);
                }
                OutputFormat::Plan => match serde_json::to_string_pretty(&compiled.joins) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing plan: {}", e);
                        return ExitCode::FAILURE;
                    }
                },
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_check(config: PathBuf) -> ExitCode {
    let Some(registry) = load_registry(&config) else {
        return ExitCode::FAILURE;
    };

    println!("File: {}", config.display());
    println!();

    if registry.is_empty() {
        println!("No models defined.");
        return ExitCode::SUCCESS;
    }

    println!("Models:");
    for model in registry.models() {
        let info = model.model();
        println!("  {} (type: {}, key: {}):", info.table, info.type_name, info.primary_key);
        for backend in model.backends() {
            println!("    - {}: {}", backend.name(), backend.attributes().join(", "));
        }
    }

    ExitCode::SUCCESS
}
