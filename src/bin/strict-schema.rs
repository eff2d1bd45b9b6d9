//! Strict Schema CLI
//!
//! Command-line interface for compiling schemas and checking instances
//! against the compiled output.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use strict_schema::{
    build, compile, load_schema, load_schema_str, validate_instance, Budgets, CompileOptions,
    ValidateError,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strict-schema")]
#[command(about = "Compile JSON Schemas into closed schemas for strict structured output")]
#[command(version)]
struct Cli {
    /// Only log warnings and errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log per-node detail
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a schema with its directive configuration
    Compile {
        #[command(flatten)]
        input: InputArgs,

        /// Suffix inserted before the extension of the output file
        #[arg(long, default_value = "_compiled")]
        suffix: String,

        /// Print a JSON report of statistics and warnings
        #[arg(long)]
        json: bool,
    },

    /// Compile in memory and print statistics without writing output
    Stats {
        #[command(flatten)]
        input: InputArgs,

        /// Output statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate an instance against a compiled schema
    Validate {
        /// Compiled schema file
        schema: PathBuf,

        /// Instance file to validate
        instance: PathBuf,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Directory holding the schema, configuration and output
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Schema file name inside the data directory
    #[arg(long, default_value = "schema.json")]
    schema: String,

    /// YAML directive file name inside the data directory
    #[arg(long, default_value = "instructions.yaml")]
    config: String,

    /// Property count budget
    #[arg(long, default_value_t = 100)]
    max_properties: usize,

    /// Object nesting budget
    #[arg(long, default_value_t = 5)]
    max_depth: usize,
}

impl InputArgs {
    fn into_options(self) -> CompileOptions {
        CompileOptions::new(self.data_dir)
            .schema_file(self.schema)
            .config_file(self.config)
            .budgets(Budgets {
                max_properties: self.max_properties,
                max_depth: self.max_depth,
            })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Compile {
            input,
            suffix,
            json,
        } => run_compile(input.into_options().output_suffix(suffix), json),
        Commands::Stats { input, json } => run_stats(&input.into_options(), json),
        Commands::Validate {
            schema,
            instance,
            json,
        } => run_validate(&schema, &instance, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter =
        EnvFilter::try_from_env("STRICT_SCHEMA_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run_compile(options: CompileOptions, json_output: bool) -> Result<(), u8> {
    let report = compile(&options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    if json_output {
        let output = serde_json::to_string_pretty(&report).map_err(|e| {
            eprintln!("Error serializing report: {}", e);
            2u8
        })?;
        println!("{}", output);
    } else {
        println!("{}", report.output_path.display());
    }
    Ok(())
}

fn run_stats(options: &CompileOptions, json_output: bool) -> Result<(), u8> {
    let compiled = build(options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    if json_output {
        let output = serde_json::json!({
            "stats": compiled.stats,
            "budgets": options.budgets,
            "within_budget": compiled.stats.within_budget(&options.budgets),
            "warnings": compiled.warnings,
        });
        println!("{}", output);
    } else {
        println!("Total properties: {}", compiled.stats.total_properties);
        println!("Maximum nesting level: {}", compiled.stats.max_depth);
    }
    Ok(())
}

fn run_validate(schema_path: &Path, instance_path: &Path, json_output: bool) -> Result<(), u8> {
    let schema = load_schema(schema_path).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;

    // Instances aren't schemas, so skip the meta-schema check
    let instance = std::fs::read_to_string(instance_path)
        .map_err(|e| {
            report_error(
                json_output,
                &format!("reading {}: {}", instance_path.display(), e),
            );
            3u8
        })
        .and_then(|content| {
            load_schema_str(&content).map_err(|e| {
                report_error(json_output, &format!("loading instance: {}", e));
                e.exit_code() as u8
            })
        })?;

    match validate_instance(&schema, &instance) {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { errors }) => {
            if json_output {
                let output = serde_json::json!({
                    "valid": false,
                    "errors": errors
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                for error in errors {
                    eprintln!("  {}", error);
                }
            }
            Err(1)
        }
        Err(ValidateError::Compile(e)) => {
            report_error(json_output, &e.to_string());
            Err(e.exit_code() as u8)
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}
