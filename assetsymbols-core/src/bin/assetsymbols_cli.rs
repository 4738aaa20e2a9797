//! AssetSymbols CLI - build step entry point
//!
//! Commands: generate, build, symbols
//! Outputs JSON to stdout, logs to stderr
//! Exit codes: 1 configuration error, 2 generation failure, 3 stale outputs

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assetsymbols_core::{
    config::DEFAULT_CONFIG_FILE, ArtifactFormat, GenerateError, GenerateRequest,
    GenerationPipeline, GenerationReport, GeneratorConfig, PublishMode, Stage,
};

const EXIT_OK: u8 = 0;
const EXIT_CONFIG: u8 = 1;
const EXIT_GENERATION_FAILED: u8 = 2;
const EXIT_STALE: u8 = 3;

#[derive(Parser)]
#[command(name = "assetsymbols-cli")]
#[command(about = "AssetSymbols CLI - Asset Symbol Compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate symbols for a single catalog
    Generate {
        /// Catalog directory (.xcassets) or JSON manifest
        #[arg(short, long)]
        catalog: PathBuf,

        /// Bundle identifier
        #[arg(short, long)]
        bundle_id: String,

        /// Objective-C header output path
        #[arg(long)]
        header: Option<PathBuf>,

        /// Swift symbols output path
        #[arg(long)]
        swift: Option<PathBuf>,

        /// Compare against existing outputs without writing
        #[arg(long)]
        check: bool,
    },

    /// Generate every target in a config file, in parallel
    Build {
        /// Path to config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Compare against existing outputs without writing
        #[arg(long)]
        check: bool,
    },

    /// Print the symbol table for a catalog
    Symbols {
        #[arg(short, long)]
        catalog: PathBuf,

        #[arg(short, long)]
        bundle_id: String,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "assetsymbols_core=warn",
        1 => "assetsymbols_core=info",
        _ => "assetsymbols_core=debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn mode(check: bool) -> PublishMode {
    if check {
        PublishMode::Check
    } else {
        PublishMode::Write
    }
}

fn error_json(e: &GenerateError) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "stage": e.stage().as_str(),
        "error": e.to_string(),
    })
}

fn error_status(e: &GenerateError) -> u8 {
    match e.stage() {
        Stage::Idle => EXIT_CONFIG,
        _ => EXIT_GENERATION_FAILED,
    }
}

fn exit_code_for(e: &GenerateError) -> ExitCode {
    ExitCode::from(error_status(e))
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("failed to serialize output: {}", e),
    }
}

fn report_status(reports: &[&GenerationReport], mode: PublishMode) -> u8 {
    if mode == PublishMode::Check && reports.iter().any(|r| r.has_changes()) {
        EXIT_STALE
    } else {
        EXIT_OK
    }
}

fn report_exit(reports: &[&GenerationReport], mode: PublishMode) -> ExitCode {
    ExitCode::from(report_status(reports, mode))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let pipeline = GenerationPipeline::new();

    match cli.command {
        Commands::Generate {
            catalog,
            bundle_id,
            header,
            swift,
            check,
        } => {
            let mut request = GenerateRequest::new("default", catalog, bundle_id).with_mode(mode(check));
            if let Some(path) = header {
                request = request.with_output(ArtifactFormat::Header, path);
            }
            if let Some(path) = swift {
                request = request.with_output(ArtifactFormat::Swift, path);
            }

            match pipeline.run(&request) {
                Ok(report) => {
                    print_json(&serde_json::json!({
                        "success": true,
                        "report": report,
                    }));
                    report_exit(&[&report], request.mode)
                }
                Err(e) => {
                    print_json(&error_json(&e));
                    exit_code_for(&e)
                }
            }
        }

        Commands::Build { config, check } => {
            let config = match GeneratorConfig::load(&config) {
                Ok(c) => c,
                Err(e) => {
                    print_json(&error_json(&e));
                    return exit_code_for(&e);
                }
            };

            let mode = mode(check);
            let requests = config.requests(mode);
            let results = pipeline.run_all(&requests);

            let mut reports = vec![];
            let mut failed = false;
            let entries: Vec<_> = requests
                .iter()
                .zip(&results)
                .map(|(request, result)| match result {
                    Ok(report) => {
                        reports.push(report);
                        serde_json::json!({"target": request.name, "success": true, "report": report})
                    }
                    Err(e) => {
                        failed = true;
                        let mut value = error_json(e);
                        value["target"] = serde_json::json!(request.name);
                        value
                    }
                })
                .collect();

            print_json(&serde_json::json!({
                "success": !failed,
                "targets": entries,
            }));

            if failed {
                ExitCode::from(EXIT_GENERATION_FAILED)
            } else {
                report_exit(&reports, mode)
            }
        }

        Commands::Symbols { catalog, bundle_id } => {
            match pipeline.symbol_table(&catalog, &bundle_id) {
                Ok(table) => {
                    print_json(&serde_json::json!({
                        "bundle_id": table.bundle_identifier(),
                        "symbols": table.symbols(),
                    }));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    print_json(&error_json(&e));
                    exit_code_for(&e)
                }
            }
        }
    }
}
