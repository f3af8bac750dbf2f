//! # Mat-Props CLI Application
//!
//! Terminal front end for the compute dispatcher. It plays the role of one
//! UI surface: it collects a parameter set, owns a single compute session,
//! prints the resulting slot and, on request, exports it to a spreadsheet.
//!
//! ```text
//! props_cli kinds
//! props_cli compute --kind thermal-expansion-for-honeycomb --model 1 \
//!     --param l_cell_side_size=9.24 --param h_cell_side_size=8.4619 \
//!     --param wall_thickness=0.4 --param angle=0.5236 \
//!     --param alpha_for_honeycomb=2e-4 --export
//! ```

mod logging;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use props_core::export::ExportPipeline;
use props_core::xlsx::XlsxEncoderLoader;
use props_core::{
    load_config, BenchmarkedResultSlot, ComputationKind, ComputationRequest, ComputeSession, DispatchConfig,
    DispatchResult, Dispatcher,
};
use tracing::error;

#[derive(Parser)]
#[command(name = "props_cli", version, about = "Compute material properties locally or remotely")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List computation kinds with their arity and parameters
    Kinds,

    /// Run one computation
    Compute {
        /// Computation kind (snake_case or kebab-case)
        #[arg(short, long)]
        kind: ComputationKind,

        /// Model number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        model: u8,

        /// Parameter as name=value, repeatable
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, f64)>,

        /// Export the result to a spreadsheet
        #[arg(long)]
        export: bool,

        /// Print the slot as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_param(s: &str) -> Result<(String, f64), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{}': {}", name.trim(), e))?;
    Ok((name.trim().to_string(), value))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "cannot load configuration");
                return ExitCode::FAILURE;
            }
        },
        None => DispatchConfig::default(),
    };

    match cli.command {
        Command::Kinds => {
            print_kinds();
            ExitCode::SUCCESS
        }
        Command::Compute {
            kind,
            model,
            params,
            export,
            json,
        } => match run_compute(&config, kind, model, params, export, json).await {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::FAILURE,
            Err(e) => {
                eprintln!("Error: {}", e);
                if let Ok(json) = serde_json::to_string_pretty(&e) {
                    eprintln!();
                    eprintln!("Error JSON:");
                    eprintln!("{}", json);
                }
                ExitCode::FAILURE
            }
        },
    }
}

async fn run_compute(
    config: &DispatchConfig,
    kind: ComputationKind,
    model: u8,
    params: Vec<(String, f64)>,
    export: bool,
    json: bool,
) -> DispatchResult<bool> {
    let parameters: BTreeMap<String, f64> = params.into_iter().collect();
    let request = ComputationRequest::new(model, parameters)?;

    let mut session = ComputeSession::new(Dispatcher::from_config(config)?);
    if !session.compute(kind, &request).await {
        eprintln!("Computation failed (see log for details).");
        return Ok(false);
    }

    if json {
        println!("{}", slot_json(session.slot())?);
    } else {
        print_slot(session.slot());
    }

    if export {
        let pipeline = ExportPipeline::new(Arc::new(XlsxEncoderLoader::new(config.export.output_dir.clone())));
        let artifact = pipeline.export_result(session.slot()).await?;
        println!("Exported: {}", artifact.path.display());
    }

    Ok(true)
}

fn print_kinds() {
    for kind in ComputationKind::ALL {
        println!("{} ({} values: {})", kind, kind.arity(), kind.family().labels().join(", "));
        println!("  parameters: {}", kind.required_parameters().join(", "));
    }
}

fn slot_json(slot: &BenchmarkedResultSlot) -> DispatchResult<String> {
    Ok(serde_json::to_string_pretty(slot)?)
}

fn print_slot(slot: &BenchmarkedResultSlot) {
    let Some(result) = &slot.value else {
        println!("No result.");
        return;
    };

    println!("═══════════════════════════════════════");
    println!("  {}", result.kind().family().display_name().to_uppercase());
    println!("═══════════════════════════════════════");
    println!();
    for (label, value) in result.labeled() {
        println!("  {:<6} = {:e}", label, value);
    }
    println!();
    if slot.timing.is_zero() {
        println!("  Computed by native host (untimed)");
    } else {
        println!("  Remote computation took {}", slot.timing);
    }
    println!("═══════════════════════════════════════");
}
