// Command-line front end - one handler per subcommand
use crate::error::{classify_service_error, WorkflowError};
use crate::file_manager::{read_json_file_or_default, write_json_file};
use crate::format::{format_duration, format_percent, format_size, format_speedup};
use crate::models::{
    ClientSettings, FeatureMap, FeatureRequest, FeatureValue, OptimizationRequestConfig,
    OptimizeRequest, PerLevelMetrics, SourceArtifact, StandardRequest, TargetArch, TargetMetric,
};
use crate::samples::{example_pass_sequences, find_sample, sample_programs};
use crate::service::LlvmService;
use crate::utils::get_settings_json_path;
use crate::workflow::{SequencingMode, WorkflowResult, WorkflowSession, WorkflowState};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "iris",
    version,
    about = "Client for the IRIS ML-guided LLVM optimization service"
)]
pub struct Cli {
    /// Base URL of the optimization service (overrides saved settings)
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether the optimization service is reachable and healthy
    Health,
    /// Extract ML model input features from a C/C++ source file
    Features {
        file: PathBuf,
        /// Target architecture (riscv64 or riscv32)
        #[arg(long)]
        arch: Option<TargetArch>,
    },
    /// Build the file with an ML-predicted (or manual) pass sequence
    Optimize {
        file: PathBuf,
        /// Comma-separated manual pass sequence; disables the ML predictor
        #[arg(long, value_delimiter = ',')]
        passes: Option<Vec<String>>,
        /// Beam search width for pass prediction
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=20))]
        beam_size: Option<u32>,
        /// Optimize for execution_time or binary_size
        #[arg(long)]
        metric: Option<TargetMetric>,
        #[arg(long)]
        arch: Option<TargetArch>,
    },
    /// Compare the ML-predicted build against the -O0..-O3 baselines
    Compare {
        file: PathBuf,
        /// Extract and show features before the combined comparison call
        #[arg(long)]
        two_step: bool,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=20))]
        beam_size: Option<u32>,
        #[arg(long)]
        metric: Option<TargetMetric>,
        #[arg(long)]
        arch: Option<TargetArch>,
        /// Write the raw result JSON to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Benchmark the standard optimization levels on their own
    Standard {
        file: PathBuf,
        #[arg(long)]
        arch: Option<TargetArch>,
    },
    /// List the bundled sample programs, or print one by name
    Samples { name: Option<String> },
    /// Show or change persisted client settings
    Config {
        #[arg(long)]
        set_server: Option<String>,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=20))]
        set_beam_size: Option<u32>,
        #[arg(long)]
        set_metric: Option<TargetMetric>,
        #[arg(long)]
        set_arch: Option<TargetArch>,
    },
}

/// Envelope written by `compare --save`
#[derive(Debug, Serialize)]
struct SavedResult<'a> {
    saved_at: String,
    server_url: &'a str,
    result: &'a WorkflowResult,
}

pub fn run(cli: Cli) -> Result<(), String> {
    let settings: ClientSettings = read_json_file_or_default(&get_settings_json_path())?;
    let server_url = cli
        .server
        .clone()
        .unwrap_or_else(|| settings.server_url.clone());
    let service = LlvmService::new(server_url);

    match cli.command {
        Command::Health => run_health(&service),
        Command::Features { file, arch } => {
            run_features(&service, &file, arch.unwrap_or(settings.default_target_arch))
        }
        Command::Optimize {
            file,
            passes,
            beam_size,
            metric,
            arch,
        } => {
            let config = request_config(&settings, beam_size, metric, arch, passes);
            run_optimize(&service, &file, &config)
        }
        Command::Compare {
            file,
            two_step,
            beam_size,
            metric,
            arch,
            save,
        } => {
            let config = request_config(&settings, beam_size, metric, arch, None);
            let mode = if two_step {
                SequencingMode::TwoStep
            } else {
                SequencingMode::SingleStep
            };
            run_compare(&service, &file, &config, mode, save)
        }
        Command::Standard { file, arch } => {
            run_standard(&service, &file, arch.unwrap_or(settings.default_target_arch))
        }
        Command::Samples { name } => run_samples(name),
        Command::Config {
            set_server,
            set_beam_size,
            set_metric,
            set_arch,
        } => run_config(settings, set_server, set_beam_size, set_metric, set_arch),
    }
}

fn request_config(
    settings: &ClientSettings,
    beam_size: Option<u32>,
    metric: Option<TargetMetric>,
    arch: Option<TargetArch>,
    passes: Option<Vec<String>>,
) -> OptimizationRequestConfig {
    OptimizationRequestConfig {
        beam_size: beam_size.unwrap_or(settings.default_beam_size),
        target_metric: metric.unwrap_or(settings.default_target_metric),
        target_arch: arch.unwrap_or(settings.default_target_arch),
        use_ml_predictor: passes.is_none(),
        ir_passes: passes,
    }
}

fn load_artifact(path: &PathBuf) -> Result<SourceArtifact, String> {
    let artifact = SourceArtifact::from_path(path)?;
    info!(
        "loaded {} ({} bytes)",
        artifact.file_name, artifact.size_bytes
    );
    Ok(artifact)
}

// ============= Subcommand handlers =============

fn run_health(service: &LlvmService) -> Result<(), String> {
    if service.check_health() {
        println!("Backend: Connected ({})", service.base_url());
        Ok(())
    } else {
        Err(format!(
            "Backend: Disconnected - no healthy service at {}",
            service.base_url()
        ))
    }
}

fn run_features(service: &LlvmService, file: &PathBuf, arch: TargetArch) -> Result<(), String> {
    use crate::service::OptimizationBackend;

    let artifact = load_artifact(file)?;
    let response = service
        .extract_features(&FeatureRequest::new(&artifact, arch))
        .map_err(render_error)?;

    if !response.success {
        let error = classify_service_error(
            response
                .error
                .unwrap_or_else(|| "Feature extraction failed".to_string()),
        );
        return Err(render_error(error));
    }

    let features = response.features.unwrap_or_default();
    println!(
        "Extracted {} features from {}",
        response.feature_count.unwrap_or(features.len() as u64),
        artifact.file_name
    );
    print_features(&features);
    Ok(())
}

fn run_optimize(
    service: &LlvmService,
    file: &PathBuf,
    config: &OptimizationRequestConfig,
) -> Result<(), String> {
    use crate::service::OptimizationBackend;

    config.validate().map_err(render_error)?;
    let artifact = load_artifact(file)?;

    // With the predictor in play, extract features first so the model
    // inputs can be shown; a failure here short-circuits the run.
    let mut features = FeatureMap::new();
    if config.use_ml_predictor {
        let response = service
            .extract_features(&FeatureRequest::new(&artifact, config.target_arch))
            .map_err(render_error)?;
        if !response.success {
            let error = classify_service_error(
                response
                    .error
                    .unwrap_or_else(|| "Feature extraction failed".to_string()),
            );
            return Err(render_error(error));
        }
        features = response.features.unwrap_or_default();
    }

    let request = OptimizeRequest::from_config(&artifact, config);
    let response = service.run_optimization(&request).map_err(render_error)?;

    if !response.success {
        let error = classify_service_error(
            response
                .error
                .unwrap_or_else(|| "Optimization failed".to_string()),
        );
        return Err(render_error(error));
    }

    let metrics = response.metrics.unwrap_or_default();
    let passes = response
        .passes_used
        .or_else(|| metrics.ir_passes.clone())
        .unwrap_or_default();

    println!("=== Optimization Results: {} ===", artifact.file_name);
    if config.use_ml_predictor {
        println!("ML predicted pass sequence ({} passes):", passes.len());
    } else {
        println!("Manual pass sequence ({} passes):", passes.len());
    }
    println!("  {}", passes.join(", "));
    println!();
    println!(
        "Execution time:    {}",
        metrics
            .execution_time_avg
            .map(format_duration)
            .unwrap_or_else(not_available)
    );
    println!(
        "Binary size:       {}",
        metrics
            .binary_size
            .map(format_size)
            .unwrap_or_else(not_available)
    );
    println!(
        "Compile time:      {}",
        metrics
            .compile_time
            .map(format_duration)
            .unwrap_or_else(not_available)
    );
    println!(
        "Optimization time: {}",
        metrics
            .optimization_time
            .map(format_duration)
            .unwrap_or_else(not_available)
    );

    if !features.is_empty() {
        println!();
        println!("Model input features ({}):", features.len());
        print_features(&features);
    }
    Ok(())
}

fn run_compare(
    service: &LlvmService,
    file: &PathBuf,
    config: &OptimizationRequestConfig,
    mode: SequencingMode,
    save: Option<PathBuf>,
) -> Result<(), String> {
    let artifact = load_artifact(file)?;
    let session = WorkflowSession::new();

    let state = session
        .run_comparison(service, &artifact, config, mode)
        .map_err(render_error)?;

    match state {
        WorkflowState::Succeeded(result) => {
            print_comparison(&artifact, &result);
            if let Some(path) = save {
                let envelope = SavedResult {
                    saved_at: chrono::Utc::now().to_rfc3339(),
                    server_url: service.base_url(),
                    result: &result,
                };
                write_json_file(&path, &envelope)?;
                println!();
                println!("Raw results written to {:?}", path);
            }
            Ok(())
        }
        WorkflowState::Failed(error) => Err(render_error(error)),
        // one synchronous run always resolves to Succeeded or Failed
        other => Err(format!("unexpected workflow state: {:?}", other)),
    }
}

fn run_standard(service: &LlvmService, file: &PathBuf, arch: TargetArch) -> Result<(), String> {
    let artifact = load_artifact(file)?;
    let response = service
        .run_standard(&StandardRequest::new(&artifact, arch))
        .map_err(render_error)?;

    if !response.success {
        let error = classify_service_error(
            response
                .error
                .unwrap_or_else(|| "Standard optimization failed".to_string()),
        );
        return Err(render_error(error));
    }

    println!("=== Standard Levels: {} ===", artifact.file_name);
    println!("{:<8} {:>14} {:>12} {:>12}", "Level", "Time", "Size", "Compile");
    for (level, raw) in response.results.unwrap_or_default() {
        match raw.into_metrics() {
            Some(metrics) => println!(
                "{:<8} {:>14} {:>12} {:>12}",
                level,
                format_duration(metrics.execution_time_avg),
                format_size(metrics.binary_size),
                metrics
                    .compile_time
                    .map(format_duration)
                    .unwrap_or_else(not_available)
            ),
            None => println!("{:<8} {:>14}", level, "not available"),
        }
    }
    Ok(())
}

fn run_samples(name: Option<String>) -> Result<(), String> {
    match name {
        Some(name) => {
            let program =
                find_sample(&name).ok_or_else(|| format!("No sample named {:?}", name))?;
            println!("{}", program.code);
            Ok(())
        }
        None => {
            println!("Sample programs:");
            for program in sample_programs() {
                println!(
                    "  {:<16} ({}, {} lines)",
                    program.name,
                    program.file_name,
                    program.code.lines().count()
                );
            }
            println!();
            println!("Example pass sequences:");
            for (index, passes) in example_pass_sequences().iter().enumerate() {
                println!(
                    "  Sequence {} ({} passes): {}",
                    index + 1,
                    passes.len(),
                    passes.join(", ")
                );
            }
            Ok(())
        }
    }
}

fn run_config(
    mut settings: ClientSettings,
    set_server: Option<String>,
    set_beam_size: Option<u32>,
    set_metric: Option<TargetMetric>,
    set_arch: Option<TargetArch>,
) -> Result<(), String> {
    let changed = set_server.is_some()
        || set_beam_size.is_some()
        || set_metric.is_some()
        || set_arch.is_some();

    if let Some(server) = set_server {
        settings.server_url = server;
    }
    if let Some(beam_size) = set_beam_size {
        settings.default_beam_size = beam_size;
    }
    if let Some(metric) = set_metric {
        settings.default_target_metric = metric;
    }
    if let Some(arch) = set_arch {
        settings.default_target_arch = arch;
    }

    if changed {
        write_json_file(&get_settings_json_path(), &settings)?;
    }

    println!("Settings ({:?}):", get_settings_json_path());
    println!("  server_url:            {}", settings.server_url);
    println!("  default_beam_size:     {}", settings.default_beam_size);
    println!("  default_target_metric: {}", settings.default_target_metric);
    println!("  default_target_arch:   {}", settings.default_target_arch);
    Ok(())
}

// ============= Rendering =============

fn not_available() -> String {
    "N/A".to_string()
}

fn verdict(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn print_comparison(artifact: &SourceArtifact, result: &WorkflowResult) {
    let comparison = &result.comparison;

    println!("=== Comparison Summary: {} ===", artifact.file_name);
    let faster: Vec<String> = comparison
        .faster_levels()
        .iter()
        .map(|l| l.to_string())
        .collect();
    let smaller: Vec<String> = comparison
        .smaller_levels()
        .iter()
        .map(|l| l.to_string())
        .collect();
    println!(
        "ML beats standard levels: {}/{} ({})",
        comparison.faster_than,
        comparison.level_count,
        if faster.is_empty() {
            "none".to_string()
        } else {
            faster.join(", ")
        }
    );
    println!(
        "ML smaller than:          {}/{} ({})",
        comparison.smaller_than,
        comparison.level_count,
        if smaller.is_empty() {
            "none".to_string()
        } else {
            smaller.join(", ")
        }
    );

    if let Some(vs_best) = &comparison.vs_best {
        println!(
            "Best performance:         {} - best standard is {} at {}, speedup {}",
            if vs_best.ml_beats_best {
                "ML wins"
            } else {
                "Standard wins"
            },
            vs_best.best_standard,
            format_duration(vs_best.best_execution_time),
            vs_best
                .speedup_vs_best
                .map(format_speedup)
                .unwrap_or_else(not_available)
        );
    }
    if let Some(vs_best_size) = &comparison.vs_best_size {
        println!(
            "Best size:                {} - best standard is {} at {}, reduction {}",
            if vs_best_size.ml_beats_best_size {
                "ML wins"
            } else {
                "Standard wins"
            },
            vs_best_size.best_size_standard,
            format_size(vs_best_size.best_size_bytes),
            vs_best_size
                .size_reduction_vs_best
                .map(format_percent)
                .unwrap_or_else(not_available)
        );
    }

    println!();
    println!("--- ML Optimization ---");
    print_metrics_block(&result.ml_metrics);
    if !result.predicted_passes.is_empty() {
        println!(
            "Predicted passes ({}):  {}",
            result.predicted_passes.len(),
            result.predicted_passes.join(", ")
        );
    }

    println!();
    println!("--- Standard Levels ---");
    println!(
        "{:<8} {:>14} {:>12} {:>10} {:>8} {:>10} {:>9}",
        "Level", "Time", "Size", "Speedup", "Faster", "Size red.", "Smaller"
    );
    for (level, metrics) in &result.baselines {
        let level_comparison = &comparison.levels[level];
        println!(
            "{:<8} {:>14} {:>12} {:>10} {:>8} {:>10} {:>9}",
            level,
            format_duration(metrics.execution_time_avg),
            format_size(metrics.binary_size),
            level_comparison
                .speedup
                .map(format_speedup)
                .unwrap_or_else(not_available),
            verdict(level_comparison.ml_faster),
            level_comparison
                .size_reduction
                .map(format_percent)
                .unwrap_or_else(not_available),
            verdict(level_comparison.ml_smaller),
        );
    }

    if !result.features.is_empty() {
        println!();
        println!(
            "--- Features ({}) ---",
            result
                .feature_count
                .unwrap_or(result.features.len() as u64)
        );
        print_features(&result.features);
    }
}

fn print_metrics_block(metrics: &PerLevelMetrics) {
    println!(
        "Execution time:       {}",
        format_duration(metrics.execution_time_avg)
    );
    println!("Binary size:          {}", format_size(metrics.binary_size));
    println!(
        "Compile time:         {}",
        metrics
            .compile_time
            .map(format_duration)
            .unwrap_or_else(not_available)
    );
    println!(
        "Optimization time:    {}",
        metrics
            .optimization_time
            .map(format_duration)
            .unwrap_or_else(not_available)
    );
}

fn print_features(features: &FeatureMap) {
    for (name, value) in features {
        match value {
            FeatureValue::Number(number) => println!("  {:<32} {:.2}", name, number),
            FeatureValue::Text(text) => println!("  {:<32} {}", name, text),
        }
    }
}

/// Convert a workflow error into the message `main` prints. Compiler
/// diagnostics get their own preformatted block plus resubmit guidance.
fn render_error(error: WorkflowError) -> String {
    match error {
        WorkflowError::CompilationDiagnostic(diagnostic) => {
            eprintln!("Your C code has compilation errors:");
            eprintln!();
            eprintln!("{}", diagnostic);
            eprintln!();
            eprintln!(
                "Tip: fix the compilation errors and try again. Make sure your \
                 code compiles with standard C compilers."
            );
            "compilation failed".to_string()
        }
        WorkflowError::Network(_) => {
            format!(
                "{}. Please ensure the backend is running and accessible.",
                error
            )
        }
        other => other.to_string(),
    }
}
