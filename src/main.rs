mod cli;
mod config;
mod error;
mod insights;
mod model;
mod report;
mod scoring;
mod telemetry;
mod types;

use crate::error::{Result, RiskError};
use crate::insights::command::CommandInsightGenerator;
use crate::insights::InsightGenerator;
use crate::model::ModelArtifact;
use crate::types::config::RiskConfig;
use crate::types::profile::ApplicantProfile;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const ADVISORIES: i32 = 1;
    pub const INVALID_PROFILE: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn read_profile(path: &Path) -> Result<ApplicantProfile> {
    if !path.exists() {
        return Err(RiskError::InvalidProfile(format!(
            "profile not found: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed: std::result::Result<ApplicantProfile, String> = if is_json {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        toml::from_str(&content).map_err(|e| e.to_string())
    };
    parsed.map_err(|e| RiskError::InvalidProfile(format!("{}: {}", path.display(), e)))
}

fn resolve_model_path(override_path: Option<&PathBuf>, config: &RiskConfig) -> PathBuf {
    override_path
        .cloned()
        .unwrap_or_else(|| config.model_path())
}

fn run(cli: cli::Cli, config: RiskConfig) -> Result<i32> {
    match cli.command {
        cli::Commands::Assess(cmd) => {
            let profile = read_profile(&cmd.profile)?;
            profile.validate()?;

            let artifact = ModelArtifact::load(&resolve_model_path(cmd.model.as_ref(), &config))?;
            let assessment = scoring::assess_credit(&profile, &artifact, config.score_scale())?;

            let narrative = if cmd.no_insights {
                None
            } else {
                let generator = config.insight_command().map(|(program, args, timeout)| {
                    CommandInsightGenerator::new(
                        program,
                        args.to_vec(),
                        Duration::from_secs(timeout),
                    )
                });
                Some(insights::narrate(
                    &assessment,
                    generator.as_ref().map(|g| g as &dyn InsightGenerator),
                ))
            };

            let output_format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
            };
            let rendered = report::render(
                &report::AssessmentReport {
                    assessment: &assessment,
                    narrative: narrative.as_ref(),
                },
                output_format,
            )?;
            println!("{rendered}");

            for advisory in &assessment.advisories {
                eprintln!("warning: {}", advisory.message());
            }
            let fell_back = narrative
                .as_ref()
                .is_some_and(insights::Narrative::is_fallback);

            if fell_back || !assessment.advisories.is_empty() {
                Ok(exit_code::ADVISORIES)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Validate(cmd) => {
            let path = resolve_model_path(cmd.model.as_ref(), &config);
            let artifact = ModelArtifact::load(&path)?;
            let degenerate = artifact.degenerate_scaled_features();

            println!("model: {}", path.display());
            println!("features: {}", artifact.features().len());
            println!("scaled features: {}", artifact.cols_to_scale().len());
            println!("placeholders: {}", artifact.placeholders().len());
            if degenerate.is_empty() {
                println!("degenerate ranges: none");
            } else {
                println!("degenerate ranges: {}", degenerate.join(", "));
            }
            if let Some(fingerprint) = artifact.fingerprint() {
                println!("fingerprint: sha256:{fingerprint}");
            }
            println!("model ok");

            if degenerate.is_empty() {
                Ok(exit_code::SUCCESS)
            } else {
                Ok(exit_code::ADVISORIES)
            }
        }
        cli::Commands::Bands => {
            let scale = config.score_scale();
            let lowest = scoring::scorer::credit_score(1.0, scale);
            let highest = scoring::scorer::credit_score(0.0, scale);

            println!(
                "score scale: base {} + {} x non-default probability",
                scale.base_score, scale.scale_length
            );
            println!("reachable scores: {lowest}..={highest}");
            println!("- Poor: [300, 500)");
            println!("- Average: [500, 650)");
            println!("- Good: [650, 750)");
            println!("- Excellent: [750, 900]");

            if lowest < 300 || highest > 900 {
                println!("- Undefined: scores outside [300, 900]");
                eprintln!("warning: configured scale reaches scores with no rating band");
                Ok(exit_code::ADVISORIES)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
    }
}

fn main() {
    let cli = cli::Cli::parse();

    let outcome = config::load_config(&cli.config_dir).and_then(|config| {
        let level = telemetry::log_level(cli.verbose, cli.quiet, config.log_level());
        telemetry::init(&level)?;
        tracing::debug!(layers = ?config.sources, "configuration loaded");
        run(cli, config)
    });

    match outcome {
        Ok(code) => {
            if code != exit_code::SUCCESS {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = match e {
                RiskError::InvalidProfile(_) => exit_code::INVALID_PROFILE,
                _ => exit_code::RUNTIME_FAILURE,
            };
            std::process::exit(code);
        }
    }
}
