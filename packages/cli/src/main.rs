#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the relief map.
//!
//! ```text
//! relief_map summarize <FILE> [--json]
//! relief_map extract <TEXT>...
//! relief_map ages --age-0-7 2 --age-18-50 2
//! relief_map contacts
//! ```
//!
//! Running `relief_map` with no subcommand starts an interactive reporting
//! session over the demo reports.
//!
//! `--provider` and `--model` override `AI_PROVIDER` and `AI_MODEL` for
//! anything that asks a model for a suggestion.

mod contacts;
mod interactive;
mod photo;
mod render;
mod seed;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use relief_map_ai::providers::ProviderSettings;
use relief_map_ai::{DamageExtractor, LlmDamageExtractor};
use relief_map_analytics::summarize;
use relief_map_cli_utils::{MultiProgress, Spinner};
use relief_map_report_models::{AgeBucketCounts, DamageReport};

#[derive(Parser)]
#[command(
    name = "relief_map",
    about = "Collect disaster damage reports and summarize them"
)]
struct Cli {
    /// AI provider for suggestions: gemini, anthropic, or openai
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Model identifier passed to the AI provider
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a JSON array of damage reports
    Summarize {
        /// Path to the reports file
        file: PathBuf,
        /// Print the summary as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Suggest a report category and details from a free-text description
    Extract {
        /// Description of the damage
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Expand per-bucket head counts into representative member ages
    Ages {
        /// People aged 7 or younger
        #[arg(long = "age-0-7", default_value_t = 0, value_parser = bucket_count())]
        age_0_7: u32,
        /// People older than 7, up to 18
        #[arg(long = "age-7-18", default_value_t = 0, value_parser = bucket_count())]
        age_7_18: u32,
        /// People older than 18, younger than 50
        #[arg(long = "age-18-50", default_value_t = 0, value_parser = bucket_count())]
        age_18_50: u32,
        /// People 50 or older
        #[arg(long = "age-50-plus", default_value_t = 0, value_parser = bucket_count())]
        age_50_plus: u32,
    },
    /// List emergency contact numbers
    Contacts,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = relief_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let settings = ProviderSettings {
        provider: cli.provider,
        model: cli.model,
        base_url: None,
    };

    let Some(command) = cli.command else {
        return interactive::run(&multi, &settings).await;
    };

    match command {
        Commands::Summarize { file, json } => {
            let contents = std::fs::read_to_string(&file)?;
            let reports: Vec<DamageReport> = serde_json::from_str(&contents)?;
            log::debug!("Loaded {} report(s) from {}", reports.len(), file.display());

            let summary = summarize(&reports);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", render::summary(&summary));
            }
        }
        Commands::Extract { text } => {
            let text = text.join(" ");
            let extractor = extractor(&settings);
            let suggestion = match &extractor {
                Some(extractor) => ask_model(&multi, extractor, &text).await,
                None => None,
            };

            match suggestion {
                Some(suggestion) => println!("{}", render::suggestion(&suggestion)),
                None => println!("No suggestion available"),
            }
        }
        Commands::Ages {
            age_0_7,
            age_7_18,
            age_18_50,
            age_50_plus,
        } => {
            let counts = AgeBucketCounts {
                age_0_7,
                age_7_18,
                age_18_50,
                age_50_plus,
            };
            let ages = counts.member_ages()?;
            println!("Residents: {}", ages.len());
            println!("Member ages: {}", serde_json::to_string(&ages)?);
        }
        Commands::Contacts => {
            print!("{}", render::contacts(&contacts::all_contacts()));
        }
    }

    Ok(())
}

/// Per-bucket head counts are capped at the largest household a report may
/// list; the sum is checked again when the ages are expanded.
fn bucket_count() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(0..=i64::from(AgeBucketCounts::MAX_RESIDENTS))
}

/// Builds the model-backed extractor, or `None` if no provider is
/// configured. Suggestions are optional, so this never fails the command.
fn extractor(settings: &ProviderSettings) -> Option<LlmDamageExtractor> {
    match LlmDamageExtractor::from_settings(settings) {
        Ok(extractor) => Some(extractor),
        Err(e) => {
            log::warn!("AI suggestions disabled: {e}");
            None
        }
    }
}

/// Runs one suggestion request behind a spinner.
async fn ask_model(
    multi: &MultiProgress,
    extractor: &dyn DamageExtractor,
    text: &str,
) -> Option<relief_map_ai::DamageSuggestion> {
    let spinner = Spinner::start(multi, "Analyzing description...");
    let suggestion = relief_map_ai::suggest(extractor, text).await;
    if suggestion.is_some() {
        spinner.finish("Description analyzed");
    } else {
        spinner.finish_and_clear();
    }
    suggestion
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_counts_above_the_household_cap_are_rejected() {
        let too_many = (AgeBucketCounts::MAX_RESIDENTS + 1).to_string();
        assert!(Cli::try_parse_from(["relief_map", "ages", "--age-0-7", &too_many]).is_err());
        assert!(
            Cli::try_parse_from(["relief_map", "ages", "--age-0-7", "4294967295"]).is_err()
        );
    }

    #[test]
    fn bucket_counts_at_the_cap_are_accepted() {
        let cap = AgeBucketCounts::MAX_RESIDENTS.to_string();
        let cli = Cli::try_parse_from(["relief_map", "ages", "--age-50-plus", &cap]).unwrap();
        let Some(Commands::Ages { age_50_plus, .. }) = cli.command else {
            panic!("expected the ages command");
        };
        assert_eq!(age_50_plus, AgeBucketCounts::MAX_RESIDENTS);
    }

    #[test]
    fn summed_buckets_over_the_cap_fail_to_expand() {
        let cap = AgeBucketCounts::MAX_RESIDENTS.to_string();
        let cli = Cli::try_parse_from([
            "relief_map",
            "ages",
            "--age-0-7",
            &cap,
            "--age-50-plus",
            "1",
        ])
        .unwrap();
        let Some(Commands::Ages {
            age_0_7,
            age_7_18,
            age_18_50,
            age_50_plus,
        }) = cli.command
        else {
            panic!("expected the ages command");
        };
        let counts = AgeBucketCounts {
            age_0_7,
            age_7_18,
            age_18_50,
            age_50_plus,
        };
        assert!(counts.member_ages().is_err());
    }
}
