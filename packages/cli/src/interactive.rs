//! Menu-driven reporting session.
//!
//! Keeps an in-memory [`ReportLog`] seeded with the demo reports. New
//! reports can be pre-filled from an AI suggestion, but every field is
//! still prompted and the reporter confirms before anything is submitted.

use std::path::Path;

use dialoguer::{Confirm, Input, Select};
use relief_map_ai::providers::ProviderSettings;
use relief_map_ai::{DamageSuggestion, LlmDamageExtractor};
use relief_map_analytics::ReportLog;
use relief_map_cli_utils::MultiProgress;
use relief_map_report_models::{
    AgeBucket, AgeBucketCounts, BusinessDetails, BusinessSize, DamageDetails, DamageType,
    HomeDetails, ReportDraft, VehicleDetails, VehicleType,
};

use crate::{contacts, photo, render, seed};

/// Number of reports shown by "Recent reports".
const RECENT_LIMIT: usize = 10;

/// Top-level actions in the session menu.
enum SessionAction {
    Submit,
    Recent,
    Summary,
    Contacts,
    Quit,
}

impl SessionAction {
    const ALL: &[Self] = &[
        Self::Submit,
        Self::Recent,
        Self::Summary,
        Self::Contacts,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Submit => "Submit a damage report",
            Self::Recent => "Recent reports",
            Self::Summary => "Summary statistics",
            Self::Contacts => "Emergency contacts",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive session until the reporter quits.
///
/// # Errors
///
/// Returns an error if the demo reports cannot be loaded or a prompt fails.
pub async fn run(
    multi: &MultiProgress,
    settings: &ProviderSettings,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut log = ReportLog::from_reports(seed::demo_reports()?);
    let extractor = crate::extractor(settings);

    println!("Relief Map");
    println!("{} report(s) loaded\n", log.len());

    let labels: Vec<&str> = SessionAction::ALL
        .iter()
        .map(SessionAction::label)
        .collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match SessionAction::ALL[idx] {
            SessionAction::Submit => {
                handle_submit(multi, &mut log, extractor.as_ref()).await?;
            }
            SessionAction::Recent => {
                print!("{}", render::report_table(log.iter().take(RECENT_LIMIT)));
            }
            SessionAction::Summary => print!("{}", render::summary(&log.summary())),
            SessionAction::Contacts => {
                print!("{}", render::contacts(&contacts::all_contacts()));
            }
            SessionAction::Quit => break,
        }
        println!();
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Report form
// ---------------------------------------------------------------------------

/// Walks the reporter through the report form and submits it.
async fn handle_submit(
    multi: &MultiProgress,
    log: &mut ReportLog,
    extractor: Option<&LlmDamageExtractor>,
) -> Result<(), Box<dyn std::error::Error>> {
    let description: String = Input::new()
        .with_prompt("Describe the damage (optional)")
        .allow_empty(true)
        .interact_text()?;

    let wants_suggestion = extractor.is_some()
        && !description.trim().is_empty()
        && Confirm::new()
            .with_prompt("Ask the AI to pre-fill the details?")
            .default(true)
            .interact()?;

    let suggestion = match extractor {
        Some(extractor) if wants_suggestion => {
            let suggestion = crate::ask_model(multi, extractor, &description).await;
            match &suggestion {
                Some(s) => println!("{}", render::suggestion(s)),
                None => println!("No suggestion available"),
            }
            suggestion
        }
        _ => None,
    };

    let types = DamageType::all();
    let type_labels: Vec<String> = types.iter().map(ToString::to_string).collect();
    let default_type = suggestion
        .as_ref()
        .and_then(|s| types.iter().position(|&t| t == s.damage_type()))
        .unwrap_or(0);
    let damage_type = types[Select::new()
        .with_prompt("Damage type")
        .items(&type_labels)
        .default(default_type)
        .interact()?];

    let details = prompt_details(prefill(damage_type, suggestion.as_ref()))?;

    let location: String = Input::new()
        .with_prompt("Location as \"lat, lng\"")
        .allow_empty(true)
        .validate_with(|input: &String| parse_location(input).map(|_| ()))
        .interact_text()?;

    let photo: String = Input::new()
        .with_prompt("Photo file (optional)")
        .allow_empty(true)
        .validate_with(|input: &String| {
            if input.trim().is_empty() {
                Ok(())
            } else {
                photo::data_url(Path::new(input.trim()))
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            }
        })
        .interact_text()?;

    let mut draft = ReportDraft::new(details).with_description(description);
    if let Ok(Some((lat, lng))) = parse_location(&location) {
        draft = draft.at(lat, lng);
    }
    if !photo.trim().is_empty() {
        draft = draft.with_image(photo::data_url(Path::new(photo.trim()))?);
    }

    if let Err(e) = draft.validate() {
        println!("Cannot submit: {e}");
        return Ok(());
    }

    let confirmed = Confirm::new()
        .with_prompt(format!("Submit {}?", render::details(&draft.details)))
        .default(true)
        .interact()?;
    if !confirmed {
        println!("Discarded.");
        return Ok(());
    }

    match log.submit(draft) {
        Ok(report) => println!("Submitted report {}", report.id),
        Err(e) => println!("Cannot submit: {e}"),
    }

    Ok(())
}

/// Prompts for every field of `defaults`' category, using its values as
/// the prompt defaults.
fn prompt_details(defaults: DamageDetails) -> Result<DamageDetails, dialoguer::Error> {
    Ok(match defaults {
        DamageDetails::Home(home) => {
            let mut defaults = AgeBucketCounts::from_ages(&home.member_ages);
            let details = loop {
                let mut counts = AgeBucketCounts::default();
                for &bucket in AgeBucket::all() {
                    let count: u32 = Input::new()
                        .with_prompt(format!("Residents aged {bucket}"))
                        .default(defaults.get(bucket).min(AgeBucketCounts::MAX_RESIDENTS))
                        .validate_with(|count: &u32| {
                            if *count <= AgeBucketCounts::MAX_RESIDENTS {
                                Ok(())
                            } else {
                                Err(format!("At most {}", AgeBucketCounts::MAX_RESIDENTS))
                            }
                        })
                        .interact_text()?;
                    match bucket {
                        AgeBucket::Age0To7 => counts.age_0_7 = count,
                        AgeBucket::Age7To18 => counts.age_7_18 = count,
                        AgeBucket::Age18To50 => counts.age_18_50 = count,
                        AgeBucket::Age50Plus => counts.age_50_plus = count,
                    }
                }
                match HomeDetails::from_age_buckets(counts, home.damage_percentage) {
                    Ok(details) => break details,
                    Err(e) => {
                        println!("{e}");
                        defaults = AgeBucketCounts::default();
                    }
                }
            };
            DamageDetails::Home(HomeDetails {
                damage_percentage: prompt_damage(home.damage_percentage)?,
                ..details
            })
        }
        DamageDetails::Business(business) => {
            let sizes = BusinessSize::all();
            let labels: Vec<String> = sizes.iter().map(ToString::to_string).collect();
            let default = business
                .size
                .and_then(|size| sizes.iter().position(|&s| s == size))
                .unwrap_or(0);
            let size = sizes[Select::new()
                .with_prompt("Business size")
                .items(&labels)
                .default(default)
                .interact()?];
            let damage_percentage = prompt_damage(business.damage_percentage)?;
            DamageDetails::Business(BusinessDetails {
                size: Some(size),
                damage_percentage,
            })
        }
        DamageDetails::Vehicle(vehicle) => {
            let kinds = VehicleType::all();
            let mut labels: Vec<String> = kinds.iter().map(ToString::to_string).collect();
            labels.push("Other".to_string());
            let default = vehicle
                .vehicle_type
                .and_then(|t| kinds.iter().position(|&k| k == t))
                .unwrap_or(0);
            let idx = Select::new()
                .with_prompt("Vehicle type")
                .items(&labels)
                .default(default)
                .interact()?;
            let count: u32 = Input::new()
                .with_prompt("Number of vehicles")
                .default(vehicle.count)
                .interact_text()?;
            DamageDetails::Vehicle(VehicleDetails {
                vehicle_type: kinds.get(idx).copied(),
                count,
            })
        }
    })
}

fn prompt_damage(default: u8) -> Result<u8, dialoguer::Error> {
    Input::new()
        .with_prompt("Damage percentage (0-100)")
        .default(default)
        .interact_text()
}

/// Starting values for the form once the reporter picks a category.
///
/// Uses the suggestion when it is for the same category, otherwise the
/// empty form (a vehicle report starts at one vehicle, a business at the
/// first size in the picker).
fn prefill(damage_type: DamageType, suggestion: Option<&DamageSuggestion>) -> DamageDetails {
    if let Some(suggestion) = suggestion
        && suggestion.damage_type() == damage_type
    {
        return suggestion.details.clone();
    }

    match damage_type {
        DamageType::Home => DamageDetails::Home(HomeDetails::default()),
        DamageType::Business => DamageDetails::Business(BusinessDetails {
            size: Some(BusinessSize::default()),
            damage_percentage: 0,
        }),
        DamageType::Vehicle => DamageDetails::Vehicle(VehicleDetails {
            vehicle_type: None,
            count: 1,
        }),
    }
}

/// Parses `"lat, lng"`. Blank input means no location was picked.
fn parse_location(input: &str) -> Result<Option<(f64, f64)>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let Some((lat, lng)) = input.split_once(',') else {
        return Err("Expected \"lat, lng\"".to_string());
    };
    let lat: f64 = lat.trim().parse().map_err(|_| format!("Invalid latitude: {lat}"))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("Invalid longitude: {lng}"))?;

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(format!("Location ({lat}, {lng}) is off the map"));
    }

    Ok(Some((lat, lng)))
}
