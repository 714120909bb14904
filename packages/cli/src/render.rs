//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use relief_map_ai::DamageSuggestion;
use relief_map_analytics_models::StatsSummary;
use relief_map_report_models::{
    AgeBucket, BusinessSize, DamageDetails, DamageReport, DamageSeverity,
};

use crate::contacts::{EmergencyContact, NOTICE};

/// Formats the summary as the stat cards and distribution tables.
#[must_use]
pub fn summary(summary: &StatsSummary) -> String {
    let mut out = String::new();

    writeln!(out, "{:<28} {}", "Homes affected", summary.counts.homes).unwrap();
    writeln!(out, "{:<28} {}", "Businesses affected", summary.counts.businesses).unwrap();
    writeln!(out, "{:<28} {}", "Vehicle reports", summary.counts.vehicles).unwrap();
    writeln!(out, "{:<28} {}", "People affected", summary.total_residents).unwrap();
    writeln!(
        out,
        "{:<28} {}%",
        "Average home damage", summary.avg_damage_percentage
    ).unwrap();

    writeln!(out, "\nAge demographics").unwrap();
    for &bucket in AgeBucket::all() {
        writeln!(
            out,
            "  {:<10} {}",
            bucket,
            summary.age_distribution.get(bucket)
        ).unwrap();
    }

    writeln!(out, "\nBusinesses by size").unwrap();
    for &size in BusinessSize::all() {
        writeln!(
            out,
            "  {:<10} {}",
            size,
            summary.business_size_distribution.get(size)
        ).unwrap();
    }

    writeln!(out, "\nVehicles by type").unwrap();
    for (category, units) in summary.vehicle_type_distribution.iter() {
        writeln!(out, "  {category:<10} {units}").unwrap();
    }

    writeln!(out, "\nDamage severity (homes and businesses)").unwrap();
    for &severity in DamageSeverity::all() {
        writeln!(
            out,
            "  {:<10} {}",
            severity,
            summary.severity_distribution.get(severity)
        ).unwrap();
    }

    out
}

/// One-line description of a report's payload.
#[must_use]
pub fn details(details: &DamageDetails) -> String {
    match details {
        DamageDetails::Home(home) => format!(
            "{} resident(s), {}% damaged",
            home.residents, home.damage_percentage
        ),
        DamageDetails::Business(business) => {
            let size = business
                .size
                .map_or_else(|| "unsized".to_string(), |s| s.to_string());
            format!("{size} business, {}% damaged", business.damage_percentage)
        }
        DamageDetails::Vehicle(vehicle) => {
            let kind = vehicle
                .vehicle_type
                .map_or_else(|| "unknown type".to_string(), |t| t.to_string());
            format!("{} x {kind}", vehicle.count)
        }
    }
}

/// Formats reports as a table, in the order given.
#[must_use]
pub fn report_table<'a>(reports: impl IntoIterator<Item = &'a DamageReport>) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{:<10} {:<22} {:<36} DESCRIPTION",
        "TYPE", "LOCATION", "DETAILS"
    ).unwrap();
    writeln!(out, "{}", "-".repeat(100)).unwrap();

    let mut count = 0_usize;
    for report in reports {
        count += 1;
        let location = format!("{:.4}, {:.4}", report.location.lat, report.location.lng);
        let description = report.description.as_deref().unwrap_or("");
        let description = if description.chars().count() > 40 {
            format!("{}...", description.chars().take(37).collect::<String>())
        } else {
            description.to_string()
        };
        writeln!(
            out,
            "{:<10} {:<22} {:<36} {}",
            report.damage_type(),
            location,
            details(&report.details),
            description
        ).unwrap();
    }

    writeln!(out, "\n{count} report(s)").unwrap();
    out
}

/// Formats an AI suggestion for review.
#[must_use]
pub fn suggestion(suggestion: &DamageSuggestion) -> String {
    format!(
        "Suggested {}: {} (confidence {:.0}%)",
        suggestion.damage_type(),
        details(&suggestion.details),
        suggestion.confidence * 100.0
    )
}

/// Formats the emergency contact page.
#[must_use]
pub fn contacts(contacts: &[EmergencyContact]) -> String {
    let mut out = String::new();
    writeln!(out, "{NOTICE}\n").unwrap();
    for contact in contacts {
        writeln!(out, "  {:<16} {:>6}", contact.name, contact.number).unwrap();
        if let Some(note) = &contact.note {
            writeln!(out, "  {:<16} {note}", "").unwrap();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use relief_map_analytics::summarize;
    use relief_map_report_models::{BusinessDetails, HomeDetails, VehicleDetails, VehicleType};

    use super::*;
    use crate::contacts::all_contacts;
    use crate::seed::demo_reports;

    #[test]
    fn summary_lists_every_category() {
        let text = summary(&StatsSummary::default());
        for label in ["0-7", "7-18", "18-50", "50+", "SMALL", "MEDIUM", "LARGE", "Other", "MINOR"] {
            assert!(text.contains(label), "missing {label}");
        }
    }

    #[test]
    fn summary_shows_the_average() {
        let text = summary(&summarize(&demo_reports().unwrap()));
        assert!(text.contains("60%"));
    }

    #[test]
    fn vehicle_without_type() {
        let text = details(&DamageDetails::Vehicle(VehicleDetails {
            vehicle_type: None,
            count: 3,
        }));
        assert_eq!(text, "3 x unknown type");

        let text = details(&DamageDetails::Vehicle(VehicleDetails {
            vehicle_type: Some(VehicleType::Lorry),
            count: 1,
        }));
        assert_eq!(text, "1 x LORRY");
    }

    #[test]
    fn business_without_size() {
        let text = details(&DamageDetails::Business(BusinessDetails {
            size: None,
            damage_percentage: 35,
        }));
        assert_eq!(text, "unsized business, 35% damaged");
    }

    #[test]
    fn home_details_line() {
        let text = details(&DamageDetails::Home(HomeDetails {
            residents: 4,
            damage_percentage: 80,
            member_ages: vec![45, 42, 12, 8],
        }));
        assert_eq!(text, "4 resident(s), 80% damaged");
    }

    #[test]
    fn report_table_counts_rows() {
        let reports = demo_reports().unwrap();
        let text = report_table(&reports);
        assert!(text.contains("5 report(s)"));
        assert!(text.contains("Roof collapsed due to landslide."));
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let mut reports = demo_reports().unwrap();
        reports.truncate(1);
        reports[0].description = Some("x".repeat(80));
        let text = report_table(&reports);
        assert!(text.contains(&format!("{}...", "x".repeat(37))));
        assert!(!text.contains(&"x".repeat(38)));
    }

    #[test]
    fn contacts_lead_with_the_notice() {
        let text = contacts(&all_contacts());
        assert!(text.starts_with(NOTICE));
        assert!(text.contains("1990"));
    }
}
