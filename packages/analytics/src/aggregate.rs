//! Reduction of damage reports into summary statistics.

use relief_map_analytics_models::{StatsSummary, VehicleCategory};
use relief_map_report_models::{AgeBucket, DamageDetails, DamageReport, DamageSeverity};

/// Computes summary statistics over `reports`.
///
/// Accepts anything that yields report references (a slice, a `Vec`, a
/// [`crate::ReportLog`]) and only reads from them. Every statistic is a sum
/// or a count, so the result does not depend on the order of the reports.
///
/// * Each report contributes only through the payload of its own category.
/// * Demographics are counted per entry in `member_ages`, independently of
///   the `residents` figure.
/// * A vehicle report adds its vehicle count to its category; reports
///   without a recognized type go to [`VehicleCategory::Other`].
/// * The home damage average is rounded half-up and is 0 without homes.
#[must_use]
pub fn summarize<'a, I>(reports: I) -> StatsSummary
where
    I: IntoIterator<Item = &'a DamageReport>,
{
    let mut summary = StatsSummary::default();
    let mut home_damage_total: u64 = 0;

    for report in reports {
        match &report.details {
            DamageDetails::Home(home) => {
                summary.counts.homes += 1;
                summary.total_residents += u64::from(home.residents);
                home_damage_total += u64::from(home.damage_percentage);

                for &age in &home.member_ages {
                    summary.age_distribution.record(AgeBucket::classify(age));
                }

                summary
                    .severity_distribution
                    .record(DamageSeverity::from_percentage(home.damage_percentage));
            }
            DamageDetails::Business(business) => {
                summary.counts.businesses += 1;
                if let Some(size) = business.size {
                    summary.business_size_distribution.record(size);
                }
                summary
                    .severity_distribution
                    .record(DamageSeverity::from_percentage(business.damage_percentage));
            }
            DamageDetails::Vehicle(vehicle) => {
                summary.counts.vehicles += 1;
                summary.vehicle_type_distribution.add(
                    VehicleCategory::from(vehicle.vehicle_type),
                    u64::from(vehicle.count),
                );
            }
        }
    }

    summary.avg_damage_percentage = rounded_mean(home_damage_total, summary.counts.homes);

    log::trace!(
        "summarize: {} homes, {} businesses, {} vehicle reports",
        summary.counts.homes,
        summary.counts.businesses,
        summary.counts.vehicles
    );

    summary
}

/// Integer mean rounded half-up; 0 for an empty set.
fn rounded_mean(total: u64, count: u64) -> u8 {
    if count == 0 {
        return 0;
    }
    let mean = (total * 2 + count) / (count * 2);
    // Percentages are capped at 100, so the mean always fits.
    u8::try_from(mean).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use relief_map_analytics_models::VehicleCategory;
    use relief_map_report_models::{
        AgeBucket, AgeBucketCounts, BusinessDetails, BusinessSize, Coordinates, DamageDetails,
        DamageReport, DamageSeverity, HomeDetails, VehicleDetails, VehicleType,
    };

    use super::*;

    fn report(id: &str, details: DamageDetails) -> DamageReport {
        DamageReport {
            id: id.to_string(),
            location: Coordinates {
                lat: 6.92,
                lng: 79.86,
            },
            timestamp: 1_764_547_200_000,
            description: None,
            image: None,
            details,
        }
    }

    fn home(id: &str, damage: u8, ages: &[u32]) -> DamageReport {
        report(
            id,
            DamageDetails::Home(HomeDetails {
                residents: u32::try_from(ages.len()).unwrap(),
                damage_percentage: damage,
                member_ages: ages.to_vec(),
            }),
        )
    }

    fn business(id: &str, size: BusinessSize, damage: u8) -> DamageReport {
        report(
            id,
            DamageDetails::Business(BusinessDetails {
                size: Some(size),
                damage_percentage: damage,
            }),
        )
    }

    fn vehicle(id: &str, vehicle_type: Option<VehicleType>, count: u32) -> DamageReport {
        report(
            id,
            DamageDetails::Vehicle(VehicleDetails {
                vehicle_type,
                count,
            }),
        )
    }

    /// The five reports the field client starts with.
    fn field_sample() -> Vec<DamageReport> {
        vec![
            home("1", 80, &[45, 42, 12, 8]),
            business("2", BusinessSize::Medium, 100),
            vehicle("3", Some(VehicleType::Van), 2),
            home("4", 40, &[70, 68]),
            business("5", BusinessSize::Small, 75),
        ]
    }

    #[test]
    fn empty_input_yields_zeroed_summary() {
        let reports: Vec<DamageReport> = Vec::new();
        let summary = summarize(&reports);

        assert_eq!(summary, StatsSummary::default());
        assert_eq!(summary.counts.total(), 0);
        assert_eq!(summary.avg_damage_percentage, 0);
        for bucket in AgeBucket::all() {
            assert_eq!(summary.age_distribution.get(*bucket), 0);
        }
        for size in BusinessSize::all() {
            assert_eq!(summary.business_size_distribution.get(*size), 0);
        }
        for category in VehicleCategory::all() {
            assert_eq!(summary.vehicle_type_distribution.get(*category), 0);
        }
    }

    #[test]
    fn summarizes_field_sample() {
        let summary = summarize(&field_sample());

        assert_eq!(summary.counts.homes, 2);
        assert_eq!(summary.counts.businesses, 2);
        assert_eq!(summary.counts.vehicles, 1);
        assert_eq!(summary.total_residents, 6);
        assert_eq!(summary.avg_damage_percentage, 60);
        assert_eq!(summary.age_distribution.age_0_7, 0);
        assert_eq!(summary.age_distribution.age_7_18, 2);
        assert_eq!(summary.age_distribution.age_18_50, 2);
        assert_eq!(summary.age_distribution.age_50_plus, 2);
        assert_eq!(summary.business_size_distribution.small, 1);
        assert_eq!(summary.business_size_distribution.medium, 1);
        assert_eq!(summary.business_size_distribution.large, 0);
        assert_eq!(summary.vehicle_type_distribution.get(VehicleCategory::Van), 2);
        assert_eq!(summary.severity_distribution.get(DamageSeverity::Minor), 1);
        assert_eq!(summary.severity_distribution.get(DamageSeverity::Moderate), 1);
        assert_eq!(summary.severity_distribution.get(DamageSeverity::Severe), 2);
    }

    #[test]
    fn result_is_order_invariant() {
        let reports = field_sample();
        let expected = summarize(&reports);

        let mut reversed = reports.clone();
        reversed.reverse();
        assert_eq!(summarize(&reversed), expected);

        let mut rotated = reports;
        for _ in 0..rotated.len() {
            rotated.rotate_left(1);
            assert_eq!(summarize(&rotated), expected);
        }
    }

    #[test]
    fn type_counts_partition_the_input() {
        let reports = field_sample();
        let summary = summarize(&reports);
        assert_eq!(summary.counts.total(), reports.len() as u64);
    }

    #[test]
    fn age_boundaries_bucket_exactly_once() {
        let summary = summarize(&[home("h", 0, &[7, 8, 18, 19, 49, 50])]);

        assert_eq!(summary.age_distribution.age_0_7, 1);
        assert_eq!(summary.age_distribution.age_7_18, 2);
        assert_eq!(summary.age_distribution.age_18_50, 2);
        assert_eq!(summary.age_distribution.age_50_plus, 1);
        assert_eq!(summary.age_distribution.total(), 6);
    }

    #[test]
    fn average_damage_rounds_half_up() {
        let summary = summarize(&[home("a", 10, &[]), home("b", 15, &[])]);
        assert_eq!(summary.avg_damage_percentage, 13);

        let summary = summarize(&[home("a", 10, &[]), home("b", 14, &[])]);
        assert_eq!(summary.avg_damage_percentage, 12);

        let summary = summarize(&[home("a", 1, &[]), home("b", 1, &[]), home("c", 2, &[])]);
        assert_eq!(summary.avg_damage_percentage, 1);
    }

    #[test]
    fn average_ignores_business_damage() {
        let summary = summarize(&[home("a", 20, &[]), business("b", BusinessSize::Large, 100)]);
        assert_eq!(summary.avg_damage_percentage, 20);
    }

    #[test]
    fn vehicle_units_are_summed_per_type() {
        let summary = summarize(&[
            vehicle("a", Some(VehicleType::Van), 2),
            vehicle("b", Some(VehicleType::Van), 3),
        ]);

        assert_eq!(summary.counts.vehicles, 2);
        assert_eq!(summary.vehicle_type_distribution.get(VehicleCategory::Van), 5);
        assert_eq!(summary.vehicle_type_distribution.total_units(), 5);
    }

    #[test]
    fn untyped_vehicles_go_to_other() {
        let summary = summarize(&[vehicle("a", None, 4), vehicle("b", Some(VehicleType::Bus), 1)]);

        assert_eq!(summary.vehicle_type_distribution.get(VehicleCategory::Other), 4);
        assert_eq!(summary.vehicle_type_distribution.get(VehicleCategory::Bus), 1);
    }

    #[test]
    fn business_sizes_are_always_complete() {
        let summary = summarize(&[
            business("a", BusinessSize::Small, 10),
            business("b", BusinessSize::Small, 90),
        ]);

        assert_eq!(summary.business_size_distribution.small, 2);
        assert_eq!(summary.business_size_distribution.medium, 0);
        assert_eq!(summary.business_size_distribution.large, 0);
    }

    #[test]
    fn businesses_without_a_size_are_not_bucketed() {
        let reports: Vec<DamageReport> = serde_json::from_value(serde_json::json!([
            { "id": "a", "type": "BUSINESS" },
            { "id": "b", "type": "BUSINESS", "businessDetails": { "size": "HUGE", "damagePercentage": 60 } },
            { "id": "c", "type": "BUSINESS", "businessDetails": { "size": "MEDIUM", "damagePercentage": 20 } }
        ]))
        .unwrap();

        let summary = summarize(&reports);

        assert_eq!(summary.counts.businesses, 3);
        assert_eq!(summary.business_size_distribution.small, 0);
        assert_eq!(summary.business_size_distribution.medium, 1);
        assert_eq!(summary.business_size_distribution.large, 0);
    }

    #[test]
    fn demographics_follow_ages_not_residents() {
        let mismatched = report(
            "h",
            DamageDetails::Home(HomeDetails {
                residents: 5,
                damage_percentage: 0,
                member_ages: vec![30, 31],
            }),
        );
        let summary = summarize(&[mismatched]);

        assert_eq!(summary.total_residents, 5);
        assert_eq!(summary.age_distribution.total(), 2);
    }

    #[test]
    fn input_is_left_untouched() {
        let reports = field_sample();
        let snapshot = reports.clone();

        let _ = summarize(&reports);

        assert_eq!(reports, snapshot);
    }

    #[test]
    fn synthesized_ages_rebucket_to_their_counts() {
        let counts = AgeBucketCounts {
            age_0_7: 2,
            age_7_18: 1,
            age_18_50: 0,
            age_50_plus: 3,
        };
        let details = DamageDetails::Home(HomeDetails::from_age_buckets(counts, 50).unwrap());
        let summary = summarize(&[report("h", details)]);

        for bucket in AgeBucket::all() {
            assert_eq!(
                summary.age_distribution.get(*bucket),
                u64::from(counts.get(*bucket))
            );
        }
        assert_eq!(summary.total_residents, 6);
    }
}
