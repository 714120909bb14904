#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary statistics produced by the report aggregator.
//!
//! Every distribution type always carries all of its categories, with zero
//! for categories nothing was counted in, so consumers (stat cards, chart
//! renderers) can look up any known key without handling absence.

use std::collections::BTreeMap;

use relief_map_report_models::{AgeBucket, BusinessSize, DamageSeverity, VehicleType};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of reports of each damage type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCounts {
    /// Home reports.
    pub homes: u64,
    /// Business reports.
    pub businesses: u64,
    /// Vehicle reports (reports, not vehicles).
    pub vehicles: u64,
}

impl TypeCounts {
    /// Total number of reports.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.homes + self.businesses + self.vehicles
    }
}

/// People per age bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeDistribution {
    /// Aged 7 or younger.
    #[serde(rename = "0-7")]
    pub age_0_7: u64,
    /// Older than 7, up to 18.
    #[serde(rename = "7-18")]
    pub age_7_18: u64,
    /// Older than 18, younger than 50.
    #[serde(rename = "18-50")]
    pub age_18_50: u64,
    /// 50 or older.
    #[serde(rename = "50+")]
    pub age_50_plus: u64,
}

impl AgeDistribution {
    /// People counted in `bucket`.
    #[must_use]
    pub const fn get(&self, bucket: AgeBucket) -> u64 {
        match bucket {
            AgeBucket::Age0To7 => self.age_0_7,
            AgeBucket::Age7To18 => self.age_7_18,
            AgeBucket::Age18To50 => self.age_18_50,
            AgeBucket::Age50Plus => self.age_50_plus,
        }
    }

    /// Counts one person in `bucket`.
    pub const fn record(&mut self, bucket: AgeBucket) {
        match bucket {
            AgeBucket::Age0To7 => self.age_0_7 += 1,
            AgeBucket::Age7To18 => self.age_7_18 += 1,
            AgeBucket::Age18To50 => self.age_18_50 += 1,
            AgeBucket::Age50Plus => self.age_50_plus += 1,
        }
    }

    /// Total people across buckets.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.age_0_7 + self.age_7_18 + self.age_18_50 + self.age_50_plus
    }
}

/// Business reports per size class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct BusinessSizeDistribution {
    /// Small businesses.
    pub small: u64,
    /// Medium businesses.
    pub medium: u64,
    /// Large businesses.
    pub large: u64,
}

impl BusinessSizeDistribution {
    /// Reports counted for `size`.
    #[must_use]
    pub const fn get(&self, size: BusinessSize) -> u64 {
        match size {
            BusinessSize::Small => self.small,
            BusinessSize::Medium => self.medium,
            BusinessSize::Large => self.large,
        }
    }

    /// Counts one report of `size`.
    pub const fn record(&mut self, size: BusinessSize) {
        match size {
            BusinessSize::Small => self.small += 1,
            BusinessSize::Medium => self.medium += 1,
            BusinessSize::Large => self.large += 1,
        }
    }
}

/// Home and business reports per damage severity band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SeverityDistribution {
    /// Up to 40% damaged.
    pub minor: u64,
    /// 41-75% damaged.
    pub moderate: u64,
    /// Over 75% damaged.
    pub severe: u64,
}

impl SeverityDistribution {
    /// Reports counted in `severity`.
    #[must_use]
    pub const fn get(&self, severity: DamageSeverity) -> u64 {
        match severity {
            DamageSeverity::Minor => self.minor,
            DamageSeverity::Moderate => self.moderate,
            DamageSeverity::Severe => self.severe,
        }
    }

    /// Counts one report in `severity`.
    pub const fn record(&mut self, severity: DamageSeverity) {
        match severity {
            DamageSeverity::Minor => self.minor += 1,
            DamageSeverity::Moderate => self.moderate += 1,
            DamageSeverity::Severe => self.severe += 1,
        }
    }
}

/// Key of the vehicle distribution: a known [`VehicleType`] or the catch-all.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleCategory {
    /// Motorcycles and bicycles
    Bike,
    /// Private cars
    Car,
    /// Vans and minibuses
    Van,
    /// Three-wheelers and taxis
    Cab,
    /// Trucks and lorries
    Lorry,
    /// Buses
    Bus,
    /// Missing or unrecognized vehicle type
    #[serde(rename = "Other")]
    #[strum(serialize = "Other")]
    Other,
}

impl VehicleCategory {
    /// Returns all variants of this enum, catch-all last.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bike,
            Self::Car,
            Self::Van,
            Self::Cab,
            Self::Lorry,
            Self::Bus,
            Self::Other,
        ]
    }
}

impl From<VehicleType> for VehicleCategory {
    fn from(value: VehicleType) -> Self {
        match value {
            VehicleType::Bike => Self::Bike,
            VehicleType::Car => Self::Car,
            VehicleType::Van => Self::Van,
            VehicleType::Cab => Self::Cab,
            VehicleType::Lorry => Self::Lorry,
            VehicleType::Bus => Self::Bus,
        }
    }
}

impl From<Option<VehicleType>> for VehicleCategory {
    fn from(value: Option<VehicleType>) -> Self {
        value.map_or(Self::Other, Self::from)
    }
}

/// Vehicle units per category.
///
/// Always holds every [`VehicleCategory`]; a report adds its vehicle count
/// to its category, not 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleTypeDistribution(BTreeMap<VehicleCategory, u64>);

impl Default for VehicleTypeDistribution {
    fn default() -> Self {
        Self(
            VehicleCategory::all()
                .iter()
                .map(|&category| (category, 0))
                .collect(),
        )
    }
}

impl VehicleTypeDistribution {
    /// Units counted for `category`.
    #[must_use]
    pub fn get(&self, category: VehicleCategory) -> u64 {
        self.0.get(&category).copied().unwrap_or(0)
    }

    /// Adds `units` vehicles to `category`.
    pub fn add(&mut self, category: VehicleCategory, units: u64) {
        *self.0.entry(category).or_insert(0) += units;
    }

    /// Total vehicle units across categories.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.0.values().sum()
    }

    /// Iterates `(category, units)` in [`VehicleCategory::all`] order.
    pub fn iter(&self) -> impl Iterator<Item = (VehicleCategory, u64)> + '_ {
        self.0.iter().map(|(&category, &units)| (category, units))
    }
}

/// Snapshot statistics over a report collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    /// Reports per damage type.
    pub counts: TypeCounts,
    /// Sum of residents over home reports.
    pub total_residents: u64,
    /// Mean home damage percentage rounded half-up, 0 without homes.
    pub avg_damage_percentage: u8,
    /// People per age bucket, over every home's member ages.
    pub age_distribution: AgeDistribution,
    /// Business reports per size class.
    pub business_size_distribution: BusinessSizeDistribution,
    /// Vehicle units per category.
    pub vehicle_type_distribution: VehicleTypeDistribution,
    /// Home and business reports per severity band.
    pub severity_distribution: SeverityDistribution,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_summary_lists_every_category() {
        let value = serde_json::to_value(StatsSummary::default()).unwrap();

        for key in ["0-7", "7-18", "18-50", "50+"] {
            assert_eq!(value["ageDistribution"][key], 0, "missing age bucket {key}");
        }
        for key in ["SMALL", "MEDIUM", "LARGE"] {
            assert_eq!(
                value["businessSizeDistribution"][key], 0,
                "missing business size {key}"
            );
        }
        for key in ["BIKE", "CAR", "VAN", "CAB", "LORRY", "BUS", "Other"] {
            assert_eq!(
                value["vehicleTypeDistribution"][key], 0,
                "missing vehicle category {key}"
            );
        }
        for key in ["MINOR", "MODERATE", "SEVERE"] {
            assert_eq!(value["severityDistribution"][key], 0, "missing severity {key}");
        }
        assert_eq!(value["avgDamagePercentage"], 0);
        assert_eq!(value["counts"]["homes"], 0);
    }

    #[test]
    fn vehicle_categories_map_from_types() {
        for ty in VehicleType::all() {
            assert_eq!(VehicleCategory::from(*ty).as_ref(), ty.as_ref());
        }
        assert_eq!(VehicleCategory::from(None), VehicleCategory::Other);
        assert_eq!(VehicleCategory::Other.to_string(), "Other");
    }

    #[test]
    fn vehicle_distribution_sums_units() {
        let mut dist = VehicleTypeDistribution::default();
        dist.add(VehicleCategory::Van, 2);
        dist.add(VehicleCategory::Van, 3);
        dist.add(VehicleCategory::Other, 1);

        assert_eq!(dist.get(VehicleCategory::Van), 5);
        assert_eq!(dist.get(VehicleCategory::Bus), 0);
        assert_eq!(dist.total_units(), 6);
        assert_eq!(dist.iter().count(), VehicleCategory::all().len());
    }

    #[test]
    fn summary_roundtrips_through_json() {
        let mut summary = StatsSummary::default();
        summary.counts.homes = 2;
        summary.age_distribution.record(AgeBucket::Age50Plus);
        summary.vehicle_type_distribution.add(VehicleCategory::Cab, 4);

        let json = serde_json::to_string(&summary).unwrap();
        let back: StatsSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }
}
