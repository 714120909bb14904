#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Damage report types shared across the relief-map toolchain.
//!
//! A [`DamageReport`] is one geolocated field observation of damage to a
//! home, a business, or a set of vehicles. The damage category and its
//! detail payload travel together as a single [`DamageDetails`] variant, so a
//! report can never carry a payload that disagrees with its category.
//!
//! Reports are exchanged with the field client as camelCase JSON where the
//! category is a `type` tag next to three optional payload objects. Decoding
//! that shape is deliberately lenient; see [`DamageDetails::from_lenient_payload`].

pub mod ages;
mod wire;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

pub use ages::{AgeBucket, AgeBucketCounts};

/// Top-level damage category of a report.
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
pub enum DamageType {
    /// A dwelling and the household living in it
    Home,
    /// A shop, office, or other commercial premises
    Business,
    /// One or more vehicles of the same kind
    Vehicle,
}

impl DamageType {
    /// Returns the JSON key holding the detail payload for this category.
    #[must_use]
    pub const fn payload_key(self) -> &'static str {
        match self {
            Self::Home => "homeDetails",
            Self::Business => "businessDetails",
            Self::Vehicle => "vehicleDetails",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Home, Self::Business, Self::Vehicle]
    }
}

/// Size class of a damaged business.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum BusinessSize {
    /// Single-room shops and stalls
    #[default]
    Small,
    /// Stores and workshops with a handful of staff
    Medium,
    /// Warehouses, factories, large retail
    Large,
}

impl BusinessSize {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Small, Self::Medium, Self::Large]
    }
}

/// Kind of damaged vehicle.
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
pub enum VehicleType {
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
}

impl VehicleType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Bike,
            Self::Car,
            Self::Van,
            Self::Cab,
            Self::Lorry,
            Self::Bus,
        ]
    }
}

/// Severity band for a structural damage percentage.
///
/// The bands match the thresholds the field form uses to color its damage
/// slider: up to 40% is minor, up to 75% moderate, anything above severe.
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
pub enum DamageSeverity {
    /// 0-40% damaged
    Minor,
    /// 41-75% damaged
    Moderate,
    /// More than 75% damaged
    Severe,
}

impl DamageSeverity {
    /// Upper bound (inclusive) of the [`Self::Minor`] band.
    pub const MINOR_MAX: u8 = 40;
    /// Upper bound (inclusive) of the [`Self::Moderate`] band.
    pub const MODERATE_MAX: u8 = 75;

    /// Classifies a damage percentage into its severity band.
    #[must_use]
    pub const fn from_percentage(percentage: u8) -> Self {
        if percentage <= Self::MINOR_MAX {
            Self::Minor
        } else if percentage <= Self::MODERATE_MAX {
            Self::Moderate
        } else {
            Self::Severe
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Minor, Self::Moderate, Self::Severe]
    }
}

/// A WGS84 point picked on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coordinates {
    /// Returns `true` if both components are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Household damage details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeDetails {
    /// Number of people living in the home.
    pub residents: u32,
    /// Estimated structural damage, 0-100.
    pub damage_percentage: u8,
    /// Age of each household member. Usually one entry per resident, but
    /// consumers must not rely on that.
    pub member_ages: Vec<u32>,
}

impl HomeDetails {
    /// Builds home details from per-bucket head counts.
    ///
    /// The bucket total becomes the resident count and every counted person
    /// gets the representative age of their bucket, so `member_ages.len()`
    /// always equals `residents`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::HouseholdTooLarge`] if the counts add up to
    /// more than [`AgeBucketCounts::MAX_RESIDENTS`].
    pub fn from_age_buckets(
        counts: AgeBucketCounts,
        damage_percentage: u8,
    ) -> Result<Self, ReportError> {
        let member_ages = counts.member_ages()?;
        Ok(Self {
            residents: u32::try_from(member_ages.len())
                .map_err(|_| ReportError::HouseholdTooLarge {
                    max: AgeBucketCounts::MAX_RESIDENTS,
                })?,
            damage_percentage,
            member_ages,
        })
    }
}

/// Business damage details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDetails {
    /// Size class of the premises, `None` when absent or not recognized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<BusinessSize>,
    /// Estimated structural damage, 0-100.
    pub damage_percentage: u8,
}

/// Vehicle damage details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDetails {
    /// Vehicle kind, `None` when absent or not recognized.
    #[serde(rename = "type")]
    pub vehicle_type: Option<VehicleType>,
    /// Number of vehicles covered by the report.
    pub count: u32,
}

/// Category-specific payload of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DamageDetails {
    /// Damage to a home.
    Home(HomeDetails),
    /// Damage to a business.
    Business(BusinessDetails),
    /// Damaged vehicles.
    Vehicle(VehicleDetails),
}

impl DamageDetails {
    /// Returns the category tag of this payload.
    #[must_use]
    pub const fn damage_type(&self) -> DamageType {
        match self {
            Self::Home(_) => DamageType::Home,
            Self::Business(_) => DamageType::Business,
            Self::Vehicle(_) => DamageType::Vehicle,
        }
    }

    /// Structural damage percentage, `None` for vehicles.
    #[must_use]
    pub const fn damage_percentage(&self) -> Option<u8> {
        match self {
            Self::Home(home) => Some(home.damage_percentage),
            Self::Business(business) => Some(business.damage_percentage),
            Self::Vehicle(_) => None,
        }
    }

    /// Severity band of the structural damage, `None` for vehicles.
    #[must_use]
    pub fn severity(&self) -> Option<DamageSeverity> {
        self.damage_percentage().map(DamageSeverity::from_percentage)
    }

    /// Decodes the payload for `damage_type` from a loosely-shaped JSON value.
    ///
    /// Never fails. A missing or non-object payload yields the all-zero
    /// payload. Missing, non-numeric, fractional, or out-of-range numbers are
    /// coerced (rounded, then clamped into range, with zero as the fallback).
    /// An unrecognized vehicle type or business size becomes `None`.
    #[must_use]
    pub fn from_lenient_payload(
        damage_type: DamageType,
        payload: Option<&serde_json::Value>,
    ) -> Self {
        wire::decode_details(damage_type, payload)
    }
}

/// A submitted damage report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "wire::RawDamageReport", into = "wire::RawDamageReport")]
pub struct DamageReport {
    /// Opaque unique identifier, assigned at creation.
    pub id: String,
    /// Where the damage was observed.
    pub location: Coordinates,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Free-text notes from the reporter.
    pub description: Option<String>,
    /// Photo attached by the reporter (base64 data URL). Never inspected.
    pub image: Option<String>,
    /// Category and category-specific payload.
    pub details: DamageDetails,
}

impl DamageReport {
    /// Returns the category tag of this report.
    #[must_use]
    pub const fn damage_type(&self) -> DamageType {
        self.details.damage_type()
    }
}

/// Errors raised when a [`ReportDraft`] is not ready to be submitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// No point has been picked on the map yet.
    #[error("Select a location on the map before submitting")]
    MissingLocation,

    /// The picked point is not a pair of finite numbers.
    #[error("Invalid location ({lat}, {lng})")]
    InvalidLocation {
        /// Latitude that was supplied.
        lat: f64,
        /// Longitude that was supplied.
        lng: f64,
    },

    /// A damage percentage above 100.
    #[error("Damage percentage {value} out of range: expected 0-100")]
    DamageOutOfRange {
        /// The offending value.
        value: u8,
    },

    /// A vehicle report must cover at least one vehicle.
    #[error("Vehicle count must be at least 1")]
    EmptyVehicleCount,

    /// A business report must say how big the business is.
    #[error("Select a business size before submitting")]
    MissingBusinessSize,

    /// More residents than a single home report may list.
    #[error("A home report can list at most {max} residents")]
    HouseholdTooLarge {
        /// The largest accepted household.
        max: u32,
    },

    /// A decoded report carries no usable id.
    #[error("Report has no id")]
    MissingId,
}

/// A report as filled in by the reporter, before it gets an id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    /// Point picked on the map, if any.
    pub location: Option<Coordinates>,
    /// Free-text notes.
    pub description: Option<String>,
    /// Attached photo.
    pub image: Option<String>,
    /// Category and category-specific payload.
    pub details: DamageDetails,
}

impl ReportDraft {
    /// Creates a draft with no location, notes, or photo.
    #[must_use]
    pub const fn new(details: DamageDetails) -> Self {
        Self {
            location: None,
            description: None,
            image: None,
            details,
        }
    }

    /// Sets the location.
    #[must_use]
    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.location = Some(Coordinates { lat, lng });
        self
    }

    /// Sets the description. Blank text clears it.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = if description.trim().is_empty() {
            None
        } else {
            Some(description)
        };
        self
    }

    /// Sets the attached photo. Blank text clears it.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        let image = image.into();
        self.image = if image.trim().is_empty() {
            None
        } else {
            Some(image)
        };
        self
    }

    /// Checks that the draft can be submitted and returns its location.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if no valid location is set, a damage
    /// percentage exceeds 100, a business has no size, a home lists more
    /// than [`AgeBucketCounts::MAX_RESIDENTS`] people, or a vehicle report
    /// covers no vehicles.
    pub fn validate(&self) -> Result<Coordinates, ReportError> {
        let location = self.location.ok_or(ReportError::MissingLocation)?;
        if !location.is_finite() {
            return Err(ReportError::InvalidLocation {
                lat: location.lat,
                lng: location.lng,
            });
        }

        if let Some(value) = self.details.damage_percentage()
            && value > 100
        {
            return Err(ReportError::DamageOutOfRange { value });
        }

        match &self.details {
            DamageDetails::Home(home)
                if home.residents > AgeBucketCounts::MAX_RESIDENTS
                    || home.member_ages.len() > AgeBucketCounts::MAX_RESIDENTS as usize =>
            {
                return Err(ReportError::HouseholdTooLarge {
                    max: AgeBucketCounts::MAX_RESIDENTS,
                });
            }
            DamageDetails::Business(business) if business.size.is_none() => {
                return Err(ReportError::MissingBusinessSize);
            }
            DamageDetails::Vehicle(vehicle) if vehicle.count == 0 => {
                return Err(ReportError::EmptyVehicleCount);
            }
            _ => {}
        }

        Ok(location)
    }

    /// Validates the draft and turns it into a report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if [`Self::validate`] fails.
    pub fn into_report(self, id: String, timestamp: i64) -> Result<DamageReport, ReportError> {
        let location = self.validate()?;
        Ok(DamageReport {
            id,
            location,
            timestamp,
            description: self.description,
            image: self.image,
            details: self.details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home(damage: u8) -> DamageDetails {
        DamageDetails::Home(HomeDetails {
            residents: 1,
            damage_percentage: damage,
            member_ages: vec![30],
        })
    }

    #[test]
    fn severity_bands_split_at_form_thresholds() {
        assert_eq!(DamageSeverity::from_percentage(0), DamageSeverity::Minor);
        assert_eq!(DamageSeverity::from_percentage(40), DamageSeverity::Minor);
        assert_eq!(DamageSeverity::from_percentage(41), DamageSeverity::Moderate);
        assert_eq!(DamageSeverity::from_percentage(75), DamageSeverity::Moderate);
        assert_eq!(DamageSeverity::from_percentage(76), DamageSeverity::Severe);
        assert_eq!(DamageSeverity::from_percentage(100), DamageSeverity::Severe);
    }

    #[test]
    fn vehicles_have_no_severity() {
        let details = DamageDetails::Vehicle(VehicleDetails {
            vehicle_type: Some(VehicleType::Bus),
            count: 1,
        });
        assert_eq!(details.damage_percentage(), None);
        assert_eq!(details.severity(), None);
    }

    #[test]
    fn enum_names_parse_back() {
        for ty in VehicleType::all() {
            assert_eq!(ty.as_ref().parse::<VehicleType>().unwrap(), *ty);
        }
        for size in BusinessSize::all() {
            assert_eq!(size.to_string().parse::<BusinessSize>().unwrap(), *size);
        }
        assert_eq!("HOME".parse::<DamageType>().unwrap(), DamageType::Home);
        assert!("SHED".parse::<DamageType>().is_err());
    }

    #[test]
    fn home_from_buckets_keeps_residents_and_ages_in_step() {
        let counts = AgeBucketCounts {
            age_0_7: 1,
            age_7_18: 2,
            age_18_50: 0,
            age_50_plus: 1,
        };
        let details = HomeDetails::from_age_buckets(counts, 55).unwrap();
        assert_eq!(details.residents, 4);
        assert_eq!(details.member_ages.len(), 4);
        assert_eq!(details.damage_percentage, 55);
    }

    #[test]
    fn draft_without_location_is_rejected() {
        let draft = ReportDraft::new(home(10));
        assert_eq!(draft.validate(), Err(ReportError::MissingLocation));
    }

    #[test]
    fn draft_with_non_finite_location_is_rejected() {
        let draft = ReportDraft::new(home(10)).at(f64::NAN, 79.8);
        assert!(matches!(
            draft.validate(),
            Err(ReportError::InvalidLocation { .. })
        ));
    }

    #[test]
    fn draft_damage_above_hundred_is_rejected() {
        let draft = ReportDraft::new(DamageDetails::Business(BusinessDetails {
            size: Some(BusinessSize::Large),
            damage_percentage: 120,
        }))
        .at(6.9, 79.8);
        assert_eq!(
            draft.validate(),
            Err(ReportError::DamageOutOfRange { value: 120 })
        );
    }

    #[test]
    fn draft_with_zero_vehicles_is_rejected() {
        let draft = ReportDraft::new(DamageDetails::Vehicle(VehicleDetails {
            vehicle_type: Some(VehicleType::Car),
            count: 0,
        }))
        .at(6.9, 79.8);
        assert_eq!(draft.validate(), Err(ReportError::EmptyVehicleCount));
    }

    #[test]
    fn valid_draft_becomes_report() {
        let report = ReportDraft::new(home(80))
            .at(6.9271, 79.8612)
            .with_description("Roof collapsed")
            .into_report("abc".to_string(), 1_700_000_000_000)
            .unwrap();

        assert_eq!(report.id, "abc");
        assert_eq!(report.damage_type(), DamageType::Home);
        assert_eq!(
            report.location,
            Coordinates {
                lat: 6.9271,
                lng: 79.8612
            }
        );
        assert_eq!(report.description.as_deref(), Some("Roof collapsed"));
    }

    #[test]
    fn blank_description_is_dropped() {
        let draft = ReportDraft::new(home(0)).with_description("   ");
        assert_eq!(draft.description, None);
    }

    #[test]
    fn home_from_overflowing_buckets_is_rejected() {
        let counts = AgeBucketCounts {
            age_0_7: u32::MAX,
            age_7_18: 1,
            ..AgeBucketCounts::default()
        };
        assert_eq!(
            HomeDetails::from_age_buckets(counts, 10),
            Err(ReportError::HouseholdTooLarge {
                max: AgeBucketCounts::MAX_RESIDENTS
            })
        );
    }

    #[test]
    fn draft_with_oversized_household_is_rejected() {
        let draft = ReportDraft::new(DamageDetails::Home(HomeDetails {
            residents: AgeBucketCounts::MAX_RESIDENTS + 1,
            damage_percentage: 10,
            member_ages: Vec::new(),
        }))
        .at(6.9, 79.8);
        assert!(matches!(
            draft.validate(),
            Err(ReportError::HouseholdTooLarge { .. })
        ));
    }

    #[test]
    fn draft_without_business_size_is_rejected() {
        let draft = ReportDraft::new(DamageDetails::Business(BusinessDetails {
            size: None,
            damage_percentage: 30,
        }))
        .at(6.9, 79.8);
        assert_eq!(draft.validate(), Err(ReportError::MissingBusinessSize));
    }

    #[test]
    fn image_is_carried_into_the_report() {
        let report = ReportDraft::new(home(20))
            .at(6.9, 79.8)
            .with_image("data:image/png;base64,iVBORw0KGgo=")
            .into_report("img".to_string(), 1)
            .unwrap();
        assert_eq!(
            report.image.as_deref(),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );

        let draft = ReportDraft::new(home(20)).with_image("  ");
        assert_eq!(draft.image, None);
    }
}
