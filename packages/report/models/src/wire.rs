//! JSON shape exchanged with the field client.
//!
//! On the wire a report is a flat object with a `type` tag and three
//! optional payload objects (`homeDetails`, `businessDetails`,
//! `vehicleDetails`). Only the payload named by the tag is decoded; the
//! others are ignored whatever they contain. A report without an id is
//! refused, since ids are how reports are looked up.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    BusinessDetails, BusinessSize, Coordinates, DamageDetails, DamageReport, DamageType,
    HomeDetails, ReportError, VehicleDetails, VehicleType,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDamageReport {
    #[serde(default)]
    id: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lng: f64,
    #[serde(rename = "type")]
    damage_type: DamageType,
    #[serde(default)]
    timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    home_details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    business_details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vehicle_details: Option<Value>,
}

impl TryFrom<RawDamageReport> for DamageReport {
    type Error = ReportError;

    fn try_from(raw: RawDamageReport) -> Result<Self, Self::Error> {
        if raw.id.trim().is_empty() {
            return Err(ReportError::MissingId);
        }

        let payload = match raw.damage_type {
            DamageType::Home => raw.home_details.as_ref(),
            DamageType::Business => raw.business_details.as_ref(),
            DamageType::Vehicle => raw.vehicle_details.as_ref(),
        };

        Ok(Self {
            id: raw.id,
            location: Coordinates {
                lat: raw.lat,
                lng: raw.lng,
            },
            timestamp: raw.timestamp,
            description: raw.description,
            image: raw.image,
            details: decode_details(raw.damage_type, payload),
        })
    }
}

impl From<DamageReport> for RawDamageReport {
    fn from(report: DamageReport) -> Self {
        let damage_type = report.damage_type();
        let mut raw = Self {
            id: report.id,
            lat: report.location.lat,
            lng: report.location.lng,
            damage_type,
            timestamp: report.timestamp,
            description: report.description,
            image: report.image,
            home_details: None,
            business_details: None,
            vehicle_details: None,
        };

        // Plain derived structs; serializing them into a `Value` cannot fail.
        match report.details {
            DamageDetails::Home(home) => raw.home_details = serde_json::to_value(home).ok(),
            DamageDetails::Business(business) => {
                raw.business_details = serde_json::to_value(business).ok();
            }
            DamageDetails::Vehicle(vehicle) => {
                raw.vehicle_details = serde_json::to_value(vehicle).ok();
            }
        }

        raw
    }
}

pub fn decode_details(damage_type: DamageType, payload: Option<&Value>) -> DamageDetails {
    let field = |name: &str| payload.and_then(|p| p.get(name));

    match damage_type {
        DamageType::Home => DamageDetails::Home(HomeDetails {
            residents: whole_number(field("residents"), u32::MAX),
            damage_percentage: percentage(field("damagePercentage")),
            member_ages: field("memberAges")
                .and_then(Value::as_array)
                .map(|ages| {
                    ages.iter()
                        .filter_map(number)
                        .map(|age| clamp_round(age, u32::MAX))
                        .collect()
                })
                .unwrap_or_default(),
        }),
        DamageType::Business => DamageDetails::Business(BusinessDetails {
            size: field("size")
                .and_then(enum_name)
                .and_then(|name| name.parse::<BusinessSize>().ok()),
            damage_percentage: percentage(field("damagePercentage")),
        }),
        DamageType::Vehicle => DamageDetails::Vehicle(VehicleDetails {
            vehicle_type: field("type")
                .and_then(enum_name)
                .and_then(|name| name.parse::<VehicleType>().ok()),
            count: whole_number(field("count"), u32::MAX),
        }),
    }
}

fn enum_name(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.trim().to_uppercase())
}

/// Reads a JSON number, also accepting numeric strings like `"4"`.
fn number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str()?.trim().parse().ok())
        .filter(|n: &f64| n.is_finite())
}

fn whole_number(value: Option<&Value>, max: u32) -> u32 {
    value.and_then(number).map_or(0, |n| clamp_round(n, max))
}

fn percentage(value: Option<&Value>) -> u8 {
    // Bounded by 100 so the narrowing cannot truncate.
    u8::try_from(whole_number(value, 100)).unwrap_or(100)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_round(n: f64, max: u32) -> u32 {
    n.round().clamp(0.0, f64::from(max)) as u32
}
