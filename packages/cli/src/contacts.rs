//! Compile-time registry of emergency contacts.
//!
//! Each contact is a TOML file under `contacts/`, embedded at compile time.

use serde::Deserialize;

/// Shown above the contact list.
pub const NOTICE: &str = "For immediate life-threatening emergencies, call 117 first.";

/// A national emergency number.
#[derive(Debug, Clone, Deserialize)]
pub struct EmergencyContact {
    /// Unique identifier (e.g., `"police"`).
    pub id: String,
    /// Service name shown to the reporter.
    pub name: String,
    /// Number to dial. Kept as text so leading zeros survive.
    pub number: String,
    /// Display order, lower first.
    pub priority: u32,
    /// One-line description of the service.
    #[serde(default)]
    pub note: Option<String>,
}

const CONTACT_TOMLS: &[(&str, &str)] = &[
    ("emergency", include_str!("../contacts/emergency.toml")),
    ("police", include_str!("../contacts/police.toml")),
    ("fire", include_str!("../contacts/fire.toml")),
    ("ambulance", include_str!("../contacts/ambulance.toml")),
];

#[cfg(test)]
const EXPECTED_CONTACT_COUNT: usize = 4;

/// Returns every contact, sorted by priority (ascending).
///
/// # Panics
///
/// Panics if any embedded TOML file is malformed.
#[must_use]
pub fn all_contacts() -> Vec<EmergencyContact> {
    let mut contacts: Vec<EmergencyContact> = CONTACT_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse emergency contact '{name}': {e}"))
        })
        .collect();
    contacts.sort_by_key(|c| c.priority);
    contacts
}
