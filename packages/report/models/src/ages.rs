//! Age buckets used for household demographics.
//!
//! The field form collects how many people of each age bucket live in a
//! home rather than individual ages. [`AgeBucketCounts::member_ages`] expands
//! those counts into one representative age per person so the same
//! per-person demographics can be re-derived from [`crate::HomeDetails`].

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::ReportError;

/// One of the four fixed age ranges.
///
/// Boundaries: `age <= 7` is [`Self::Age0To7`], `7 < age <= 18` is
/// [`Self::Age7To18`], `18 < age < 50` is [`Self::Age18To50`], and
/// `age >= 50` is [`Self::Age50Plus`].
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
pub enum AgeBucket {
    /// Young children
    #[serde(rename = "0-7")]
    #[strum(serialize = "0-7")]
    Age0To7,
    /// School-age children and teenagers
    #[serde(rename = "7-18")]
    #[strum(serialize = "7-18")]
    Age7To18,
    /// Working-age adults
    #[serde(rename = "18-50")]
    #[strum(serialize = "18-50")]
    Age18To50,
    /// Older adults
    #[serde(rename = "50+")]
    #[strum(serialize = "50+")]
    Age50Plus,
}

impl AgeBucket {
    /// Places an age into its bucket.
    #[must_use]
    pub const fn classify(age: u32) -> Self {
        if age <= 7 {
            Self::Age0To7
        } else if age <= 18 {
            Self::Age7To18
        } else if age < 50 {
            Self::Age18To50
        } else {
            Self::Age50Plus
        }
    }

    /// Fixed stand-in age for a person only known to be in this bucket.
    #[must_use]
    pub const fn representative_age(self) -> u32 {
        match self {
            Self::Age0To7 => 4,
            Self::Age7To18 => 12,
            Self::Age18To50 => 30,
            Self::Age50Plus => 65,
        }
    }

    /// Returns all variants of this enum, youngest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Age0To7,
            Self::Age7To18,
            Self::Age18To50,
            Self::Age50Plus,
        ]
    }
}

/// Number of household members in each [`AgeBucket`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBucketCounts {
    /// People aged 7 or younger.
    pub age_0_7: u32,
    /// People older than 7, up to 18.
    pub age_7_18: u32,
    /// People older than 18 and younger than 50.
    pub age_18_50: u32,
    /// People aged 50 or older.
    pub age_50_plus: u32,
}

impl AgeBucketCounts {
    /// Largest household [`Self::member_ages`] will expand.
    pub const MAX_RESIDENTS: u32 = 10_000;

    /// Head count for one bucket.
    #[must_use]
    pub const fn get(&self, bucket: AgeBucket) -> u32 {
        match bucket {
            AgeBucket::Age0To7 => self.age_0_7,
            AgeBucket::Age7To18 => self.age_7_18,
            AgeBucket::Age18To50 => self.age_18_50,
            AgeBucket::Age50Plus => self.age_50_plus,
        }
    }

    /// Total head count across all buckets, `None` if it overflows `u32`.
    #[must_use]
    pub fn total(&self) -> Option<u32> {
        self.age_0_7
            .checked_add(self.age_7_18)?
            .checked_add(self.age_18_50)?
            .checked_add(self.age_50_plus)
    }

    /// Re-buckets a list of individual ages.
    #[must_use]
    pub fn from_ages(ages: &[u32]) -> Self {
        let mut counts = Self::default();
        for &age in ages {
            let slot = match AgeBucket::classify(age) {
                AgeBucket::Age0To7 => &mut counts.age_0_7,
                AgeBucket::Age7To18 => &mut counts.age_7_18,
                AgeBucket::Age18To50 => &mut counts.age_18_50,
                AgeBucket::Age50Plus => &mut counts.age_50_plus,
            };
            *slot = slot.saturating_add(1);
        }
        counts
    }

    /// One representative age per counted person, youngest bucket first.
    ///
    /// The result only depends on the counts, its length is [`Self::total`],
    /// and every age classifies back into the bucket it was generated for.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::HouseholdTooLarge`] if the counts add up to
    /// more than [`Self::MAX_RESIDENTS`].
    pub fn member_ages(&self) -> Result<Vec<u32>, ReportError> {
        match self.total() {
            Some(total) if total <= Self::MAX_RESIDENTS => Ok(AgeBucket::all()
                .iter()
                .flat_map(|&bucket| {
                    std::iter::repeat_n(bucket.representative_age(), self.get(bucket) as usize)
                })
                .collect()),
            _ => Err(ReportError::HouseholdTooLarge {
                max: Self::MAX_RESIDENTS,
            }),
        }
    }
}
