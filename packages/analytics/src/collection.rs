//! Grow-only report collection.

use std::collections::VecDeque;

use relief_map_analytics_models::StatsSummary;
use relief_map_report_models::{DamageReport, ReportDraft, ReportError};
use serde::{Deserialize, Serialize};

use crate::summarize;

/// Reports submitted during a session, newest first.
///
/// Mutation goes through `&mut self`, so a single owner controls writes and
/// any [`summarize`] pass over a shared borrow sees a stable collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReportLog {
    reports: VecDeque<DamageReport>,
}

impl ReportLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reports: VecDeque::new(),
        }
    }

    /// Creates a log holding `reports` in the given order (newest first).
    #[must_use]
    pub fn from_reports(reports: impl IntoIterator<Item = DamageReport>) -> Self {
        Self {
            reports: reports.into_iter().collect(),
        }
    }

    /// Validates `draft`, stamps it with a fresh id and the current time,
    /// and records it at the head of the log.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if the draft fails validation; the log is
    /// left unchanged.
    pub fn submit(&mut self, draft: ReportDraft) -> Result<&DamageReport, ReportError> {
        let id = uuid::Uuid::new_v4().to_string();
        let report = draft.into_report(id, chrono::Utc::now().timestamp_millis())?;

        log::info!(
            "Recorded {} report {} at ({:.4}, {:.4})",
            report.damage_type(),
            report.id,
            report.location.lat,
            report.location.lng
        );

        self.reports.push_front(report);
        Ok(&self.reports[0])
    }

    /// Iterates reports newest first.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, DamageReport> {
        self.reports.iter()
    }

    /// Finds a report by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DamageReport> {
        self.reports.iter().find(|r| r.id == id)
    }

    /// Number of reports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether nothing has been reported yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Summary statistics over the current contents.
    #[must_use]
    pub fn summary(&self) -> StatsSummary {
        summarize(self)
    }
}

impl<'a> IntoIterator for &'a ReportLog {
    type Item = &'a DamageReport;
    type IntoIter = std::collections::vec_deque::Iter<'a, DamageReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use relief_map_report_models::{
        BusinessDetails, BusinessSize, DamageDetails, HomeDetails, VehicleDetails, VehicleType,
    };

    use super::*;

    fn home_draft(damage: u8) -> ReportDraft {
        ReportDraft::new(DamageDetails::Home(HomeDetails {
            residents: 2,
            damage_percentage: damage,
            member_ages: vec![30, 65],
        }))
        .at(6.93, 79.85)
    }

    #[test]
    fn submissions_are_prepended() {
        let mut log = ReportLog::new();
        let first = log.submit(home_draft(10)).unwrap().id.clone();
        let second = log
            .submit(
                ReportDraft::new(DamageDetails::Vehicle(VehicleDetails {
                    vehicle_type: Some(VehicleType::Car),
                    count: 1,
                }))
                .at(6.91, 79.88),
            )
            .unwrap()
            .id
            .clone();

        let ids: Vec<&str> = log.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![second.as_str(), first.as_str()]);
    }

    #[test]
    fn submitted_ids_are_unique() {
        let mut log = ReportLog::new();
        for _ in 0..20 {
            log.submit(home_draft(50)).unwrap();
        }

        let mut ids: Vec<&str> = log.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn rejected_draft_leaves_log_unchanged() {
        let mut log = ReportLog::new();
        log.submit(home_draft(10)).unwrap();

        let unplaced = ReportDraft::new(DamageDetails::Business(BusinessDetails {
            size: Some(BusinessSize::Small),
            damage_percentage: 10,
        }));
        assert_eq!(log.submit(unplaced), Err(ReportError::MissingLocation));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn submitted_report_is_stamped() {
        let mut log = ReportLog::new();
        let report = log.submit(home_draft(10)).unwrap().clone();

        assert!(!report.id.is_empty());
        assert!(report.timestamp > 0);
        assert_eq!(log.get(&report.id), Some(&report));
        assert_eq!(log.get("missing"), None);
    }

    #[test]
    fn summary_tracks_contents() {
        let mut log = ReportLog::new();
        assert!(log.is_empty());
        assert_eq!(log.summary(), StatsSummary::default());

        log.submit(home_draft(10)).unwrap();
        log.submit(home_draft(15)).unwrap();

        let summary = log.summary();
        assert_eq!(summary.counts.homes, 2);
        assert_eq!(summary.total_residents, 4);
        assert_eq!(summary.avg_damage_percentage, 13);
        assert_eq!(summary, summarize(log.iter()));
    }

    #[test]
    fn from_reports_keeps_order() {
        let mut source = ReportLog::new();
        source.submit(home_draft(1)).unwrap();
        source.submit(home_draft(2)).unwrap();

        let copy = ReportLog::from_reports(source.iter().cloned());
        assert_eq!(copy, source);
    }
}
