//! Month resolution for a loan's repayment records
//!
//! Maps a requested calendar month to a specific monthly record using a
//! priority-ordered cascade of matching strategies. Resolution is pure: the
//! guards against clobbering a user's explicit choice or re-resolving while a
//! mutation is in flight live in the session state machine, not here.

use crate::month::EmiMonth;
use crate::models::MonthlyRecord;

/// Where a resolved month came from, in cascade priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// The dashboard's externally selected month matched a known record.
    DashboardSelection,
    /// Matched via the currently-known repayment id.
    RepaymentId,
    /// Matched the application's own emi_month / demand_date.
    ApplicationMonth,
    /// Fell back to the most recent known month.
    MostRecent,
}

/// Result of a resolution attempt. Absence of a resolvable month is a valid
/// terminal state (an empty month selector), never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved {
        month: EmiMonth,
        /// Id of the matched record, when one backs the month.
        record_id: Option<i64>,
        source: ResolutionSource,
    },
    /// Defer to the secondary month-options fetch keyed by loan id.
    Unresolved,
}

impl Resolution {
    pub fn month(&self) -> Option<&EmiMonth> {
        match self {
            Resolution::Resolved { month, .. } => Some(month),
            Resolution::Unresolved => None,
        }
    }
}

/// Inputs to a resolution attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveRequest<'a> {
    /// Externally selected month hint (dashboard filter context).
    pub selected_month_hint: Option<&'a str>,
    /// Repayment id the application is currently known under.
    pub current_repayment_id: Option<i64>,
    /// The application's own emi_month or demand_date field.
    pub application_month: Option<&'a str>,
}

/// Resolves calendar months against a loan's known monthly records.
#[derive(Debug)]
pub struct MonthResolver<'a> {
    records: &'a [MonthlyRecord],
}

impl<'a> MonthResolver<'a> {
    pub fn new(records: &'a [MonthlyRecord]) -> Self {
        Self { records }
    }

    /// Run the cascade, first match wins:
    ///
    /// 1. dashboard-selected month hint, normalized, against known months
    /// 2. record whose id equals the current repayment id
    /// 3. the application's own month: exact string match, then normalized
    /// 4. the most recent known month
    /// 5. `Unresolved`
    pub fn resolve(&self, request: ResolveRequest<'_>) -> Resolution {
        if let Some(hint) = request.selected_month_hint {
            if let Some(resolution) = self.match_hint(hint) {
                return resolution;
            }
            tracing::debug!(hint, "selected month hint did not match any known record");
        }

        if let Some(repayment_id) = request.current_repayment_id {
            if let Some(resolution) = self.match_repayment_id(repayment_id) {
                return resolution;
            }
            tracing::debug!(repayment_id, "no record for current repayment id");
        }

        if let Some(app_month) = request.application_month {
            if let Some(resolution) = self.match_application_month(app_month) {
                return resolution;
            }
        }

        if let Some(resolution) = self.most_recent() {
            return resolution;
        }

        Resolution::Unresolved
    }

    fn match_hint(&self, hint: &str) -> Option<Resolution> {
        let hint_month = EmiMonth::parse(hint)?;
        self.records.iter().find_map(|record| {
            (record.emi_month()? == hint_month).then(|| Resolution::Resolved {
                month: hint_month.clone(),
                record_id: Some(record.id),
                source: ResolutionSource::DashboardSelection,
            })
        })
    }

    fn match_repayment_id(&self, repayment_id: i64) -> Option<Resolution> {
        let record = self.records.iter().find(|r| r.id == repayment_id)?;
        Some(Resolution::Resolved {
            month: record.emi_month()?,
            record_id: Some(record.id),
            source: ResolutionSource::RepaymentId,
        })
    }

    fn match_application_month(&self, app_month: &str) -> Option<Resolution> {
        // Exact string match against raw demand dates first; the normalized
        // comparison only runs when that fails.
        if let Some(record) = self
            .records
            .iter()
            .find(|r| r.demand_date.as_deref() == Some(app_month))
        {
            return Some(Resolution::Resolved {
                month: record.emi_month()?,
                record_id: Some(record.id),
                source: ResolutionSource::ApplicationMonth,
            });
        }

        let normalized = EmiMonth::parse(app_month)?;
        self.records.iter().find_map(|record| {
            (record.emi_month()? == normalized).then(|| Resolution::Resolved {
                month: normalized.clone(),
                record_id: Some(record.id),
                source: ResolutionSource::ApplicationMonth,
            })
        })
    }

    fn most_recent(&self) -> Option<Resolution> {
        self.records
            .iter()
            .filter_map(|record| record.emi_month().map(|month| (record.id, month)))
            .max_by_key(|(_, month)| month.ordinal())
            .map(|(id, month)| Resolution::Resolved {
                month,
                record_id: Some(id),
                source: ResolutionSource::MostRecent,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, demand_date: Option<&str>, parts: Option<(u32, i32)>) -> MonthlyRecord {
        MonthlyRecord {
            id,
            demand_date: demand_date.map(str::to_string),
            demand_month: parts.map(|(m, _)| m),
            demand_year: parts.map(|(_, y)| y),
            ..Default::default()
        }
    }

    #[test]
    fn test_hint_takes_priority() {
        let records = vec![
            record(1, Some("2025-07-05"), None),
            record(2, Some("2025-08-05"), None),
        ];
        let resolver = MonthResolver::new(&records);
        let resolution = resolver.resolve(ResolveRequest {
            selected_month_hint: Some("Aug-25"),
            current_repayment_id: Some(1),
            application_month: Some("2025-07-05"),
        });
        assert_eq!(
            resolution,
            Resolution::Resolved {
                month: EmiMonth::parse("Aug-25").unwrap(),
                record_id: Some(2),
                source: ResolutionSource::DashboardSelection,
            }
        );
    }

    #[test]
    fn test_demand_date_match() {
        let records = vec![record(7, Some("2025-08-05"), None)];
        let resolver = MonthResolver::new(&records);
        let resolution = resolver.resolve(ResolveRequest {
            selected_month_hint: Some("Aug-25"),
            ..Default::default()
        });
        assert_eq!(resolution.month().unwrap().as_str(), "Aug-25");
    }

    #[test]
    fn test_repayment_id_match_reconstructs_month_from_parts() {
        let records = vec![
            record(41, None, Some((8, 2025))),
            record(42, None, Some((9, 2025))),
        ];
        let resolver = MonthResolver::new(&records);
        let resolution = resolver.resolve(ResolveRequest {
            current_repayment_id: Some(42),
            ..Default::default()
        });
        assert_eq!(
            resolution,
            Resolution::Resolved {
                month: EmiMonth::parse("Sep-25").unwrap(),
                record_id: Some(42),
                source: ResolutionSource::RepaymentId,
            }
        );
    }

    #[test]
    fn test_unmatched_hint_falls_through_to_repayment_id() {
        let records = vec![record(5, Some("2025-06-05"), None)];
        let resolver = MonthResolver::new(&records);
        let resolution = resolver.resolve(ResolveRequest {
            selected_month_hint: Some("Dec-25"),
            current_repayment_id: Some(5),
            ..Default::default()
        });
        assert_eq!(
            resolution,
            Resolution::Resolved {
                month: EmiMonth::parse("Jun-25").unwrap(),
                record_id: Some(5),
                source: ResolutionSource::RepaymentId,
            }
        );
    }

    #[test]
    fn test_application_month_exact_then_normalized() {
        let records = vec![record(9, Some("2025-05-05"), None)];
        let resolver = MonthResolver::new(&records);

        // Exact demand-date string.
        let exact = resolver.resolve(ResolveRequest {
            application_month: Some("2025-05-05"),
            ..Default::default()
        });
        assert_eq!(exact.month().unwrap().as_str(), "May-25");

        // Normalized Mon-YY form of the same month.
        let normalized = resolver.resolve(ResolveRequest {
            application_month: Some("May-25"),
            ..Default::default()
        });
        assert_eq!(
            normalized,
            Resolution::Resolved {
                month: EmiMonth::parse("May-25").unwrap(),
                record_id: Some(9),
                source: ResolutionSource::ApplicationMonth,
            }
        );
    }

    #[test]
    fn test_most_recent_fallback() {
        let records = vec![
            record(1, Some("2025-03-05"), None),
            record(2, Some("2025-11-05"), None),
            record(3, Some("2025-07-05"), None),
        ];
        let resolver = MonthResolver::new(&records);
        let resolution = resolver.resolve(ResolveRequest::default());
        assert_eq!(
            resolution,
            Resolution::Resolved {
                month: EmiMonth::parse("Nov-25").unwrap(),
                record_id: Some(2),
                source: ResolutionSource::MostRecent,
            }
        );
    }

    #[test]
    fn test_unresolved_when_no_record_has_a_month() {
        let records = vec![record(1, None, None)];
        let resolver = MonthResolver::new(&records);
        assert_eq!(resolver.resolve(ResolveRequest::default()), Resolution::Unresolved);

        let resolver = MonthResolver::new(&[]);
        assert_eq!(resolver.resolve(ResolveRequest::default()), Resolution::Unresolved);
    }

    #[test]
    fn test_mismatched_hint_format_silently_fails() {
        let records = vec![record(1, Some("2025-08-05"), None)];
        let resolver = MonthResolver::new(&records);
        // Lowercase month name is not canonical and must not match.
        let resolution = resolver.resolve(ResolveRequest {
            selected_month_hint: Some("aug-25"),
            ..Default::default()
        });
        // Falls through to the most-recent fallback instead of erroring.
        assert_eq!(
            resolution,
            Resolution::Resolved {
                month: EmiMonth::parse("Aug-25").unwrap(),
                record_id: Some(1),
                source: ResolutionSource::MostRecent,
            }
        );
    }
}
