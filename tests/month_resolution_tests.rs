//! Scenario tests for month resolution and view merging through the public
//! API, mirroring the flows the dashboard drives.

use collections_desk::models::application::RepaymentStatusInfo;
use collections_desk::models::status::{status_code, status_label};
use collections_desk::models::{Application, MonthlyRecord};
use collections_desk::month::format_ptp_date;
use collections_desk::{
    ApplicationView, EmiMonth, MonthResolver, Resolution, ResolutionSource, ResolveRequest,
};

fn schedule() -> Vec<MonthlyRecord> {
    vec![
        MonthlyRecord {
            id: 40,
            demand_date: Some("2025-07-05".to_string()),
            demand_amount: Some(5200.0),
            amount_collected: Some(5200.0),
            status: Some("3".to_string()),
            ..Default::default()
        },
        MonthlyRecord {
            id: 41,
            demand_date: Some("2025-08-05".to_string()),
            demand_amount: Some(5200.0),
            amount_collected: Some(1200.0),
            status: Some("2".to_string()),
            ..Default::default()
        },
        MonthlyRecord {
            id: 42,
            demand_date: Some("2025-09-05".to_string()),
            demand_amount: Some(5200.0),
            status: Some("1".to_string()),
            ..Default::default()
        },
    ]
}

#[test]
fn test_cascade_priority_over_a_full_schedule() {
    let records = schedule();
    let resolver = MonthResolver::new(&records);

    // Dashboard hint beats everything.
    let hinted = resolver.resolve(ResolveRequest {
        selected_month_hint: Some("Jul-25"),
        current_repayment_id: Some(42),
        application_month: Some("2025-08-05"),
    });
    assert_eq!(
        hinted,
        Resolution::Resolved {
            month: EmiMonth::parse("Jul-25").unwrap(),
            record_id: Some(40),
            source: ResolutionSource::DashboardSelection,
        }
    );

    // Without a hint, the repayment id pins the month.
    let by_id = resolver.resolve(ResolveRequest {
        current_repayment_id: Some(42),
        application_month: Some("2025-08-05"),
        ..Default::default()
    });
    assert_eq!(by_id.month().unwrap().as_str(), "Sep-25");

    // Without either, the application's own month wins.
    let by_app_month = resolver.resolve(ResolveRequest {
        application_month: Some("2025-08-05"),
        ..Default::default()
    });
    assert_eq!(by_app_month.month().unwrap().as_str(), "Aug-25");

    // With nothing at all, the most recent month is used.
    let fallback = resolver.resolve(ResolveRequest::default());
    assert_eq!(
        fallback,
        Resolution::Resolved {
            month: EmiMonth::parse("Sep-25").unwrap(),
            record_id: Some(42),
            source: ResolutionSource::MostRecent,
        }
    );
}

#[test]
fn test_resolved_month_composes_that_months_view() {
    let records = schedule();
    let app = Application {
        applicant_id: "APP-1001".to_string(),
        applicant_name: "R. Sharma".to_string(),
        payment_id: Some(41),
        emi_amount: 5200.0,
        status: Some("4".to_string()),
        ..Default::default()
    };

    let resolution = MonthResolver::new(&records).resolve(ResolveRequest {
        current_repayment_id: app.payment_id,
        ..Default::default()
    });
    let month = resolution.month().expect("resolvable").clone();
    assert_eq!(month.as_str(), "Aug-25");

    let record = records
        .iter()
        .find(|r| r.emi_month().as_ref() == Some(&month));
    let view = ApplicationView::compose(&app, record, &month);
    assert_eq!(view.key.payment_id, Some(41));
    assert_eq!(view.status, "Partially Paid");
    assert_eq!(view.amount_collected, 1200.0);
    assert!(!view.is_paid());
}

#[test]
fn test_paid_month_view_is_locked() {
    let records = schedule();
    let app = Application {
        applicant_id: "APP-1001".to_string(),
        emi_amount: 5200.0,
        ..Default::default()
    };
    let month = EmiMonth::parse("Jul-25").unwrap();
    let record = records
        .iter()
        .find(|r| r.emi_month().as_ref() == Some(&month));
    let view = ApplicationView::compose(&app, record, &month);
    assert_eq!(view.status, "Paid");
    assert!(view.is_paid());
}

#[test]
fn test_repayment_status_object_overrides_month_status() {
    let app = Application {
        applicant_id: "APP-1001".to_string(),
        ..Default::default()
    };
    let record = MonthlyRecord {
        id: 50,
        demand_date: Some("2025-10-05".to_string()),
        status: Some("4".to_string()),
        repayment_status: Some(RepaymentStatusInfo {
            id: 6,
            label: "Paid (Pending Approval)".to_string(),
        }),
        ..Default::default()
    };
    let month = EmiMonth::parse("Oct-25").unwrap();
    let view = ApplicationView::compose(&app, Some(&record), &month);
    assert_eq!(view.status, "Paid (Pending Approval)");
    // Pending approval is not yet Paid, so nothing is locked.
    assert!(!view.is_paid());
}

#[test]
fn test_status_mapping_table() {
    let expected = [
        ("1", "Future"),
        ("2", "Partially Paid"),
        ("3", "Paid"),
        ("4", "Overdue"),
        ("5", "Foreclose"),
        ("6", "Paid (Pending Approval)"),
        ("7", "Paid Rejected"),
    ];
    for (code, label) in expected {
        assert_eq!(status_label(Some(code)), label);
        assert_eq!(status_code(Some(label)), code);
    }
    assert_eq!(status_label(None), "Unknown");
    assert_eq!(status_code(None), "1");
}

#[test]
fn test_month_arithmetic_and_demand_dates() {
    let dec = EmiMonth::parse("Dec-25").unwrap();
    assert_eq!(dec.next().as_str(), "Jan-26");
    assert_eq!(dec.next().previous(), dec);
    assert_eq!(dec.demand_date().to_string(), "2025-12-05");
    assert!(dec.ordinal() < dec.next().ordinal());
}

#[test]
fn test_ptp_date_formatting_for_display() {
    assert_eq!(format_ptp_date(Some("2025-08-28")), "28-Aug-25");
    assert_eq!(format_ptp_date(None), "Not Set");
    assert_eq!(format_ptp_date(Some("")), "Not Set");
    // Unparseable values pass through untouched.
    assert_eq!(format_ptp_date(Some("tomorrow")), "tomorrow");
}
