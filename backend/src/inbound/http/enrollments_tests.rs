//! Tests for the enrollment handlers.

use super::*;
use crate::domain::ports::{MockEnrollmentCommand, MockTrainingStatusQuery};
use crate::domain::{
    CompletionStatus, EnrollmentFailure, EnrollmentRecord, ErrorCode, LmsUserId,
};
use crate::inbound::http::messages::drain_messages;
use crate::inbound::http::test_utils::{session_cookie, test_session_middleware, test_state};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::json;

fn record(id: i64, email: &str, course: i64) -> EnrollmentRecord {
    EnrollmentRecord {
        id: EnrollmentId::new(id),
        campaign: CampaignRef::new(3),
        user_email: email.to_owned(),
        remote_user_id: LmsUserId::new(1),
        remote_course_id: CourseId::new(course),
        enrolled_at: Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).single().expect("valid date"),
        completion_status: CompletionStatus::Enrolled,
    }
}

fn mixed_report() -> EnrollmentReport {
    EnrollmentReport {
        remote_successes: 2,
        recorded: vec![record(1, "a@x.com", 10), record(2, "a@x.com", 20)],
        failures: vec![EnrollmentFailure::UserNotFound {
            email: "b@x.com".to_owned(),
        }],
        storage_error: None,
    }
}

#[rstest]
fn campaign_report_messages() {
    let messages = report_messages(&mixed_report(), CampaignRef::new(3));

    assert_eq!(
        messages,
        vec![
            FlashMessage::success("Successfully created 2 new enrollments."),
            FlashMessage::error("Failed to create some enrollments: b@x.com (User not found)"),
        ]
    );
}

#[rstest]
fn manual_report_uses_process_complete_wording() {
    let messages = report_messages(&mixed_report(), CampaignRef::MANUAL);

    assert_eq!(
        messages[0],
        FlashMessage::success("Process complete. Created 2 new course enrollments.")
    );
}

#[rstest]
fn storage_failure_replaces_success_message() {
    let report = EnrollmentReport {
        remote_successes: 3,
        recorded: Vec::new(),
        failures: Vec::new(),
        storage_error: Some("enrollment ledger query failed: database error".to_owned()),
    };

    let messages = report_messages(&report, CampaignRef::new(3));

    assert_eq!(
        messages,
        vec![FlashMessage::error(
            "Database error: enrollment ledger query failed: database error"
        )]
    );
}

#[rstest]
#[case(1, "Failed to create some enrollments: u0@x.com (User not found)")]
#[case(
    7,
    "Failed to create some enrollments: u0@x.com (User not found), u1@x.com (User not found), \
     u2@x.com (User not found), u3@x.com (User not found), u4@x.com (User not found) and 2 more"
)]
fn long_failure_lists_are_summarised(#[case] count: usize, #[case] expected: &str) {
    let report = EnrollmentReport {
        failures: (0..count)
            .map(|n| EnrollmentFailure::UserNotFound {
                email: format!("u{n}@x.com"),
            })
            .collect(),
        ..EnrollmentReport::default()
    };

    let messages = report_messages(&report, CampaignRef::MANUAL);

    assert_eq!(messages, vec![FlashMessage::error(expected)]);
    assert_eq!(report.failure_messages().len(), count);
}

#[rstest]
fn nothing_to_report_yields_no_messages() {
    assert!(report_messages(&EnrollmentReport::default(), CampaignRef::MANUAL).is_empty());
}

#[actix_web::test]
async fn campaign_enrollment_forwards_request_and_reports() {
    let mut command = MockEnrollmentCommand::new();
    command
        .expect_enroll()
        .withf(|request| {
            request.campaign == CampaignRef::new(3)
                && request.course_ids == vec![CourseId::new(10), CourseId::new(20)]
                && request.emails == vec!["a@x.com".to_owned(), "b@x.com".to_owned()]
        })
        .times(1)
        .return_once(|_| Ok(mixed_report()));
    let state = test_state().with_enrollments(command).build();
    let app = actix_test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(state)
            .service(enroll_campaign),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/enrollments")
        .set_json(json!({
            "campaignId": 3,
            "courseIds": [10, 20],
            "emails": ["a@x.com", "b@x.com"],
        }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: EnrollmentResultResponse = actix_test::read_body_json(res).await;
    assert_eq!(body.recorded, 2);
    assert_eq!(body.failures, vec!["b@x.com (User not found)".to_owned()]);
    assert_eq!(body.messages.len(), 2);
}

#[actix_web::test]
async fn manual_enrollment_splits_lines() {
    let mut command = MockEnrollmentCommand::new();
    command
        .expect_enroll()
        .withf(|request| {
            request.campaign.is_manual()
                && request.emails == vec!["a@x.com".to_owned(), "c@x.com".to_owned()]
        })
        .times(1)
        .return_once(|_| Ok(EnrollmentReport::default()));
    let state = test_state().with_enrollments(command).build();
    let app = actix_test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(state)
            .service(enroll_manual),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/enrollments/manual")
        .set_json(json!({"courseIds": [10], "emailsText": " a@x.com\n\nc@x.com \n"}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn validation_errors_become_bad_requests() {
    let mut command = MockEnrollmentCommand::new();
    command.expect_enroll().times(1).return_once(|_| {
        Err(Error::invalid_request(
            "Error: You must provide at least one email and select one course.",
        ))
    });
    let state = test_state().with_enrollments(command).build();
    let app = actix_test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(state)
            .service(enroll_manual),
    )
    .await;

    let req = actix_test::TestRequest::post()
        .uri("/enrollments/manual")
        .set_json(json!({"courseIds": [], "emailsText": ""}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Error = actix_test::read_body_json(res).await;
    assert_eq!(body.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case(
    DisenrollOutcome::Disenrolled { user_email: "a@x.com".to_owned() },
    StatusCode::OK
)]
#[case(DisenrollOutcome::NotFound, StatusCode::NOT_FOUND)]
#[case(
    DisenrollOutcome::RemoteRejected { message: "Unknown Moodle API error.".to_owned() },
    StatusCode::BAD_GATEWAY
)]
#[case(
    DisenrollOutcome::LedgerNotUpdated {
        user_email: "a@x.com".to_owned(),
        reason: "enrollment ledger query failed: database error".to_owned(),
    },
    StatusCode::SERVICE_UNAVAILABLE
)]
#[actix_web::test]
async fn disenroll_maps_outcomes(
    #[case] outcome: DisenrollOutcome,
    #[case] expected_status: StatusCode,
) {
    let mut command = MockEnrollmentCommand::new();
    command
        .expect_disenroll()
        .withf(|id| *id == EnrollmentId::new(11))
        .times(1)
        .return_once(move |_| Ok(outcome));
    let state = test_state().with_enrollments(command).build();
    let app = actix_test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(state)
            .service(disenroll),
    )
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri("/enrollments/11").to_request(),
    )
    .await;

    assert_eq!(res.status(), expected_status);
}

#[actix_web::test]
async fn remote_rejection_message_is_surfaced() {
    let mut command = MockEnrollmentCommand::new();
    command.expect_disenroll().times(1).return_once(|_| {
        Ok(DisenrollOutcome::RemoteRejected {
            message: "Invalid course".to_owned(),
        })
    });
    let state = test_state().with_enrollments(command).build();
    let app = actix_test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(state)
            .service(disenroll),
    )
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri("/enrollments/4").to_request(),
    )
    .await;

    let body: Error = actix_test::read_body_json(res).await;
    assert_eq!(
        body.message(),
        "Moodle API error: Could not disenroll user. Invalid course"
    );
}

#[actix_web::test]
async fn ledger_failure_after_remote_disenroll_is_flashed() {
    let mut command = MockEnrollmentCommand::new();
    command.expect_disenroll().times(1).return_once(|_| {
        Ok(DisenrollOutcome::LedgerNotUpdated {
            user_email: "a@x.com".to_owned(),
            reason: "enrollment ledger query failed: deadlock detected".to_owned(),
        })
    });
    let state = test_state().with_enrollments(command).build();
    let app = actix_test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(state)
            .service(disenroll)
            .service(drain_messages),
    )
    .await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri("/enrollments/4").to_request(),
    )
    .await;
    let cookie = session_cookie(&res).expect("session cookie set");
    let body: Error = actix_test::read_body_json(res).await;

    let expected = ledger_not_updated_message("a@x.com");
    assert_eq!(body.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(body.message(), expected);
    assert!(!body.message().contains("deadlock"));

    let drained = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/messages")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let messages: Vec<FlashMessage> = actix_test::read_body_json(drained).await;
    assert_eq!(messages, vec![FlashMessage::error(expected)]);
}

#[actix_web::test]
async fn training_status_serialises_labels() {
    let mut query = MockTrainingStatusQuery::new();
    query.expect_training_status().times(1).return_once(|| {
        let mut completed = record(5, "a@x.com", 10);
        completed.completion_status = CompletionStatus::InProgress;
        Ok(vec![TrainingStatusEntry {
            record: completed,
            course_name: "Unknown Course (ID: 10)".to_owned(),
        }])
    });
    let state = test_state().with_training_status(query).build();
    let app = actix_test::init_service(App::new().app_data(state).service(training_status)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/enrollments/status").to_request(),
    )
    .await;

    let body: Vec<TrainingStatusResponse> = actix_test::read_body_json(res).await;
    assert_eq!(body.len(), 1);
    assert_eq!(body[0].completion_status, "In Progress");
    assert_eq!(body[0].course_name, "Unknown Course (ID: 10)");
    assert_eq!(body[0].campaign_id, 3);
}
