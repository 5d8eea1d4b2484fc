//! Upload controller integration tests
//!
//! Drive the full pipeline (select → submit → result) against a mock
//! inference service.

mod helpers;

use std::time::Duration;

use drscan_client::models::UploadStatus;
use drscan_client::{ControllerError, SkipReason, SubmitOutcome, UploadClient, UploadController};
use drscan_common::events::{EventBus, NotificationLevel, UploadEvent, UploadPhase};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpers::{fundus_image, no_dr_body, unknown_highest_body, unreachable_base_url};

fn controller_for(base_url: &str) -> (UploadController, EventBus) {
    let event_bus = EventBus::new(64);
    let client = UploadClient::new(base_url).unwrap();
    (UploadController::new(client, event_bus.clone()), event_bus)
}

async fn mount_predict(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_successful_analysis_produces_display_model() {
    let server = MockServer::start().await;
    mount_predict(&server, ResponseTemplate::new(200).set_body_json(no_dr_body())).await;
    let (controller, _bus) = controller_for(&server.uri());

    controller.select(fundus_image()).await.unwrap();
    let outcome = controller.submit().await;

    let model = match outcome {
        SubmitOutcome::Completed(model) => model,
        other => panic!("expected completion, got {:?}", other),
    };
    assert_eq!(model.entries.len(), 5);
    assert_eq!(model.entries.iter().filter(|e| e.is_highest).count(), 1);
    assert_eq!(model.highest_entry().unwrap().label, "No DR");

    assert_eq!(controller.status().await, UploadStatus::Succeeded(model));
}

#[tokio::test]
async fn test_unknown_highest_label_still_succeeds() {
    let server = MockServer::start().await;
    mount_predict(&server, ResponseTemplate::new(200).set_body_json(unknown_highest_body())).await;
    let (controller, _bus) = controller_for(&server.uri());

    controller.select(fundus_image()).await.unwrap();

    match controller.submit().await {
        SubmitOutcome::Completed(model) => {
            assert_eq!(model.entries.len(), 5);
            assert!(model.entries.iter().all(|e| !e.is_highest));
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_detail_becomes_failed_message() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({ "detail": "invalid image format" })),
    )
    .await;
    let (controller, _bus) = controller_for(&server.uri());

    controller.select(fundus_image()).await.unwrap();
    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed("invalid image format".to_string()));
    assert_eq!(
        controller.status().await,
        UploadStatus::Failed {
            message: "invalid image format".to_string()
        }
    );
}

#[tokio::test]
async fn test_unparsable_500_becomes_status_message() {
    let server = MockServer::start().await;
    mount_predict(&server, ResponseTemplate::new(500)).await;
    let (controller, _bus) = controller_for(&server.uri());

    controller.select(fundus_image()).await.unwrap();

    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Failed("Server error: 500".to_string())
    );
}

#[tokio::test]
async fn test_transport_failure_is_contained() {
    let (controller, _bus) = controller_for(&unreachable_base_url());

    controller.select(fundus_image()).await.unwrap();

    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Failed("Failed to analyze image. Please try again.".to_string())
    );
    assert_eq!(controller.phase().await, UploadPhase::Failed);
}

#[tokio::test]
async fn test_concurrent_submits_issue_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(no_dr_body())
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (controller, _bus) = controller_for(&server.uri());

    controller.select(fundus_image()).await.unwrap();

    let second = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let phase = controller.phase().await;
        (phase, controller.submit().await)
    };
    let (first, (phase_during, second)) = tokio::join!(controller.submit(), second);

    assert_eq!(phase_during, UploadPhase::Submitting);
    assert!(matches!(first, SubmitOutcome::Completed(_)));
    assert_eq!(second, SubmitOutcome::Skipped(SkipReason::AlreadySubmitting));

    // Terminal state also refuses to resubmit until reset
    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Skipped(SkipReason::AwaitingReset(UploadPhase::Succeeded))
    );

    server.verify().await;
}

#[tokio::test]
async fn test_select_is_refused_while_submitting() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(200)
            .set_body_json(no_dr_body())
            .set_delay(Duration::from_millis(300)),
    )
    .await;
    let (controller, _bus) = controller_for(&server.uri());

    controller.select(fundus_image()).await.unwrap();

    let reselect = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.select(fundus_image()).await
    };
    let (outcome, reselect) = tokio::join!(controller.submit(), reselect);

    assert!(matches!(
        reselect,
        Err(ControllerError::InvalidTransition {
            action: "select",
            phase: UploadPhase::Submitting
        })
    ));
    assert!(matches!(outcome, SubmitOutcome::Completed(_)));
    assert_eq!(controller.phase().await, UploadPhase::Succeeded);
}

#[tokio::test]
async fn test_retry_after_failure_requires_reset_and_reselect() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_predict(&server, ResponseTemplate::new(200).set_body_json(no_dr_body())).await;
    let (controller, _bus) = controller_for(&server.uri());

    controller.select(fundus_image()).await.unwrap();
    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Failed("Server error: 503".to_string())
    );

    assert!(controller.select(fundus_image()).await.is_err());
    controller.reset().await.unwrap();
    assert_eq!(controller.phase().await, UploadPhase::Idle);

    controller.select(fundus_image()).await.unwrap();
    assert!(matches!(controller.submit().await, SubmitOutcome::Completed(_)));
}

#[tokio::test]
async fn test_events_follow_the_state_machine() {
    let server = MockServer::start().await;
    mount_predict(&server, ResponseTemplate::new(200).set_body_json(no_dr_body())).await;
    let (controller, bus) = controller_for(&server.uri());
    let mut events = bus.subscribe();

    controller.select(fundus_image()).await.unwrap();
    controller.submit().await;
    controller.reset().await.unwrap();

    let mut transitions = Vec::new();
    let mut notifications = Vec::new();
    while let Ok(event) = events.try_recv() {
        assert_eq!(event.widget_id(), controller.widget_id());
        match event {
            UploadEvent::StateChanged {
                old_phase,
                new_phase,
                ..
            } => transitions.push((old_phase, new_phase)),
            UploadEvent::Notification { level, message, .. } => notifications.push((level, message)),
        }
    }

    assert_eq!(
        transitions,
        vec![
            (UploadPhase::Idle, UploadPhase::Selected),
            (UploadPhase::Selected, UploadPhase::Submitting),
            (UploadPhase::Submitting, UploadPhase::Succeeded),
            (UploadPhase::Succeeded, UploadPhase::Idle),
        ]
    );
    assert_eq!(
        notifications,
        vec![(NotificationLevel::Success, "Image analysis complete!".to_string())]
    );
}

#[tokio::test]
async fn test_preview_is_released_when_submitting() {
    let server = MockServer::start().await;
    mount_predict(&server, ResponseTemplate::new(200).set_body_json(no_dr_body())).await;
    let (controller, _bus) = controller_for(&server.uri());

    controller.select(fundus_image()).await.unwrap();
    let preview_path = match controller.status().await {
        UploadStatus::Selected { preview_path, .. } => preview_path,
        other => panic!("expected Selected, got {:?}", other),
    };
    assert!(preview_path.exists());

    controller.submit().await;
    assert!(!preview_path.exists());
}
