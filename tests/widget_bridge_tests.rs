mod common;

use common::{harness_with, ready_harness, ScriptedEndpoint, CARD_SURFACE, TOKEN_SURFACE};
use payprobe::domain::envelope::ProbeSlot;
use payprobe::domain::log::Severity;
use payprobe::domain::widget::SessionPhase;
use payprobe::infrastructure::simulated::SimulationPlan;

#[tokio::test]
async fn test_card_mount_then_cancel() {
    let harness = ready_harness().await;

    let mounted = harness.probes.mount_card_widget(CARD_SURFACE).await;
    assert!(mounted.is_success());

    harness.driver.take(CARD_SURFACE).unwrap().cancel();

    let outcome = harness
        .probes
        .results()
        .latest(ProbeSlot::CardOutcome)
        .unwrap();
    assert!(!outcome.is_success());
    assert!(outcome.message().contains("cancelled"));
    // The mount slot still reports the mount itself.
    assert!(
        harness
            .probes
            .results()
            .latest(ProbeSlot::CardMount)
            .unwrap()
            .is_success()
    );
}

#[tokio::test]
async fn test_token_success_renders_detail() {
    let harness = ready_harness().await;
    harness.probes.mount_token_widget(TOKEN_SURFACE).await;

    harness.driver.take(TOKEN_SURFACE).unwrap().complete();

    let outcome = harness
        .probes
        .results()
        .latest(ProbeSlot::TokenOutcome)
        .unwrap();
    assert!(outcome.is_success());
    assert!(outcome.message().contains("tok_sim_"));
    assert_eq!(
        harness.surfaces.detail(TOKEN_SURFACE).unwrap()["token"]["id"],
        outcome.data().unwrap()["token"]["id"]
    );

    let last = harness.probes.log().entries().pop().unwrap();
    assert_eq!(last.severity, Severity::Success);
    assert_eq!(last.message, outcome.message());
}

#[tokio::test]
async fn test_interaction_error_after_successful_mount() {
    let harness = ready_harness().await;
    harness.probes.mount_card_widget(CARD_SURFACE).await;

    harness
        .driver
        .take(CARD_SURFACE)
        .unwrap()
        .fail("Your card was declined");

    let outcome = harness
        .probes
        .results()
        .latest(ProbeSlot::CardOutcome)
        .unwrap();
    assert!(!outcome.is_success());
    assert!(outcome.message().contains("Your card was declined"));
    assert_eq!(
        harness.probes.log().entries().pop().unwrap().severity,
        Severity::Error
    );
}

#[tokio::test]
async fn test_abandoned_widget_stays_pending() {
    let harness = ready_harness().await;
    harness.probes.mount_card_widget(CARD_SURFACE).await;

    assert_eq!(
        harness.probes.session_phase(CARD_SURFACE),
        Some(SessionPhase::Mounted)
    );
    assert!(
        harness
            .probes
            .results()
            .latest(ProbeSlot::CardOutcome)
            .is_none()
    );

    // Dropping the widget without acting delivers nothing.
    drop(harness.driver.take(CARD_SURFACE));
    assert_eq!(harness.probes.log().len(), 4);
}

#[tokio::test]
async fn test_cleared_surface_suppresses_late_outcome() {
    let harness = ready_harness().await;
    harness.probes.mount_card_widget(CARD_SURFACE).await;
    let log_len = harness.probes.log().len();

    harness.probes.clear_surface(CARD_SURFACE);
    assert_eq!(harness.probes.session_phase(CARD_SURFACE), None);

    harness.driver.take(CARD_SURFACE).unwrap().complete();

    assert!(
        harness
            .probes
            .results()
            .latest(ProbeSlot::CardOutcome)
            .is_none()
    );
    assert_eq!(harness.probes.log().len(), log_len);
    assert!(harness.surfaces.detail(CARD_SURFACE).is_none());
}

#[tokio::test]
async fn test_reset_drops_pending_sessions() {
    let harness = ready_harness().await;
    harness.probes.mount_card_widget(CARD_SURFACE).await;
    harness.probes.mount_token_widget(TOKEN_SURFACE).await;

    harness.probes.reset().await;
    for widget in harness.driver.drain() {
        widget.complete();
    }

    assert!(
        harness
            .probes
            .results()
            .latest(ProbeSlot::CardOutcome)
            .is_none()
    );
    assert!(
        harness
            .probes
            .results()
            .latest(ProbeSlot::TokenOutcome)
            .is_none()
    );
}

#[tokio::test]
async fn test_unknown_surface_fails_without_session() {
    let harness = ready_harness().await;

    let envelope = harness.probes.mount_card_widget("missing-element").await;

    assert!(!envelope.is_success());
    assert!(envelope.message().contains("missing-element"));
    assert_eq!(harness.driver.pending(), 0);
    assert_eq!(harness.probes.session_phase("missing-element"), None);
}

#[tokio::test]
async fn test_mount_failure_never_yields_outcome() {
    let harness = harness_with(
        SimulationPlan {
            mount_error: Some("Card form failed to load".to_string()),
            ..Default::default()
        },
        ScriptedEndpoint::status(200),
    );
    harness.probes.initialize().await;

    let envelope = harness.probes.mount_card_widget(CARD_SURFACE).await;

    assert!(!envelope.is_success());
    assert!(envelope.message().contains("Card form failed to load"));
    assert!(
        harness
            .surfaces
            .notice(CARD_SURFACE)
            .unwrap()
            .contains("Card form failed to load")
    );
    assert_eq!(harness.probes.session_phase(CARD_SURFACE), None);
    assert!(
        harness
            .probes
            .results()
            .latest(ProbeSlot::CardOutcome)
            .is_none()
    );
}

#[tokio::test]
async fn test_outcome_arrives_after_unrelated_probes() {
    let harness = ready_harness().await;
    harness.probes.mount_card_widget(CARD_SURFACE).await;

    harness.probes.test_payment_intent().await;
    harness.probes.check_cors().await;
    harness.driver.take(CARD_SURFACE).unwrap().complete();

    let entries = harness.probes.log().entries();
    let last = entries.last().unwrap();
    assert!(last.message.starts_with("Card payment completed"));
    assert_eq!(entries.len(), 9);
}

#[tokio::test]
async fn test_concurrent_probes_settle_independently() {
    let harness = ready_harness().await;

    let (card, token, intent) = tokio::join!(
        harness.probes.mount_card_widget(CARD_SURFACE),
        harness.probes.mount_token_widget(TOKEN_SURFACE),
        harness.probes.test_payment_intent(),
    );

    assert!(card.is_success());
    assert!(token.is_success());
    assert!(intent.is_success());
    assert_eq!(harness.driver.pending(), 2);
    assert_eq!(harness.probes.log().len(), 8);
}

#[tokio::test]
async fn test_outcome_after_surface_removed_is_dropped() {
    let harness = ready_harness().await;
    harness.probes.mount_card_widget(CARD_SURFACE).await;
    let log_len = harness.probes.log().len();

    harness.surfaces.remove(CARD_SURFACE);
    harness.driver.take(CARD_SURFACE).unwrap().complete();

    assert!(
        harness
            .probes
            .results()
            .latest(ProbeSlot::CardOutcome)
            .is_none()
    );
    assert_eq!(harness.probes.log().len(), log_len);
    assert_eq!(harness.probes.session_phase(CARD_SURFACE), None);
}

#[tokio::test]
async fn test_subscriber_sees_outcome_after_mount() {
    let harness = ready_harness().await;
    let mut events = harness.probes.results().subscribe();

    harness.probes.mount_card_widget(CARD_SURFACE).await;
    harness.driver.take(CARD_SURFACE).unwrap().cancel();

    let mounted = events.recv().await.unwrap();
    assert_eq!(mounted.slot, ProbeSlot::CardMount);
    assert!(mounted.envelope.is_success());

    let outcome = events.recv().await.unwrap();
    assert_eq!(outcome.slot, ProbeSlot::CardOutcome);
    assert!(outcome.envelope.message().contains("cancelled by user"));
}
