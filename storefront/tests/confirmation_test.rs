//! Tests for the post-payment confirmation flow: exactly-once ticket
//! generation and distinct success/failure outcomes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use prontoticket_backend::ConfirmationId;
use prontoticket_core::reducer::Reducer;
use prontoticket_runtime::Store;
use prontoticket_storefront::mocks::{MockSessionStore, MockTicketingApi};
use prontoticket_storefront::reducers::ConfirmationReducer;
use prontoticket_storefront::{
    ConfirmationAction, ConfirmationOutcome, ConfirmationState, PaymentReturn,
    StorefrontEnvironment,
};
use prontoticket_testing::{ReducerTest, assertions, test_clock};
use std::sync::Arc;
use std::time::Duration;

type TestEnv = StorefrontEnvironment<MockTicketingApi, MockSessionStore>;
type TestReducer = ConfirmationReducer<MockTicketingApi, MockSessionStore>;
type TestStore = Store<ConfirmationState, ConfirmationAction, TestEnv, TestReducer>;

fn test_env(api: MockTicketingApi) -> TestEnv {
    StorefrontEnvironment::new(api, MockSessionStore::new(), Arc::new(test_clock()))
}

fn confirmation() -> ConfirmationId {
    ConfirmationId::new("cs_test_abc123")
}

async fn wait_for_state<F>(store: &TestStore, predicate: F)
where
    F: Fn(&ConfirmationState) -> bool,
{
    for _ in 0..200 {
        if store.state(&predicate).await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("store never reached the expected state");
}

// ============================================================================
// Reducer-level behavior
// ============================================================================

#[test]
fn test_confirm_payment_goes_pending_with_one_request() {
    ReducerTest::new(TestReducer::new())
        .with_env(test_env(MockTicketingApi::new()))
        .given_state(ConfirmationState::new())
        .when_action(ConfirmationAction::ConfirmPayment {
            confirmation: confirmation(),
        })
        .then_state(|state| {
            assert_eq!(state.outcome, ConfirmationOutcome::Pending);
            assert_eq!(state.confirmation, Some(confirmation()));
        })
        .then_effects(|effects| {
            assertions::assert_effects_count(effects, 1);
            assertions::assert_has_future_effect(effects);
        })
        .run();
}

#[test]
fn test_repeat_confirmation_is_ignored() {
    let mut state = ConfirmationState::new();
    state.confirmation = Some(confirmation());
    state.outcome = ConfirmationOutcome::Pending;

    ReducerTest::new(TestReducer::new())
        .with_env(test_env(MockTicketingApi::new()))
        .given_state(state)
        .when_action(ConfirmationAction::ConfirmPayment {
            confirmation: confirmation(),
        })
        .then_state(|state| {
            assert_eq!(state.outcome, ConfirmationOutcome::Pending);
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn test_success_and_failure_are_distinct_outcomes() {
    let reducer = TestReducer::new();
    let env = test_env(MockTicketingApi::new());

    let mut success = ConfirmationState::new();
    success.outcome = ConfirmationOutcome::Pending;
    reducer.reduce(
        &mut success,
        ConfirmationAction::TicketsGenerated { count: 3 },
        &env,
    );
    assert_eq!(success.outcome, ConfirmationOutcome::Generated { count: 3 });

    let mut failure = ConfirmationState::new();
    failure.outcome = ConfirmationOutcome::Pending;
    reducer.reduce(
        &mut failure,
        ConfirmationAction::TicketGenerationFailed {
            error: "generation backend down".to_string(),
        },
        &env,
    );
    assert_eq!(
        failure.outcome,
        ConfirmationOutcome::Failed {
            message: "generation backend down".to_string()
        }
    );
}

#[test]
fn test_cancelled_return_never_generates() {
    ReducerTest::new(TestReducer::new())
        .with_env(test_env(MockTicketingApi::new()))
        .given_state(ConfirmationState::new())
        .when_action(ConfirmationAction::PaymentCancelled)
        .then_state(|state| {
            assert_eq!(state.outcome, ConfirmationOutcome::Cancelled);
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn test_confirm_after_cancel_is_ignored() {
    let mut state = ConfirmationState::new();
    state.outcome = ConfirmationOutcome::Cancelled;

    ReducerTest::new(TestReducer::new())
        .with_env(test_env(MockTicketingApi::new()))
        .given_state(state)
        .when_action(ConfirmationAction::ConfirmPayment {
            confirmation: confirmation(),
        })
        .then_state(|state| {
            assert_eq!(state.outcome, ConfirmationOutcome::Cancelled);
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

// ============================================================================
// End-to-end through the store
// ============================================================================

#[tokio::test]
async fn test_exactly_one_generation_request() {
    let api = MockTicketingApi::new().with_generated(2);
    let store = Store::new(
        ConfirmationState::new(),
        TestReducer::new(),
        test_env(api.clone()),
    );

    // Double mount: the page fires its confirmation twice
    store
        .send(ConfirmationAction::ConfirmPayment {
            confirmation: confirmation(),
        })
        .await
        .unwrap();
    store
        .send(ConfirmationAction::ConfirmPayment {
            confirmation: confirmation(),
        })
        .await
        .unwrap();

    wait_for_state(&store, |s| {
        s.outcome == ConfirmationOutcome::Generated { count: 2 }
    })
    .await;

    assert_eq!(api.generate_calls(), 1);
}

#[tokio::test]
async fn test_generation_failure_is_surfaced() {
    let api = MockTicketingApi::new().failing_generation("confirmation unknown");
    let store = Store::new(
        ConfirmationState::new(),
        TestReducer::new(),
        test_env(api),
    );

    store
        .send(ConfirmationAction::ConfirmPayment {
            confirmation: confirmation(),
        })
        .await
        .unwrap();

    wait_for_state(&store, |s| {
        matches!(s.outcome, ConfirmationOutcome::Failed { .. })
    })
    .await;

    let ConfirmationOutcome::Failed { message } = store.state(|s| s.outcome.clone()).await else {
        panic!("expected failed outcome");
    };
    assert!(message.contains("confirmation unknown"));
}

// ============================================================================
// Return-route parsing drives the flow
// ============================================================================

#[tokio::test]
async fn test_payment_return_routes_to_actions() {
    let api = MockTicketingApi::new();
    let store = Store::new(
        ConfirmationState::new(),
        TestReducer::new(),
        test_env(api.clone()),
    );

    let action = match PaymentReturn::from_path("/failed-payment").unwrap() {
        PaymentReturn::Completed(confirmation) => {
            ConfirmationAction::ConfirmPayment { confirmation }
        },
        PaymentReturn::Cancelled => ConfirmationAction::PaymentCancelled,
    };
    store.send(action).await.unwrap();

    assert_eq!(
        store.state(|s| s.outcome.clone()).await,
        ConfirmationOutcome::Cancelled
    );
    assert_eq!(api.generate_calls(), 0);
}
