mod common;

use std::time::Duration;

use common::{guest_account, FakeError, GatedProvisioner, RecordingSession, ScriptedProvisioner};
use spendly_core::{
    api::Resource,
    auth::{AuthSession, MemoryTokenStore, TokenStore},
    onboarding::{OnboardingError, OnboardingFlow, OnboardingState, OnboardingStep},
};

fn flow_on_wallet_step() -> OnboardingFlow {
    let flow = OnboardingFlow::new();
    flow.set_favorite_categories(["c1", "c2"]);
    flow.next();
    flow.next();
    flow.set_main_currency_code("EUR");
    flow.next();
    flow.set_wallet_initial_balance(50_000);
    flow
}

#[test]
fn walking_the_steps_keeps_selections() {
    let flow = OnboardingFlow::new();
    assert_eq!(flow.state(), OnboardingState::default());

    flow.set_favorite_categories(["c1", "c2"]);
    flow.next();
    flow.next();
    flow.next();

    let state = flow.state();
    assert_eq!(state.step.index(), 3);
    assert_eq!(state.favorite_categories, vec!["c1", "c2"]);
    assert!(!state.completed);
}

#[tokio::test]
async fn finish_sends_selections_and_establishes_session() {
    let flow = flow_on_wallet_step();
    let provisioner = ScriptedProvisioner::replying([Ok(guest_account("u-1"))]);
    let session = RecordingSession::default();

    let outcome = flow.finish(&provisioner, &session).await.expect("finish");

    let requests = provisioner.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].main_currency_code, "EUR");
    assert_eq!(requests[0].favorite_categories, vec!["c1", "c2"]);
    assert_eq!(requests[0].wallet_initial_balance, 50_000);

    let established = session.established();
    assert_eq!(established.len(), 1);
    assert_eq!(established[0].0.id, "u-1");
    assert_eq!(established[0].1.access_token, "access-u-1");

    assert_eq!(outcome.user.id, "u-1");
    assert!(outcome.invalidated.contains(Resource::Wallets));
    assert!(outcome.invalidated.contains(Resource::Categories));

    let state = flow.state();
    assert!(state.completed);
    assert!(flow.is_completed());
    assert_eq!(state.step, OnboardingStep::Welcome);
    assert!(state.favorite_categories.is_empty());
    assert_eq!(state.main_currency_code, "USD");
    assert!(!flow.is_submitting());

    flow.reset();
    assert!(!flow.is_completed());
}

#[tokio::test]
async fn rejected_submission_leaves_state_untouched() {
    let flow = flow_on_wallet_step();
    let before = flow.state();
    let provisioner =
        ScriptedProvisioner::replying([Err(FakeError("currency not supported".into()))]);
    let session = RecordingSession::default();

    let err = flow.finish(&provisioner, &session).await.unwrap_err();

    assert_eq!(
        err,
        OnboardingError::SubmissionFailed("currency not supported".into())
    );
    assert_eq!(flow.state(), before);
    assert!(!flow.is_completed());
    assert!(!flow.is_submitting());
    assert!(session.established().is_empty());
}

#[tokio::test]
async fn retry_after_failure_succeeds() {
    let flow = flow_on_wallet_step();
    let provisioner = ScriptedProvisioner::replying([
        Err(FakeError("timeout".into())),
        Ok(guest_account("u-2")),
    ]);
    let session = RecordingSession::default();

    assert!(flow.finish(&provisioner, &session).await.is_err());
    let outcome = flow.finish(&provisioner, &session).await.expect("retry");

    assert_eq!(outcome.user.id, "u-2");
    assert_eq!(provisioner.requests().len(), 2);
    assert_eq!(provisioner.requests()[0], provisioner.requests()[1]);
}

#[tokio::test]
async fn session_failure_is_reported_as_submission_failure() {
    let flow = flow_on_wallet_step();
    let before = flow.state();
    let provisioner = ScriptedProvisioner::replying([Ok(guest_account("u-3"))]);
    let session = RecordingSession::refusing();

    let err = flow.finish(&provisioner, &session).await.unwrap_err();

    assert!(matches!(err, OnboardingError::SubmissionFailed(message) if message.contains("secure storage")));
    assert_eq!(flow.state(), before);
}

#[tokio::test]
async fn finish_before_wallet_step_is_refused() {
    let flow = OnboardingFlow::new();
    flow.next();
    let provisioner = ScriptedProvisioner::replying([Ok(guest_account("u-4"))]);
    let session = RecordingSession::default();

    let err = flow.finish(&provisioner, &session).await.unwrap_err();

    assert_eq!(err, OnboardingError::NotReady(OnboardingStep::CategorySelection));
    assert!(provisioner.requests().is_empty());
    assert!(!flow.is_submitting());
}

#[tokio::test]
async fn second_finish_while_outstanding_is_rejected_and_state_is_frozen() {
    let flow = flow_on_wallet_step();
    let (provisioner, release) = GatedProvisioner::new();
    let session = RecordingSession::default();

    let observer = &flow;

    let (first, second, ()) = tokio::join!(
        flow.finish(&provisioner, &session),
        flow.finish(&provisioner, &session),
        async move {
            let flow = observer;
            assert!(flow.is_submitting());
            flow.prev();
            flow.set_main_currency_code("UAH");
            assert_eq!(flow.step(), OnboardingStep::WalletSetup);
            assert_eq!(flow.payload().main_currency_code, "EUR");
            release.send(()).expect("release gate");
        }
    );

    assert_eq!(first.expect("first submission").user.id, "gated");
    assert_eq!(second.unwrap_err(), OnboardingError::InFlight);
    assert_eq!(session.established().len(), 1);
    assert!(!flow.is_submitting());
}

#[tokio::test]
async fn abandoned_submission_releases_the_guard() {
    let flow = flow_on_wallet_step();
    let (provisioner, _release) = GatedProvisioner::new();
    let session = RecordingSession::default();

    let attempt = tokio::time::timeout(
        Duration::from_millis(20),
        flow.finish(&provisioner, &session),
    )
    .await;

    assert!(attempt.is_err());
    assert!(!flow.is_submitting());
    assert_eq!(flow.step(), OnboardingStep::WalletSetup);
    flow.prev();
    assert_eq!(flow.step(), OnboardingStep::CurrencySelection);
}

#[tokio::test]
async fn finishing_into_an_auth_session_persists_tokens() {
    let flow = flow_on_wallet_step();
    let provisioner = ScriptedProvisioner::replying([Ok(guest_account("u-5"))]);
    let session = AuthSession::new(MemoryTokenStore::new());

    flow.finish(&provisioner, &session).await.expect("finish");

    assert!(session.is_authenticated());
    assert_eq!(session.user().map(|user| user.id), Some("u-5".to_string()));
    assert_eq!(
        session.store().access_token().unwrap().as_deref(),
        Some("access-u-5")
    );
}
