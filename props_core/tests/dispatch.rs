//! Dispatcher and session behaviour over fake channels.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{request_for, values, FakeChannel};
use props_core::channel::ChannelRoute;
use props_core::{
    ComputationKind, ComputeSession, DispatchError, Dispatcher, FallbackPolicy, Timing,
};

fn dispatcher(embedded: &Arc<FakeChannel>, remote: &Arc<FakeChannel>) -> Dispatcher {
    Dispatcher::new(embedded.clone(), remote.clone())
}

#[tokio::test]
async fn test_embedded_success_is_untimed_for_every_kind() {
    for kind in ComputationKind::ALL {
        let embedded = FakeChannel::answering(ChannelRoute::Embedded, values(kind.arity()));
        let remote = FakeChannel::answering(ChannelRoute::Remote, values(kind.arity()));

        let slot = dispatcher(&embedded, &remote)
            .compute(kind, &request_for(kind))
            .await
            .unwrap();

        assert_eq!(slot.values(), values(kind.arity()).as_slice());
        assert_eq!(slot.kind(), Some(kind));
        assert_eq!(slot.timing, Timing::ZERO);
        assert_eq!(embedded.calls(), 1);
        assert_eq!(remote.calls(), 0);
    }
}

#[tokio::test]
async fn test_remote_used_when_bridge_absent() {
    // Embedded channel absent, remote answers [0.1, 0.2, 0.3]
    let kind = ComputationKind::ThermalExpansionForHoneycomb;
    let embedded = FakeChannel::absent(ChannelRoute::Embedded);
    let remote = FakeChannel::answering(ChannelRoute::Remote, vec![0.1, 0.2, 0.3]);

    let slot = dispatcher(&embedded, &remote)
        .compute(kind, &request_for(kind))
        .await
        .unwrap();

    assert_eq!(slot.values(), &[0.1, 0.2, 0.3]);
    assert!(slot.timing.nanos() < 1_000_000_000);
    assert_eq!(embedded.calls(), 0);
    assert_eq!(remote.calls(), 1);
}

#[tokio::test]
async fn test_remote_timing_contains_call_window() {
    for kind in ComputationKind::ALL {
        let embedded = FakeChannel::absent(ChannelRoute::Embedded);
        let remote = FakeChannel::slow(ChannelRoute::Remote, values(kind.arity()), Duration::from_millis(20));

        let slot = dispatcher(&embedded, &remote)
            .compute(kind, &request_for(kind))
            .await
            .unwrap();

        let window = remote.windows()[0];
        assert!(window >= Duration::from_millis(20), "{kind}");
        assert!(slot.timing.as_duration() >= window, "{kind}");
        assert!(!slot.timing.is_zero(), "{kind}");
        assert_eq!(slot.kind(), Some(kind));
    }
}

#[tokio::test]
async fn test_both_channels_absent_reports_failure() {
    let kind = ComputationKind::ThermalExpansionForHoneycomb;
    let embedded = FakeChannel::absent(ChannelRoute::Embedded);
    let remote = FakeChannel::absent(ChannelRoute::Remote);

    let err = dispatcher(&embedded, &remote)
        .compute(kind, &request_for(kind))
        .await
        .unwrap_err();

    assert!(!err.is_routing_signal());
    assert_eq!(err.error_code(), "CHANNEL_INVOCATION_ERROR");
    assert_eq!(embedded.calls(), 0);
    assert_eq!(remote.calls(), 0);
}

#[tokio::test]
async fn test_embedded_error_is_not_masked_by_remote() {
    let kind = ComputationKind::ThermalExpansionForUnidirectionalComposite;
    let embedded = FakeChannel::failing(ChannelRoute::Embedded, "negative modulus");
    let remote = FakeChannel::answering(ChannelRoute::Remote, values(3));

    let err = dispatcher(&embedded, &remote)
        .compute(kind, &request_for(kind))
        .await
        .unwrap_err();

    assert_eq!(err, DispatchError::channel_invocation("embedded", "negative modulus"));
    assert_eq!(embedded.calls(), 1);
    assert_eq!(remote.calls(), 0);
}

#[tokio::test]
async fn test_embedded_short_response_rejected() {
    let kind = ComputationKind::ThermalExpansionForHoneycomb;
    let embedded = FakeChannel::answering(ChannelRoute::Embedded, vec![0.1, 0.2]);
    let remote = FakeChannel::answering(ChannelRoute::Remote, values(3));
    let mut session = ComputeSession::new(dispatcher(&embedded, &remote));

    let err = session
        .compute_detailed(kind, &request_for(kind))
        .await
        .unwrap_err();

    assert_eq!(err, DispatchError::arity_mismatch(kind.command(), 3, 2));
    assert!(session.slot().is_empty());
    assert_eq!(remote.calls(), 0);
}

#[tokio::test]
async fn test_remote_wrong_arity_rejected() {
    let kind = ComputationKind::ElasticModulesForUnidirectionalComposite;
    let embedded = FakeChannel::absent(ChannelRoute::Embedded);
    let remote = FakeChannel::answering(ChannelRoute::Remote, values(8));

    let err = dispatcher(&embedded, &remote)
        .compute(kind, &request_for(kind))
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "ARITY_MISMATCH");
}

#[tokio::test]
async fn test_any_failure_policy_falls_back() {
    let kind = ComputationKind::ThermalConductivityForUnidirectionalComposite;
    let embedded = FakeChannel::failing(ChannelRoute::Embedded, "host crashed");
    let remote = FakeChannel::answering(ChannelRoute::Remote, vec![20.8, 1.33, 1.33]);

    let slot = dispatcher(&embedded, &remote)
        .with_policy(FallbackPolicy::AnyEmbeddedFailure)
        .compute(kind, &request_for(kind))
        .await
        .unwrap();

    assert_eq!(slot.values(), &[20.8, 1.33, 1.33]);
    assert_eq!(embedded.calls(), 1);
    assert_eq!(remote.calls(), 1);
}

#[tokio::test]
async fn test_bridge_vanishing_mid_flight_routes_to_remote() {
    // Presence check passes, the attempt itself reports the bridge missing
    let kind = ComputationKind::ThermalExpansionForHoneycomb;
    let embedded = FakeChannel::new(
        ChannelRoute::Embedded,
        true,
        Err(DispatchError::channel_unavailable("embedded")),
    );
    let remote = FakeChannel::answering(ChannelRoute::Remote, values(3));

    let slot = dispatcher(&embedded, &remote)
        .compute(kind, &request_for(kind))
        .await
        .unwrap();

    assert_eq!(slot.values(), values(3).as_slice());
    assert_eq!(remote.calls(), 1);
}

#[tokio::test]
async fn test_missing_parameter_reaches_no_channel() {
    let kind = ComputationKind::ElasticModulesForHoneycomb;
    let embedded = FakeChannel::answering(ChannelRoute::Embedded, values(9));
    let remote = FakeChannel::answering(ChannelRoute::Remote, values(9));

    // A thermal-expansion request lacks the honeycomb moduli
    let request = request_for(ComputationKind::ThermalExpansionForHoneycomb);
    let err = dispatcher(&embedded, &remote).compute(kind, &request).await.unwrap_err();

    assert_eq!(err, DispatchError::missing_field("e_for_honeycomb"));
    assert_eq!(embedded.calls() + remote.calls(), 0);
}

#[tokio::test]
async fn test_session_failure_keeps_previous_slot() {
    let kind = ComputationKind::ThermalExpansionForHoneycomb;
    let good = dispatcher(
        &FakeChannel::absent(ChannelRoute::Embedded),
        &FakeChannel::slow(ChannelRoute::Remote, vec![0.1, 0.2, 0.3], Duration::from_millis(2)),
    );
    let mut session = ComputeSession::new(good);
    assert!(session.compute(kind, &request_for(kind)).await);
    let before = serde_json::to_vec(session.slot()).unwrap();

    // Both channels unusable from now on
    let bad = dispatcher(
        &FakeChannel::absent(ChannelRoute::Embedded),
        &FakeChannel::failing(ChannelRoute::Remote, "503 Service Unavailable"),
    );
    session.replace_dispatcher(bad);
    assert!(!session.compute(kind, &request_for(kind)).await);

    let after = serde_json::to_vec(session.slot()).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_session_replaces_slot_wholesale() {
    let embedded = FakeChannel::absent(ChannelRoute::Embedded);
    let remote = FakeChannel::answering(ChannelRoute::Remote, values(3));
    let mut session = ComputeSession::new(dispatcher(&embedded, &remote));

    let thermal = ComputationKind::ThermalExpansionForHoneycomb;
    assert!(session.compute(thermal, &request_for(thermal)).await);
    assert_eq!(session.slot().kind(), Some(thermal));

    let nine = FakeChannel::answering(ChannelRoute::Embedded, values(9));
    session.replace_dispatcher(dispatcher(&nine, &remote));
    let elastic = ComputationKind::ElasticModulesForHoneycomb;
    assert!(session.compute(elastic, &request_for(elastic)).await);

    assert_eq!(session.slot().kind(), Some(elastic));
    assert_eq!(session.slot().values().len(), 9);
    assert_eq!(session.slot().timing, Timing::ZERO);
}
