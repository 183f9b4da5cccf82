// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use knot_gateway_core::dispatcher::DispatchOutcome;
use knot_gateway_core::trust::store::ConnectionHandle;

use crate::integration_tests::common::Harness;

/// §9 open question, decided: an unrecognized message type gets no reply
/// at all rather than a synthesized error response, since the spec itself
/// leaves the response type "undefined" for this case.
#[tokio::test]
async fn unrecognized_message_type_gets_no_reply() {
    let harness = Harness::new();
    let handle = ConnectionHandle(1);

    // 0xFE is not one of the message types this gateway recognizes.
    let pdu = [0xFEu8, 0x00];
    let outcome = harness.send(handle, &pdu).await;

    assert_eq!(outcome, DispatchOutcome::NoReply);
    assert_eq!(harness.cloud.calls.mknode.load(std::sync::atomic::Ordering::Relaxed), 0);
}
