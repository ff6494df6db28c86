//! Dispatcher and backend client tests.
//!
//! Test organization:
//! - unauthorized.rs: 401 handling and credential renewal
//! - unreachable.rs: timeouts, network errors and connectivity recovery
//! - rejected.rs: error statuses surfaced to callers
//! - deferred.rs: requests sent while the queue is paused
//! - json.rs: `send_json` envelopes
//! - layer.rs: `DispatchLayer` in a tower stack

mod layer;

use crate::common::ScriptedTransport;
use backend_resilience_dispatch::{BackendClient, BackendUrls, DispatchConfig};
use backend_resilience_renewal::RenewCredentials;
use tokio::sync::mpsc;

pub(crate) type Client = BackendClient<ScriptedTransport>;

pub(crate) fn client(
    transport: &ScriptedTransport,
) -> (Client, mpsc::UnboundedReceiver<RenewCredentials>) {
    client_with(transport, DispatchConfig::default())
}

pub(crate) fn client_with(
    transport: &ScriptedTransport,
    config: DispatchConfig,
) -> (Client, mpsc::UnboundedReceiver<RenewCredentials>) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let (renewals, renewal_rx) = mpsc::unbounded_channel();
    let client = BackendClient::builder(
        transport.clone(),
        BackendUrls::new("http://localhost", "wss://localhost"),
        renewals,
    )
    .dispatch(config)
    .build();
    (client, renewal_rx)
}

pub(crate) fn user_url() -> String {
    "http://localhost/user".to_string()
}
