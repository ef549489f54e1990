//! `jiofly bridge`: run the poll/publish loop.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bridge::{Bridge, shutdown_signal};
use crate::cli::{BridgeArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::publisher::MqttPublisher;

/// How long to wait for queued messages and the DISCONNECT to flush.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn handle(args: &BridgeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::apply_bridge_overrides(config::resolve(global)?, args)?;
    let device = super::device_client(&cfg)?;

    let cancel = CancellationToken::new();
    let (publisher, event_loop) = MqttPublisher::start(&cfg.mqtt, cancel.clone());
    let bridge = Bridge::new(
        device,
        publisher,
        cfg.mqtt.root_topic.clone(),
        cfg.poll_interval(),
    );

    let mut dropped = 0;
    if args.once {
        dropped = bridge.tick().await.dropped;
    } else {
        tokio::spawn(shutdown_signal(cancel.clone()));
        bridge.run(cancel.clone()).await;
    }

    // Let the event loop flush what is queued, then stop it.
    if let Err(e) = bridge.sink().disconnect().await {
        debug!(error = %e, "disconnect not queued");
    }
    cancel.cancel();
    match tokio::time::timeout(DRAIN_TIMEOUT, event_loop).await {
        Ok(_) => info!("disconnected from broker"),
        Err(_) => warn!("broker did not acknowledge shutdown in time"),
    }

    if dropped > 0 {
        return Err(CliError::Broker {
            message: format!("{dropped} facts could not be queued for publishing"),
        });
    }
    Ok(())
}
