//! MQTT publishing of page facts.
//!
//! Each fact becomes one message on `<root>/<page>/<fact>` whose payload
//! is the fact value. Publishing never blocks the poll loop: if the
//! client's request queue is full (broker down), the message is dropped
//! and counted.

use std::time::Duration;

use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use jiofly_api::Page;
use jiofly_config::MqttSettings;

/// Requests buffered between the bridge and the event loop; a few ticks
/// worth of facts.
const REQUEST_CAPACITY: usize = 256;

/// Pause between reconnect attempts after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),
}

/// Build the topic a fact is published on.
pub fn topic_for(root: &str, page: Page, fact: &str) -> String {
    format!("{}/{page}/{fact}", root.trim_end_matches('/'))
}

/// Destination for published facts.
pub trait FactSink {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError>;
}

/// `FactSink` backed by a `rumqttc` client.
pub struct MqttPublisher {
    client: AsyncClient,
    qos: QoS,
    retain: bool,
}

impl MqttPublisher {
    /// Create the client and spawn the task driving its event loop.
    ///
    /// The event loop keeps reconnecting until `shutdown` is cancelled,
    /// then exits once the outgoing DISCONNECT has been flushed or the
    /// connection fails.
    pub fn start(settings: &MqttSettings, shutdown: CancellationToken) -> (Self, JoinHandle<()>) {
        let mut options = MqttOptions::new(&settings.client_id, &settings.host, settings.port);
        options.set_keep_alive(Duration::from_secs(settings.keep_alive));
        if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
            options.set_credentials(user, pass);
        }

        let (client, event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);
        let broker = format!("{}:{}", settings.host, settings.port);
        let handle = tokio::spawn(drive_event_loop(event_loop, broker, shutdown));

        let publisher = Self {
            client,
            qos: qos_from_level(settings.qos),
            retain: settings.retain,
        };
        (publisher, handle)
    }

    /// Queue a DISCONNECT for the broker.
    pub async fn disconnect(&self) -> Result<(), PublishError> {
        self.client.disconnect().await?;
        Ok(())
    }
}

impl FactSink for MqttPublisher {
    fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        self.client
            .try_publish(topic, self.qos, self.retain, payload.as_bytes().to_vec())?;
        Ok(())
    }
}

/// Map a configured QoS level (already validated to be 0..=2).
pub fn qos_from_level(level: u8) -> QoS {
    match level {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        _ => QoS::ExactlyOnce,
    }
}

async fn drive_event_loop(mut event_loop: EventLoop, broker: String, shutdown: CancellationToken) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                info!(%broker, code = ?ack.code, "connected to broker");
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                debug!(%broker, "disconnect sent");
                break;
            }
            Ok(event) => debug!(?event, "mqtt event"),
            Err(e) => {
                if shutdown.is_cancelled() {
                    debug!(error = %e, "event loop stopped during shutdown");
                    break;
                }
                log_connection_error(&broker, &e);
                tokio::select! {
                    () = shutdown.cancelled() => break,
                    () = tokio::time::sleep(RECONNECT_DELAY) => {}
                }
            }
        }
    }
}

fn log_connection_error(broker: &str, err: &ConnectionError) {
    warn!(
        %broker,
        error = %err,
        retry_in_secs = RECONNECT_DELAY.as_secs(),
        "broker connection error"
    );
}
