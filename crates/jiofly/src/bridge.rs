//! Poll/publish loop.
//!
//! One task polls the five status pages in order every tick and hands
//! each available page's facts to a [`FactSink`]. Fetch and publish
//! failures are logged and skipped; nothing here ends the loop except
//! cancellation.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use jiofly_api::{DeviceClient, Page, PageFacts};

use crate::publisher::{FactSink, topic_for};

/// Counters for one pass over all pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Pages fetched and parsed with a root element.
    pub pages_ok: usize,
    /// Pages that failed to fetch or came back unavailable.
    pub pages_failed: usize,
    /// Facts handed to the sink.
    pub published: usize,
    /// Facts the sink refused.
    pub dropped: usize,
}

pub struct Bridge<S> {
    device: DeviceClient,
    sink: S,
    root_topic: String,
    interval: Duration,
}

impl<S: FactSink> Bridge<S> {
    pub fn new(
        device: DeviceClient,
        sink: S,
        root_topic: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            device,
            sink,
            root_topic: root_topic.into(),
            interval,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Poll every page once, publishing what was extracted.
    pub async fn tick(&self) -> TickSummary {
        let mut summary = TickSummary::default();

        for page in Page::all() {
            match self.device.page(page).await {
                Ok(report) if report.is_available() => {
                    summary.pages_ok += 1;
                    self.publish_page(&report, &mut summary);
                }
                Ok(_) => {
                    summary.pages_failed += 1;
                    warn!(%page, "page unavailable, nothing to publish");
                }
                Err(e) => {
                    summary.pages_failed += 1;
                    warn!(%page, error = %e, transient = e.is_transient(), "page fetch failed");
                }
            }
        }

        debug!(
            pages_ok = summary.pages_ok,
            pages_failed = summary.pages_failed,
            published = summary.published,
            dropped = summary.dropped,
            "tick complete"
        );
        summary
    }

    fn publish_page(&self, report: &PageFacts, summary: &mut TickSummary) {
        for (fact, value) in &report.facts {
            let topic = topic_for(&self.root_topic, report.page, fact);
            match self.sink.publish(&topic, value) {
                Ok(()) => summary.published += 1,
                Err(e) => {
                    summary.dropped += 1;
                    warn!(%topic, error = %e, "publish dropped");
                }
            }
        }
    }

    /// Tick immediately, then every `interval`, until `cancel` fires.
    ///
    /// A tick in progress always completes; cancellation is only observed
    /// between ticks.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            device = %self.device.base_url(),
            root_topic = %self.root_topic,
            interval_secs = self.interval.as_secs(),
            "bridge started"
        );

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }

        info!("bridge stopped");
    }
}

/// Cancel `cancel` on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("interrupt received, stopping after current tick"),
        () = terminate => info!("terminate received, stopping after current tick"),
        () = cancel.cancelled() => return,
    }
    cancel.cancel();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use jiofly_api::TransportConfig;
    use pretty_assertions::assert_eq;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::publisher::PublishError;

    #[derive(Default)]
    struct RecordingSink {
        messages: Mutex<Vec<(String, String)>>,
    }

    impl RecordingSink {
        fn topics(&self) -> Vec<String> {
            self.messages
                .lock()
                .unwrap()
                .iter()
                .map(|(t, _)| t.clone())
                .collect()
        }
    }

    impl FactSink for RecordingSink {
        fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
            self.messages
                .lock()
                .unwrap()
                .push((topic.to_owned(), payload.to_owned()));
            Ok(())
        }
    }

    async fn mount(server: &MockServer, page_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{page_path}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    fn bridge(server: &MockServer) -> Bridge<RecordingSink> {
        let base = Url::parse(&server.uri()).unwrap();
        let device = DeviceClient::new(base, &TransportConfig::default()).unwrap();
        Bridge::new(
            device,
            RecordingSink::default(),
            "home/devices/jiofi",
            Duration::from_secs(30),
        )
    }

    #[tokio::test]
    async fn tick_publishes_available_pages_only() {
        let server = MockServer::start().await;
        mount(&server, "st_wan.w.xml", "<wan><t_tx>100</t_tx><t_rx>200</t_rx></wan>").await;
        mount(
            &server,
            "st_per.w.xml",
            "<perf><cpu>3,47</cpu><curr_tx>12</curr_tx></perf>",
        )
        .await;
        // Everything else 404s.

        let bridge = bridge(&server);
        let summary = bridge.tick().await;

        assert_eq!(
            summary,
            TickSummary {
                pages_ok: 2,
                pages_failed: 3,
                published: 5,
                dropped: 0,
            }
        );
        assert_eq!(
            bridge.sink.topics(),
            [
                "home/devices/jiofi/wan_info/t_rx",
                "home/devices/jiofi/wan_info/t_tx",
                "home/devices/jiofi/sys_perf/cpu_usg_max",
                "home/devices/jiofi/sys_perf/cpu_usg_min",
                "home/devices/jiofi/sys_perf/curr_tx",
            ]
        );
        let messages = bridge.sink.messages.lock().unwrap();
        assert_eq!(messages[2].1, "47");
    }

    #[tokio::test]
    async fn unparsable_page_counts_as_failed() {
        let server = MockServer::start().await;
        mount(&server, "st_dev.w.xml", "<html>oops").await;

        let summary = bridge(&server).tick().await;
        assert_eq!(summary.pages_ok, 0);
        assert_eq!(summary.pages_failed, 5);
        assert_eq!(summary.published, 0);
    }

    #[tokio::test]
    async fn cancelled_run_returns_without_polling() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        bridge(&server).run(cancel).await;
    }

    #[tokio::test]
    async fn run_repeats_on_interval_and_finishes_current_tick_on_cancel() {
        let server = MockServer::start().await;
        mount(&server, "st_wan.w.xml", "<wan><t_tx>1</t_tx></wan>").await;

        let base = Url::parse(&server.uri()).unwrap();
        let device = DeviceClient::new(base, &TransportConfig::default()).unwrap();
        let bridge = Bridge::new(
            device,
            RecordingSink::default(),
            "root",
            Duration::from_millis(400),
        );
        let cancel = CancellationToken::new();

        let server = &server;
        let requests = move || async move { server.received_requests().await.unwrap().len() };

        let driver = async {
            // First tick fires immediately.
            tokio::time::sleep(Duration::from_millis(200)).await;
            assert_eq!(requests().await, 5);

            // Cancel as soon as the second tick has started.
            while requests().await < 6 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            cancel.cancel();
        };

        tokio::time::timeout(Duration::from_secs(5), async {
            tokio::join!(bridge.run(cancel.clone()), driver);
        })
        .await
        .unwrap();

        // The second tick ran to completion; no third tick was scheduled.
        assert_eq!(requests().await, 10);
        assert_eq!(bridge.sink.topics(), ["root/wan_info/t_tx", "root/wan_info/t_tx"]);
    }

    #[tokio::test]
    async fn refused_publishes_are_counted() {
        struct FullSink;
        impl FactSink for FullSink {
            fn publish(&self, _topic: &str, _payload: &str) -> Result<(), PublishError> {
                // No event loop left to drain the queue.
                let (client, event_loop) = rumqttc::AsyncClient::new(
                    rumqttc::MqttOptions::new("test", "localhost", 1883),
                    1,
                );
                drop(event_loop);
                client.try_publish("t", rumqttc::QoS::AtMostOnce, false, Vec::new())?;
                Ok(())
            }
        }

        let server = MockServer::start().await;
        mount(&server, "st_wan.w.xml", "<wan><plps>0</plps></wan>").await;

        let base = Url::parse(&server.uri()).unwrap();
        let device = DeviceClient::new(base, &TransportConfig::default()).unwrap();
        let bridge = Bridge::new(device, FullSink, "root", Duration::from_secs(30));
        let summary = bridge.tick().await;

        assert_eq!(summary.published, 0);
        assert_eq!(summary.dropped, 1);
    }
}
