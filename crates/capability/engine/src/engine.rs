//! 协议引擎实现

use crate::config::EngineConfig;
use crate::state::{EnginePhase, EngineState};
use bus_ingest::{DiscoveryCoordinator, ReadingDispatcher};
use bus_protocol::{LineChannel, encode};
use bus_storage::RecordSink;
use bus_telemetry::{new_session_id, record_sink_failure};
use domain::Command;
use std::future::Future;
use std::sync::Arc;
use tracing::{Instrument, info, info_span, warn};

/// 协议引擎：独占状态与通道，按阶段推进。
pub struct ProtocolEngine {
    config: EngineConfig,
    sink: Arc<dyn RecordSink>,
    state: EngineState,
    session_id: String,
}

impl ProtocolEngine {
    pub fn new(config: EngineConfig, sink: Arc<dyn RecordSink>) -> Self {
        Self {
            config,
            sink,
            state: EngineState::default(),
            session_id: new_session_id(),
        }
    }

    /// 使用外部生成的 session_id（与文件记录器共用）
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// 运行状态机，直到进入终态。
    ///
    /// `open_channel` 在等待期结束后调用，应阻塞到通道可用为止。
    /// 串口通道的读数阶段不会返回；返回值为终态时的引擎状态。
    pub async fn run<C, F, Fut>(mut self, open_channel: F) -> EngineState
    where
        C: LineChannel,
        F: FnOnce() -> Fut,
        Fut: Future<Output = C>,
    {
        let span = info_span!("session", session_id = %self.session_id);
        async move {
            info!(
                target: "bus.engine",
                settle_ms = self.config.settle_delay.as_millis() as u64,
                "waiting for peers to initialize"
            );
            tokio::time::sleep(self.config.settle_delay).await;

            let mut channel = open_channel().await;
            self.enter(EnginePhase::ChannelsOpen);

            self.announce(&mut channel, Command::Connection).await;
            self.enter(EnginePhase::Announced);

            self.enter(EnginePhase::Discovering);
            let outcome = DiscoveryCoordinator::new(self.config.discovery.clone())
                .run(&mut channel)
                .await;
            self.state.registry = outcome.registry;
            self.state.ready = outcome.ready;

            if !self.state.ready {
                self.enter(EnginePhase::Idle);
                return self.state;
            }

            if let Err(e) = self
                .sink
                .on_discovery_complete(self.state.registry.as_slice())
                .await
            {
                record_sink_failure();
                warn!(target: "bus.engine", error = %e, "registry_record_failed");
            }

            self.announce(&mut channel, Command::ReadingState).await;
            self.enter(EnginePhase::Reading);

            let summary = ReadingDispatcher::new(self.sink.clone())
                .with_poll_interval(self.config.discovery.poll_interval)
                .with_retry_interval(self.config.retry_interval)
                .run(&mut channel)
                .await;
            info!(
                target: "bus.engine",
                dispatched = summary.dispatched,
                automation = summary.automation,
                malformed = summary.malformed,
                sink_failures = summary.sink_failures,
                "reading_loop_finished"
            );
            self.state
        }
        .instrument(span)
        .await
    }

    /// 发送命令（不等待应答、不重试）
    async fn announce<C: LineChannel>(&self, channel: &mut C, command: Command) {
        let line = encode(command);
        match channel.write_line(&line).await {
            Ok(()) => info!(target: "bus.engine", command = ?command, line = %line, "command_sent"),
            Err(e) => warn!(
                target: "bus.engine",
                command = ?command,
                error = %e,
                "command_send_failed"
            ),
        }
    }

    fn enter(&mut self, phase: EnginePhase) {
        info!(
            target: "bus.engine",
            from = %self.state.phase,
            to = %phase,
            terminal = phase.is_terminal(),
            "phase_changed"
        );
        self.state.phase = phase;
    }
}
