//! 读数分发
//!
//! 只有发现窗口得到 ready 后才进入；对串口通道而言没有退出条件。
//! 格式错误只影响当前行，sink 失败只记录告警。

use crate::filter::{Inbound, classify};
use bus_protocol::{LineChannel, ProtocolError, decode_reading_record};
use bus_storage::RecordSink;
use bus_telemetry::{
    record_automation_line_dropped, record_empty_line, record_line_received,
    record_malformed_line, record_reading_dispatched, record_sink_failure,
    record_transport_error,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// 单次轮询的结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 通道当前无数据
    Idle,
    /// 空行
    Empty,
    /// 自动化节点报文，已丢弃
    Automation,
    /// 已交给 sink
    Dispatched,
    /// 已解码但 sink 返回错误
    SinkFailed,
    /// 格式错误，已丢弃
    Malformed,
}

/// 分发循环结束（通道关闭）时的统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub dispatched: u64,
    pub automation: u64,
    pub malformed: u64,
    pub sink_failures: u64,
}

impl DispatchSummary {
    fn count(&mut self, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Dispatched => self.dispatched += 1,
            DispatchOutcome::Automation => self.automation += 1,
            DispatchOutcome::Malformed => self.malformed += 1,
            DispatchOutcome::SinkFailed => self.sink_failures += 1,
            DispatchOutcome::Idle | DispatchOutcome::Empty => {}
        }
    }
}

/// 读数分发器
pub struct ReadingDispatcher {
    sink: Arc<dyn RecordSink>,
    poll_interval: Duration,
    retry_interval: Duration,
}

impl ReadingDispatcher {
    pub fn new(sink: Arc<dyn RecordSink>) -> Self {
        Self {
            sink,
            poll_interval: Duration::from_millis(1),
            retry_interval: Duration::from_secs(1),
        }
    }

    /// 无数据时单次等待上限
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// 传输错误后的退避间隔
    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    /// 常驻循环：仅在通道关闭时返回。
    pub async fn run<C>(&self, channel: &mut C) -> DispatchSummary
    where
        C: LineChannel + ?Sized,
    {
        let mut summary = DispatchSummary::default();
        loop {
            match self.poll_once(channel).await {
                Ok(DispatchOutcome::Idle) => tokio::time::sleep(self.poll_interval).await,
                Ok(outcome) => summary.count(outcome),
                Err(ProtocolError::ChannelClosed) => {
                    info!(
                        target: "bus.dispatch",
                        dispatched = summary.dispatched,
                        malformed = summary.malformed,
                        "channel closed, reading loop stopped"
                    );
                    return summary;
                }
                Err(e) => {
                    record_transport_error();
                    warn!(
                        target: "bus.dispatch",
                        error = %e,
                        "read failed, retrying in {}ms",
                        self.retry_interval.as_millis()
                    );
                    tokio::time::sleep(self.retry_interval).await;
                }
            }
        }
    }

    /// 读取并处理至多一行。
    pub async fn poll_once<C>(&self, channel: &mut C) -> Result<DispatchOutcome, ProtocolError>
    where
        C: LineChannel + ?Sized,
    {
        match channel.try_read_line().await? {
            Some(line) => Ok(self.handle_line(&line).await),
            None => Ok(DispatchOutcome::Idle),
        }
    }

    /// 处理一行读数报文。
    pub async fn handle_line(&self, line: &str) -> DispatchOutcome {
        let (sender, peer_line) = match classify(line) {
            Ok(Inbound::Empty) => {
                record_empty_line();
                return DispatchOutcome::Empty;
            }
            Ok(Inbound::Automation(command)) => {
                record_line_received();
                record_automation_line_dropped();
                debug!(
                    target: "bus.dispatch",
                    command = ?command,
                    line = %line,
                    "automation_line_dropped"
                );
                return DispatchOutcome::Automation;
            }
            Ok(Inbound::Peer(sender, peer_line)) => (sender, peer_line),
            Err(e) => {
                record_line_received();
                record_malformed_line();
                warn!(target: "bus.dispatch", line = %line, error = %e, "malformed_line_skipped");
                return DispatchOutcome::Malformed;
            }
        };

        record_line_received();
        let reading = match decode_reading_record(peer_line) {
            Ok(reading) => reading,
            Err(e) => {
                record_malformed_line();
                warn!(
                    target: "bus.dispatch",
                    sender = %sender,
                    line = %line,
                    error = %e,
                    "malformed_line_skipped"
                );
                return DispatchOutcome::Malformed;
            }
        };

        match self.sink.on_reading(&reading).await {
            Ok(()) => {
                record_reading_dispatched();
                debug!(
                    target: "bus.dispatch",
                    sender = %sender,
                    value = reading.value,
                    "reading_dispatched"
                );
                DispatchOutcome::Dispatched
            }
            Err(e) => {
                record_sink_failure();
                warn!(
                    target: "bus.dispatch",
                    sender = %sender,
                    error = %e,
                    "sink_failed"
                );
                DispatchOutcome::SinkFailed
            }
        }
    }
}
