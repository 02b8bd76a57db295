//! 追踪初始化、运行会话 ID 与协议计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 协议计数器快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub lines_received: u64,
    pub empty_lines: u64,
    pub automation_lines_dropped: u64,
    pub descriptors_registered: u64,
    pub readings_dispatched: u64,
    pub malformed_lines: u64,
    pub garbage_bytes_dropped: u64,
    pub sink_failures: u64,
    pub open_retries: u64,
    pub transport_errors: u64,
}

/// 协议计数器。
pub struct TelemetryMetrics {
    lines_received: AtomicU64,
    empty_lines: AtomicU64,
    automation_lines_dropped: AtomicU64,
    descriptors_registered: AtomicU64,
    readings_dispatched: AtomicU64,
    malformed_lines: AtomicU64,
    garbage_bytes_dropped: AtomicU64,
    sink_failures: AtomicU64,
    open_retries: AtomicU64,
    transport_errors: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            lines_received: AtomicU64::new(0),
            empty_lines: AtomicU64::new(0),
            automation_lines_dropped: AtomicU64::new(0),
            descriptors_registered: AtomicU64::new(0),
            readings_dispatched: AtomicU64::new(0),
            malformed_lines: AtomicU64::new(0),
            garbage_bytes_dropped: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            open_retries: AtomicU64::new(0),
            transport_errors: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            lines_received: self.lines_received.load(Ordering::Relaxed),
            empty_lines: self.empty_lines.load(Ordering::Relaxed),
            automation_lines_dropped: self.automation_lines_dropped.load(Ordering::Relaxed),
            descriptors_registered: self.descriptors_registered.load(Ordering::Relaxed),
            readings_dispatched: self.readings_dispatched.load(Ordering::Relaxed),
            malformed_lines: self.malformed_lines.load(Ordering::Relaxed),
            garbage_bytes_dropped: self.garbage_bytes_dropped.load(Ordering::Relaxed),
            sink_failures: self.sink_failures.load(Ordering::Relaxed),
            open_retries: self.open_retries.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数器实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成本次运行的 session_id。
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// 记录收到的非空行。
pub fn record_line_received() {
    metrics().lines_received.fetch_add(1, Ordering::Relaxed);
}

/// 记录空行（不算错误）。
pub fn record_empty_line() {
    metrics().empty_lines.fetch_add(1, Ordering::Relaxed);
}

/// 记录被过滤的自动化节点报文。
pub fn record_automation_line_dropped() {
    metrics()
        .automation_lines_dropped
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录注册成功的传感器描述。
pub fn record_descriptor_registered() {
    metrics()
        .descriptors_registered
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录已分发的读数。
pub fn record_reading_dispatched() {
    metrics().readings_dispatched.fetch_add(1, Ordering::Relaxed);
}

/// 记录格式错误而丢弃的行。
pub fn record_malformed_line() {
    metrics().malformed_lines.fetch_add(1, Ordering::Relaxed);
}

/// 记录无法解码为文本而丢弃的字节数。
pub fn record_garbage_bytes(count: u64) {
    if count == 0 {
        return;
    }
    metrics()
        .garbage_bytes_dropped
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录 sink 调用失败。
pub fn record_sink_failure() {
    metrics().sink_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录串口打开重试。
pub fn record_open_retry() {
    metrics().open_retries.fetch_add(1, Ordering::Relaxed);
}

/// 记录读写通道时的传输错误。
pub fn record_transport_error() {
    metrics().transport_errors.fetch_add(1, Ordering::Relaxed);
}
