//! 多路记录

use crate::error::StorageError;
use crate::traits::RecordSink;
use domain::{ReadingRecord, SensorDescriptor};
use std::sync::Arc;
use tracing::warn;

/// 依次调用每个 sink；单个失败不影响其余 sink，返回第一个错误。
#[derive(Clone, Default)]
pub struct FanoutRecorder {
    sinks: Vec<Arc<dyn RecordSink>>,
}

impl FanoutRecorder {
    pub fn new(sinks: Vec<Arc<dyn RecordSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn RecordSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

fn keep_first(first: &mut Option<StorageError>, result: Result<(), StorageError>) {
    if let Err(err) = result {
        warn!(target: "bus.storage", error = %err, "sink_failed");
        if first.is_none() {
            *first = Some(err);
        }
    }
}

#[async_trait::async_trait]
impl RecordSink for FanoutRecorder {
    async fn on_discovery_complete(
        &self,
        registry: &[SensorDescriptor],
    ) -> Result<(), StorageError> {
        let mut first = None;
        for sink in &self.sinks {
            keep_first(&mut first, sink.on_discovery_complete(registry).await);
        }
        first.map_or(Ok(()), Err)
    }

    async fn on_reading(&self, reading: &ReadingRecord) -> Result<(), StorageError> {
        let mut first = None;
        for sink in &self.sinks {
            keep_first(&mut first, sink.on_reading(reading).await);
        }
        first.map_or(Ok(()), Err)
    }
}
