//! 日志记录实现

use crate::error::StorageError;
use crate::traits::RecordSink;
use domain::{ReadingRecord, SensorDescriptor};
use tracing::info;

/// 将注册表与读数写入结构化日志。
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRecorder;

#[async_trait::async_trait]
impl RecordSink for LogRecorder {
    async fn on_discovery_complete(
        &self,
        registry: &[SensorDescriptor],
    ) -> Result<(), StorageError> {
        for descriptor in registry {
            info!(
                target: "bus.storage",
                id = %descriptor.id,
                name = %descriptor.name,
                step = %descriptor.step,
                unit = %descriptor.unit,
                max = ?descriptor.max,
                min = ?descriptor.min,
                "sensor_descriptor"
            );
        }
        info!(target: "bus.storage", count = registry.len(), "registry_recorded");
        Ok(())
    }

    async fn on_reading(&self, reading: &ReadingRecord) -> Result<(), StorageError> {
        info!(
            target: "bus.storage",
            sender = %reading.sender,
            value = reading.value,
            "reading"
        );
        Ok(())
    }
}
