//! 内存记录实现
//!
//! 仅用于本地测试和仿真。

use crate::error::StorageError;
use crate::traits::RecordSink;
use domain::{ReadingRecord, SensorDescriptor};
use std::sync::RwLock;

/// 内存记录器
pub struct InMemoryRecorder {
    /// 每次 on_discovery_complete 的注册表快照
    discoveries: RwLock<Vec<Vec<SensorDescriptor>>>,
    readings: RwLock<Vec<ReadingRecord>>,
}

impl InMemoryRecorder {
    pub fn new() -> Self {
        Self {
            discoveries: RwLock::new(Vec::new()),
            readings: RwLock::new(Vec::new()),
        }
    }

    /// 已收到的注册表快照（用于测试）
    pub fn discoveries(&self) -> Vec<Vec<SensorDescriptor>> {
        self.discoveries
            .read()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// 已收到的读数（用于测试）
    pub fn readings(&self) -> Vec<ReadingRecord> {
        self.readings.read().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Default for InMemoryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RecordSink for InMemoryRecorder {
    async fn on_discovery_complete(
        &self,
        registry: &[SensorDescriptor],
    ) -> Result<(), StorageError> {
        let mut discoveries = self
            .discoveries
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        discoveries.push(registry.to_vec());
        Ok(())
    }

    async fn on_reading(&self, reading: &ReadingRecord) -> Result<(), StorageError> {
        let mut readings = self
            .readings
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        readings.push(reading.clone());
        Ok(())
    }
}
