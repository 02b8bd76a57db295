//! 文件记录实现
//!
//! 记录目录下按行追加 JSON：
//! - `descriptors.jsonl`：每个传感器描述一行
//! - `readings.jsonl`：每条读数一行
//!
//! 每次写入都重新以追加模式打开文件，介质被拔出后重新插入可继续写入。

use crate::error::StorageError;
use crate::traits::RecordSink;
use domain::{ReadingRecord, SensorDescriptor};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

const DESCRIPTORS_FILE: &str = "descriptors.jsonl";
const READINGS_FILE: &str = "readings.jsonl";

#[derive(Serialize)]
struct Entry<'a, T: Serialize> {
    session_id: &'a str,
    received_at_ms: i64,
    #[serde(flatten)]
    record: &'a T,
}

/// JSON lines 文件记录器
#[derive(Debug, Clone)]
pub struct FileRecorder {
    dir: PathBuf,
    session_id: String,
}

impl FileRecorder {
    /// 创建记录器（记录目录不存在时创建）
    pub async fn create(
        dir: impl Into<PathBuf>,
        session_id: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            session_id: session_id.into(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn descriptors_path(&self) -> PathBuf {
        self.dir.join(DESCRIPTORS_FILE)
    }

    pub fn readings_path(&self) -> PathBuf {
        self.dir.join(READINGS_FILE)
    }

    fn line_for<T: Serialize>(&self, record: &T) -> Result<String, StorageError> {
        let entry = Entry {
            session_id: &self.session_id,
            received_at_ms: now_epoch_ms(),
            record,
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');
        Ok(line)
    }

    async fn append(&self, path: PathBuf, content: &str) -> Result<(), StorageError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordSink for FileRecorder {
    async fn on_discovery_complete(
        &self,
        registry: &[SensorDescriptor],
    ) -> Result<(), StorageError> {
        let mut content = String::new();
        for descriptor in registry {
            content.push_str(&self.line_for(descriptor)?);
        }
        self.append(self.descriptors_path(), &content).await
    }

    async fn on_reading(&self, reading: &ReadingRecord) -> Result<(), StorageError> {
        let line = self.line_for(reading)?;
        self.append(self.readings_path(), &line).await
    }
}

/// 获取当前时间戳（毫秒）
fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
