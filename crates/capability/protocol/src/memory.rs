//! 内存行通道实现
//!
//! 按时间表注入入站字节并记录出站行，用于测试和离线仿真。
//! 时间基于 `tokio::time::Instant`，可配合暂停时钟使用。

use crate::channel::LineChannel;
use crate::error::ProtocolError;
use crate::framing::read_available_line;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// 内存行通道（克隆后共享同一缓冲区）。
#[derive(Clone)]
pub struct MemoryLineChannel {
    inner: Arc<Mutex<MemoryInner>>,
}

struct MemoryInner {
    /// 时间表起点
    origin: Instant,
    /// 尚未到达的字节（按到达时间排序）
    scheduled: VecDeque<(Instant, Vec<u8>)>,
    /// 已到达、等待读取的字节
    buffer: VecDeque<u8>,
    written: Vec<String>,
    closed: bool,
}

impl MemoryInner {
    fn schedule(&mut self, at: Instant, bytes: Vec<u8>) {
        let index = self
            .scheduled
            .iter()
            .position(|(existing, _)| *existing > at)
            .unwrap_or(self.scheduled.len());
        self.scheduled.insert(index, (at, bytes));
    }

    fn deliver_due(&mut self, now: Instant) {
        while let Some((at, _)) = self.scheduled.front() {
            if *at > now {
                break;
            }
            if let Some((_, bytes)) = self.scheduled.pop_front() {
                self.buffer.extend(bytes);
            }
        }
    }
}

impl MemoryLineChannel {
    /// 创建通道，时间表起点为当前时刻。
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryInner {
                origin: Instant::now(),
                scheduled: VecDeque::new(),
                buffer: VecDeque::new(),
                written: Vec::new(),
                closed: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 立即可读的原始字节
    pub fn push_bytes(&self, bytes: &[u8]) {
        self.lock().buffer.extend(bytes.iter().copied());
    }

    /// 立即可读的一行（自动追加结束符）
    pub fn push_line(&self, line: &str) {
        self.push_line_at(Duration::ZERO, line);
    }

    /// 在起点之后 `offset` 到达的原始字节
    pub fn push_bytes_at(&self, offset: Duration, bytes: &[u8]) {
        let mut inner = self.lock();
        let at = inner.origin + offset;
        inner.schedule(at, bytes.to_vec());
    }

    /// 在起点之后 `offset` 到达的一行
    pub fn push_line_at(&self, offset: Duration, line: &str) {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        self.push_bytes_at(offset, &bytes);
    }

    /// 关闭输入：已排程的字节读完后返回 `ChannelClosed`
    pub fn close(&self) {
        self.lock().closed = true;
    }

    /// 已写出的行（不含结束符）
    pub fn written(&self) -> Vec<String> {
        self.lock().written.clone()
    }
}

impl Default for MemoryLineChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LineChannel for MemoryLineChannel {
    async fn try_read_line(&mut self) -> Result<Option<String>, ProtocolError> {
        let mut inner = self.lock();
        inner.deliver_due(Instant::now());
        if inner.buffer.is_empty() && inner.scheduled.is_empty() && inner.closed {
            return Err(ProtocolError::ChannelClosed);
        }
        read_available_line(|| Ok(inner.buffer.pop_front()))
    }

    async fn write_line(&mut self, text: &str) -> Result<(), ProtocolError> {
        self.lock().written.push(text.to_string());
        Ok(())
    }
}
