//! 行通道抽象

use crate::error::ProtocolError;
use async_trait::async_trait;

/// 按行收发的字节通道。
///
/// 同一时刻只有一个逻辑线程持有通道，行严格按字节到达顺序交付。
#[async_trait]
pub trait LineChannel: Send {
    /// 非阻塞读取一行。
    ///
    /// 当前无可读字节时立即返回 `Ok(None)`；返回的行不含结束符，
    /// 字节读空时可能是半行，由调用方容忍。
    async fn try_read_line(&mut self) -> Result<Option<String>, ProtocolError>;

    /// 追加结束符后写出（无应答、不重试）。
    async fn write_line(&mut self, text: &str) -> Result<(), ProtocolError>;
}

#[async_trait]
impl<C: LineChannel + ?Sized> LineChannel for Box<C> {
    async fn try_read_line(&mut self) -> Result<Option<String>, ProtocolError> {
        (**self).try_read_line().await
    }

    async fn write_line(&mut self, text: &str) -> Result<(), ProtocolError> {
        (**self).write_line(text).await
    }
}
