//! 串口行通道实现
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let settings = SerialSettings::new("/dev/ttyO4", 9600);
//! let mut channel = SerialLineChannel::open_with_retry(&settings).await;
//! channel.write_line("1.0").await?;
//! ```

use crate::channel::LineChannel;
use crate::codec::TERMINATOR;
use crate::error::ProtocolError;
use crate::framing::read_available_line;
use async_trait::async_trait;
use bus_telemetry::record_open_retry;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::{info, warn};

/// 串口参数
#[derive(Debug, Clone)]
pub struct SerialSettings {
    /// 串口路径（如 "/dev/ttyO4"）
    pub path: String,
    /// 波特率
    pub baud_rate: u32,
    /// 打开失败后的固定重试间隔
    pub retry_interval: Duration,
}

impl SerialSettings {
    pub fn new(path: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            path: path.into(),
            baud_rate,
            retry_interval: Duration::from_secs(1),
        }
    }

    pub fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }
}

/// 串口行通道
pub struct SerialLineChannel {
    port: Box<dyn SerialPort>,
    path: String,
}

impl SerialLineChannel {
    /// 打开串口（8N1、无流控），失败直接返回错误。
    pub fn open(settings: &SerialSettings) -> Result<Self, ProtocolError> {
        let port = serialport::new(&settings.path, settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(Duration::from_millis(10))
            .open()?;

        info!(
            target: "bus.channel",
            path = %settings.path,
            baud_rate = settings.baud_rate,
            "serial_port_opened"
        );

        Ok(Self {
            port,
            path: settings.path.clone(),
        })
    }

    /// 打开串口，失败时按固定间隔无限重试，不向调用方返回错误。
    pub async fn open_with_retry(settings: &SerialSettings) -> Self {
        loop {
            match Self::open(settings) {
                Ok(channel) => return channel,
                Err(e) => {
                    record_open_retry();
                    warn!(
                        target: "bus.channel",
                        path = %settings.path,
                        error = %e,
                        "serial port not ready, retrying in {}ms",
                        settings.retry_interval.as_millis()
                    );
                }
            }
            tokio::time::sleep(settings.retry_interval).await;
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn next_byte(&mut self) -> Result<Option<u8>, ProtocolError> {
        if self.port.bytes_to_read()? == 0 {
            return Ok(None);
        }
        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl LineChannel for SerialLineChannel {
    async fn try_read_line(&mut self) -> Result<Option<String>, ProtocolError> {
        read_available_line(|| self.next_byte())
    }

    async fn write_line(&mut self, text: &str) -> Result<(), ProtocolError> {
        let mut frame = String::with_capacity(text.len() + 1);
        frame.push_str(text);
        frame.push(TERMINATOR);
        self.port.write_all(frame.as_bytes())?;
        self.port.flush()?;
        Ok(())
    }
}
