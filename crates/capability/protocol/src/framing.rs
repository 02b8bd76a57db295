//! 行组帧：逐字节读取，直到行结束符或缓冲区读空。

use crate::codec::TERMINATOR;
use crate::error::ProtocolError;
use bus_telemetry::record_garbage_bytes;
use tracing::debug;

/// 从字节源中取出下一行。
///
/// 首次取字节即为空时返回 `None`；否则一直读到 `\n` 或字节源读空为止，
/// 读空时返回已累积的半行。非 ASCII 字节单独无法解码为文本，逐个丢弃。
///
/// 半行不会与后续字节拼接：低波特率下轮询可能在一行传输中途取到数据，
/// `5;23.7` 会被拆成 `5;23` 与 `.7` 两行。前者仍能解码为读数 23.0，
/// 因此半行以 debug 级别记录，便于现场排查。
pub(crate) fn read_available_line<F>(mut next_byte: F) -> Result<Option<String>, ProtocolError>
where
    F: FnMut() -> Result<Option<u8>, ProtocolError>,
{
    let Some(mut byte) = next_byte()? else {
        return Ok(None);
    };

    let mut line = String::new();
    let mut garbage = 0u64;
    let mut terminated = false;
    loop {
        if byte.is_ascii() {
            if char::from(byte) == TERMINATOR {
                terminated = true;
                break;
            }
            line.push(char::from(byte));
        } else {
            garbage += 1;
        }

        match next_byte()? {
            Some(next) => byte = next,
            None => break,
        }
    }

    if garbage > 0 {
        debug!(target: "bus.channel", garbage, "undecodable bytes dropped");
        record_garbage_bytes(garbage);
    }
    if !terminated {
        debug!(target: "bus.channel", line = %line, "partial_line_returned");
    }
    Ok(Some(line))
}
