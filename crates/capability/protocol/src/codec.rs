//! 报文编解码
//!
//! ```text
//! 出站命令：  1.0
//! 发现报文：  <id>;<name>;<step>;<unit>;<max>;<min>
//! 读数报文：  <id>;<value>
//! ```

use crate::error::FormatError;
use domain::{Command, NodeId, ReadingRecord, SensorDescriptor};

/// 字段分隔符
pub const DELIMITER: char = ';';
/// 行结束符
pub const TERMINATOR: char = '\n';
/// 发现报文字段数
pub const DISCOVERY_FIELD_COUNT: usize = 6;
/// 读数报文字段数
pub const READING_FIELD_COUNT: usize = 2;

/// 将命令码编码为单独一行（不含分隔符、不含结束符）。
pub fn encode_command(code: f64) -> String {
    // Debug 格式保留小数点：1.0 -> "1.0"
    format!("{code:?}")
}

/// 编码总线命令。
pub fn encode(command: Command) -> String {
    encode_command(command.code())
}

/// 编码发现报文（缺省的 max/min 写为 `None`）。
pub fn encode_discovery_record(descriptor: &SensorDescriptor) -> String {
    let delimiter = DELIMITER.to_string();
    [
        descriptor.id.as_str(),
        descriptor.name.as_str(),
        descriptor.step.as_str(),
        descriptor.unit.as_str(),
        descriptor.max.as_deref().unwrap_or("None"),
        descriptor.min.as_deref().unwrap_or("None"),
    ]
    .join(delimiter.as_str())
}

/// 编码读数报文。
pub fn encode_reading_record(reading: &ReadingRecord) -> String {
    format!("{}{}{:?}", reading.sender, DELIMITER, reading.value)
}

/// 解析第一个字段为发送方 ID。
pub fn decode_first_field(line: &str) -> Result<NodeId, FormatError> {
    let line = strip_carriage_return(line);
    if line.is_empty() {
        return Err(FormatError::EmptyLine);
    }
    let first = line.split(DELIMITER).next().unwrap_or_default();
    parse_node_id(first)
}

/// 解析发现报文。
pub fn decode_discovery_record(line: &str) -> Result<SensorDescriptor, FormatError> {
    let fields = split_fields(line, DISCOVERY_FIELD_COUNT)?;
    Ok(SensorDescriptor {
        id: fields[0].to_string(),
        name: fields[1].to_string(),
        step: fields[2].to_string(),
        unit: fields[3].to_string(),
        max: optional_field(fields[4]),
        min: optional_field(fields[5]),
    })
}

/// 解析读数报文。
pub fn decode_reading_record(line: &str) -> Result<ReadingRecord, FormatError> {
    let fields = split_fields(line, READING_FIELD_COUNT)?;
    let value = fields[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| FormatError::InvalidValue(fields[1].to_string()))?;
    Ok(ReadingRecord {
        sender: fields[0].to_string(),
        value,
    })
}

fn split_fields(line: &str, expected: usize) -> Result<Vec<&str>, FormatError> {
    let line = strip_carriage_return(line);
    if line.is_empty() {
        return Err(FormatError::EmptyLine);
    }
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != expected {
        return Err(FormatError::FieldCount {
            expected,
            actual: fields.len(),
        });
    }
    Ok(fields)
}

fn strip_carriage_return(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn parse_node_id(field: &str) -> Result<NodeId, FormatError> {
    let trimmed = field.trim();
    if let Ok(raw) = trimmed.parse::<u32>() {
        return Ok(NodeId::new(raw));
    }
    // 整数值的浮点字面量（如命令行 "2.0"）
    match trimmed.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value.fract() == 0.0
                && value >= 0.0
                && value <= f64::from(u32::MAX) =>
        {
            Ok(NodeId::new(value as u32))
        }
        _ => Err(FormatError::InvalidNodeId(field.to_string())),
    }
}

/// max/min 占位：空字段或 `None` 表示缺省。
fn optional_field(field: &str) -> Option<String> {
    match field.trim() {
        "" | "None" => None,
        _ => Some(field.to_string()),
    }
}
