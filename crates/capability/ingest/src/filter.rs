use bus_protocol::codec::DELIMITER;
use bus_protocol::{FormatError, decode_first_field};
use domain::{Command, NodeId};

/// 入站行的分类结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// 空行：视为没有报文
    Empty,
    /// 自动化节点的控制报文（第二个字段可识别时带出命令）
    Automation(Option<Command>),
    /// 其它节点的报文
    Peer(NodeId, &'a str),
}

/// 按第一个字段对入站行分类。
pub fn classify(line: &str) -> Result<Inbound<'_>, FormatError> {
    if line.strip_suffix('\r').unwrap_or(line).is_empty() {
        return Ok(Inbound::Empty);
    }
    let sender = decode_first_field(line)?;
    if sender.is_automation() {
        return Ok(Inbound::Automation(automation_command(line)));
    }
    Ok(Inbound::Peer(sender, line))
}

fn automation_command(line: &str) -> Option<Command> {
    line.split(DELIMITER)
        .nth(1)
        .and_then(|field| field.trim().parse::<f64>().ok())
        .and_then(Command::from_code)
}
