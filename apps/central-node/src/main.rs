//! 中心节点进程：等待各节点初始化 → 打开总线串口 → 发现 → 读数。

use bus_config::NodeConfig;
use bus_engine::{EngineConfig, EnginePhase, ProtocolEngine};
use bus_protocol::{SerialLineChannel, SerialSettings};
use bus_storage::{FanoutRecorder, FileRecorder, LogRecorder, RelayRecorder};
use bus_telemetry::{init_tracing, metrics, new_session_id};
use std::sync::Arc;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于现场调整串口与超时
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = NodeConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let session_id = new_session_id();
    let sinks = build_sinks(&config, &session_id).await?;
    info!(
        target: "bus.engine",
        session_id = %session_id,
        sinks = sinks.fanout.len(),
        "central_node_starting"
    );

    let engine = ProtocolEngine::new(EngineConfig::from(&config), Arc::new(sinks.fanout))
        .with_session_id(session_id);
    let bus = serial_settings(&config, config.port_path.clone());
    let relay = sinks.relay.zip(
        config
            .relay_port_path
            .clone()
            .map(|path| serial_settings(&config, path)),
    );
    let state = engine.run(|| open_channels(bus, relay)).await;

    let snapshot = metrics().snapshot();
    info!(
        target: "bus.engine",
        phase = %state.phase,
        descriptors = state.registry.len(),
        lines_received = snapshot.lines_received,
        readings_dispatched = snapshot.readings_dispatched,
        malformed_lines = snapshot.malformed_lines,
        "protocol_engine_stopped"
    );

    if state.phase == EnginePhase::Idle {
        // 未发现任何传感器：本次运行不再发起协议动作
        info!(target: "bus.engine", "no sensors announced, idling until ctrl-c");
        tokio::signal::ctrl_c().await?;
    }
    Ok(())
}

/// 记录协作方：fan-out 及尚未连接通道的中继。
struct Sinks {
    fanout: FanoutRecorder,
    relay: Option<Arc<RelayRecorder<SerialLineChannel>>>,
}

/// 按配置组装记录协作方：日志总是开启，文件与中继按需开启。
///
/// 中继只登记不打开，串口在等待期结束后由 [`open_channels`] 连接。
async fn build_sinks(
    config: &NodeConfig,
    session_id: &str,
) -> Result<Sinks, Box<dyn std::error::Error>> {
    let mut fanout = FanoutRecorder::default();
    fanout.push(Arc::new(LogRecorder));

    if let Some(dir) = &config.record_dir {
        let recorder = FileRecorder::create(dir, session_id).await?;
        info!(target: "bus.storage", dir = %recorder.dir().display(), "file_recorder_enabled");
        fanout.push(Arc::new(recorder));
    }

    let relay = config.relay_port_path.as_ref().map(|path| {
        info!(target: "bus.storage", path = %path, "relay_recorder_enabled");
        Arc::new(RelayRecorder::<SerialLineChannel>::detached())
    });
    if let Some(relay) = &relay {
        fanout.push(relay.clone());
    }

    Ok(Sinks { fanout, relay })
}

fn serial_settings(config: &NodeConfig, path: String) -> SerialSettings {
    SerialSettings::new(path, config.baud_rate).with_retry_interval(config.open_retry())
}

/// 依次打开总线串口与中继串口，均无限重试。
async fn open_channels(
    bus: SerialSettings,
    relay: Option<(Arc<RelayRecorder<SerialLineChannel>>, SerialSettings)>,
) -> SerialLineChannel {
    let channel = SerialLineChannel::open_with_retry(&bus).await;
    if let Some((recorder, settings)) = relay {
        let relay_channel = SerialLineChannel::open_with_retry(&settings).await;
        info!(target: "bus.storage", path = %relay_channel.path(), "relay_channel_attached");
        recorder.attach(relay_channel).await;
    }
    channel
}

#[cfg(test)]
mod tests {
    use super::build_sinks;
    use bus_config::NodeConfig;
    use std::time::Duration;

    #[tokio::test]
    async fn sinks_default_to_log_only() {
        let sinks = build_sinks(&NodeConfig::default(), "session-1")
            .await
            .expect("sinks");
        assert_eq!(sinks.fanout.len(), 1);
        assert!(sinks.relay.is_none());
    }

    #[tokio::test]
    async fn sinks_add_file_recorder() {
        let dir = std::env::temp_dir().join(format!("central-node-{}", std::process::id()));
        let config = NodeConfig {
            record_dir: Some(dir.clone()),
            ..NodeConfig::default()
        };
        let sinks = build_sinks(&config, "session-1").await.expect("sinks");
        assert_eq!(sinks.fanout.len(), 2);
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn relay_port_is_not_opened_while_building_sinks() {
        let config = NodeConfig {
            relay_port_path: Some("/dev/does-not-exist-relay0".to_string()),
            ..NodeConfig::default()
        };
        let sinks = tokio::time::timeout(
            Duration::from_secs(1),
            build_sinks(&config, "session-1"),
        )
        .await
        .expect("no port access before settle delay")
        .expect("sinks");

        assert_eq!(sinks.fanout.len(), 2);
        let relay = sinks.relay.expect("relay registered");
        assert!(!relay.is_attached().await);
    }
}
