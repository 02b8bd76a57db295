use bus_engine::{EngineConfig, EnginePhase, ProtocolEngine};
use bus_ingest::DiscoveryConfig;
use bus_protocol::MemoryLineChannel;
use bus_storage::InMemoryRecorder;
use domain::SensorDescriptor;
use std::sync::Arc;
use std::time::Duration;

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn config(settle_delay: Duration) -> EngineConfig {
    EngineConfig {
        settle_delay,
        discovery: DiscoveryConfig {
            idle_timeout: ms(300),
            poll_interval: ms(1),
            automation_extends_window: false,
        },
        retry_interval: ms(1000),
    }
}

#[tokio::test(start_paused = true)]
async fn discovers_then_dispatches_readings() {
    let recorder = Arc::new(InMemoryRecorder::new());
    let channel = MemoryLineChannel::new();
    channel.push_line_at(ms(5000), "5;tempSensor;0.1;C;100;-10");
    // 0.3s 窗口结束后再停顿 0.4s
    channel.push_line_at(ms(5700), "5;23.7");
    channel.close();

    let bus = channel.clone();
    let state = ProtocolEngine::new(config(ms(5000)), recorder.clone())
        .run(|| async move { bus })
        .await;

    assert_eq!(state.phase, EnginePhase::Reading);
    assert!(state.ready);
    assert_eq!(channel.written(), vec!["1.0".to_string(), "2.0".to_string()]);

    let expected = SensorDescriptor {
        id: "5".to_string(),
        name: "tempSensor".to_string(),
        step: "0.1".to_string(),
        unit: "C".to_string(),
        max: Some("100".to_string()),
        min: Some("-10".to_string()),
    };
    assert_eq!(recorder.discoveries(), vec![vec![expected.clone()]]);
    assert_eq!(state.registry.as_slice(), &[expected]);

    let readings = recorder.readings();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].sender, "5");
    assert_eq!(readings[0].value, 23.7);
}

#[tokio::test(start_paused = true)]
async fn silent_bus_goes_idle_without_reading_announcement() {
    let recorder = Arc::new(InMemoryRecorder::new());
    let channel = MemoryLineChannel::new();

    let bus = channel.clone();
    let state = ProtocolEngine::new(config(Duration::ZERO), recorder.clone())
        .run(|| async move { bus })
        .await;

    assert_eq!(state.phase, EnginePhase::Idle);
    assert!(!state.ready);
    assert!(state.registry.is_empty());
    assert_eq!(channel.written(), vec!["1.0".to_string()]);
    assert!(recorder.discoveries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn automation_only_traffic_goes_idle() {
    let recorder = Arc::new(InMemoryRecorder::new());
    let channel = MemoryLineChannel::new();
    channel.push_line("1");
    channel.push_line_at(ms(100), "1;automation;0;-;None;None");

    let bus = channel.clone();
    let state = ProtocolEngine::new(config(Duration::ZERO), recorder.clone())
        .run(|| async move { bus })
        .await;

    assert_eq!(state.phase, EnginePhase::Idle);
    assert_eq!(channel.written(), vec!["1.0".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn malformed_reading_does_not_stop_the_node() {
    let recorder = Arc::new(InMemoryRecorder::new());
    let channel = MemoryLineChannel::new();
    channel.push_line("5;tempSensor;0.1;C;100;-10");
    channel.push_line_at(ms(500), "5;not-a-number");
    channel.push_line_at(ms(600), "1;3.0");
    channel.push_line_at(ms(700), "5;24.5");
    channel.close();

    let bus = channel.clone();
    let state = ProtocolEngine::new(config(Duration::ZERO), recorder.clone())
        .run(|| async move { bus })
        .await;

    assert_eq!(state.phase, EnginePhase::Reading);
    let readings = recorder.readings();
    assert_eq!(readings.len(), 1);
    assert_eq!(readings[0].value, 24.5);
}

#[test]
fn session_id_can_be_shared() {
    let engine = ProtocolEngine::new(EngineConfig::default(), Arc::new(InMemoryRecorder::new()))
        .with_session_id("session-7");
    assert_eq!(engine.session_id(), "session-7");
}

#[test]
fn only_reading_and_idle_are_terminal() {
    assert!(!EnginePhase::Init.is_terminal());
    assert!(!EnginePhase::Discovering.is_terminal());
    assert!(EnginePhase::Reading.is_terminal());
    assert!(EnginePhase::Idle.is_terminal());
}
