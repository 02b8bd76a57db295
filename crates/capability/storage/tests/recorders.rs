use bus_protocol::MemoryLineChannel;
use bus_storage::{
    FanoutRecorder, FileRecorder, InMemoryRecorder, LogRecorder, RecordSink, RelayRecorder,
    StorageError,
};
use domain::{ReadingRecord, SensorDescriptor};
use std::sync::Arc;

fn sample_descriptor() -> SensorDescriptor {
    SensorDescriptor {
        id: "5".to_string(),
        name: "tempSensor".to_string(),
        step: "0.1".to_string(),
        unit: "C".to_string(),
        max: Some("100".to_string()),
        min: None,
    }
}

fn sample_reading() -> ReadingRecord {
    ReadingRecord {
        sender: "5".to_string(),
        value: 23.7,
    }
}

struct FailingSink;

#[async_trait::async_trait]
impl RecordSink for FailingSink {
    async fn on_discovery_complete(
        &self,
        _registry: &[SensorDescriptor],
    ) -> Result<(), StorageError> {
        Err(StorageError::new("sd card missing"))
    }

    async fn on_reading(&self, _reading: &ReadingRecord) -> Result<(), StorageError> {
        Err(StorageError::new("sd card missing"))
    }
}

#[tokio::test]
async fn in_memory_records_everything() {
    let recorder = InMemoryRecorder::new();
    recorder
        .on_discovery_complete(&[sample_descriptor()])
        .await
        .expect("discovery");
    recorder.on_reading(&sample_reading()).await.expect("reading");

    assert_eq!(recorder.discoveries(), vec![vec![sample_descriptor()]]);
    assert_eq!(recorder.readings(), vec![sample_reading()]);
}

#[tokio::test]
async fn fanout_continues_after_failure() {
    let memory = Arc::new(InMemoryRecorder::new());
    let fanout = FanoutRecorder::new(vec![
        Arc::new(FailingSink),
        Arc::new(LogRecorder),
        memory.clone(),
    ]);
    assert_eq!(fanout.len(), 3);

    let err = fanout
        .on_reading(&sample_reading())
        .await
        .expect_err("first failure reported");
    assert_eq!(err.to_string(), "sd card missing");
    assert_eq!(memory.readings().len(), 1);
}

#[tokio::test]
async fn relay_writes_bus_lines() {
    let channel = MemoryLineChannel::new();
    let relay = RelayRecorder::new(channel.clone());

    relay
        .on_discovery_complete(&[sample_descriptor()])
        .await
        .expect("discovery");
    relay.on_reading(&sample_reading()).await.expect("reading");

    assert_eq!(
        channel.written(),
        vec![
            "5;tempSensor;0.1;C;100;None".to_string(),
            "5;23.7".to_string()
        ]
    );
}

#[tokio::test]
async fn detached_relay_rejects_until_attached() {
    let relay = RelayRecorder::<MemoryLineChannel>::detached();
    assert!(!relay.is_attached().await);
    let err = relay
        .on_reading(&sample_reading())
        .await
        .expect_err("not attached");
    assert_eq!(err.to_string(), "relay channel not attached");

    let channel = MemoryLineChannel::new();
    relay.attach(channel.clone()).await;
    assert!(relay.is_attached().await);
    relay.on_reading(&sample_reading()).await.expect("reading");
    assert_eq!(channel.written(), vec!["5;23.7".to_string()]);
}

#[tokio::test]
async fn file_recorder_appends_json_lines() {
    let dir = std::env::temp_dir().join(format!("bus-storage-{}", std::process::id()));
    let recorder = FileRecorder::create(&dir, "session-1")
        .await
        .expect("create");

    recorder
        .on_discovery_complete(&[sample_descriptor(), sample_descriptor()])
        .await
        .expect("discovery");
    recorder.on_reading(&sample_reading()).await.expect("reading");
    recorder.on_reading(&sample_reading()).await.expect("reading");

    let descriptors = std::fs::read_to_string(recorder.descriptors_path()).expect("read");
    let readings = std::fs::read_to_string(recorder.readings_path()).expect("read");
    assert_eq!(descriptors.lines().count(), 2);
    assert_eq!(readings.lines().count(), 2);

    let first: serde_json::Value =
        serde_json::from_str(readings.lines().next().expect("line")).expect("json");
    assert_eq!(first["session_id"], "session-1");
    assert_eq!(first["sender"], "5");
    assert_eq!(first["value"], 23.7);
    assert!(first["received_at_ms"].as_i64().expect("ts") > 0);

    let _ = std::fs::remove_dir_all(&dir);
}
