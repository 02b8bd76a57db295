use domain::{AUTOMATION_NODE_ID, Command, NodeId, Registry, SensorDescriptor};

fn descriptor(id: &str, name: &str) -> SensorDescriptor {
    SensorDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        step: "0.1".to_string(),
        unit: "C".to_string(),
        max: Some("100".to_string()),
        min: None,
    }
}

#[test]
fn registry_keeps_insertion_order_and_duplicates() {
    let mut registry = Registry::new();
    registry.push(descriptor("5", "tempSensor"));
    registry.push(descriptor("7", "humidity"));
    registry.push(descriptor("5", "tempSensor"));

    assert_eq!(registry.len(), 3);
    let names: Vec<&str> = registry.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["tempSensor", "humidity", "tempSensor"]);
    assert_eq!(registry.as_slice()[0], registry.as_slice()[2]);
}

#[test]
fn registry_serializes_as_list() {
    let mut registry = Registry::new();
    registry.push(descriptor("5", "tempSensor"));
    let json = serde_json::to_value(&registry).expect("json");
    assert!(json.is_array());
    assert_eq!(json[0]["unit"], "C");
    assert!(json[0]["min"].is_null());
}

#[test]
fn reserved_ids_and_commands() {
    assert!(!NodeId::new(0).is_automation());
    assert!(AUTOMATION_NODE_ID.is_automation());
    assert!(!NodeId::new(5).is_automation());
    assert_eq!(NodeId::new(5).to_string(), "5");

    assert_eq!(Command::Connection.code(), 1.0);
    assert_eq!(Command::ReadingState.code(), 2.0);
    assert_eq!(Command::from_code(3.0), Some(Command::AutomationOff));
    assert_eq!(Command::from_code(4.0), Some(Command::AutomationOn));
    assert_eq!(Command::from_code(9.0), None);
}
