use bus_protocol::{
    FormatError, decode_discovery_record, decode_first_field, decode_reading_record, encode,
    encode_command,
};
use domain::{AUTOMATION_NODE_ID, Command, NodeId};

#[test]
fn command_lines_are_float_literals() {
    assert_eq!(encode_command(1.0), "1.0");
    assert_eq!(encode(Command::ReadingState), "2.0");
    assert_eq!(encode(Command::AutomationOn), "4.0");
    assert!(!encode_command(2.0).contains(';'));
}

#[test]
fn command_round_trip_through_first_field() {
    let line = encode_command(2.0);
    let id = decode_first_field(&line).expect("node id");
    assert_eq!(id, NodeId::new(2));
    assert_eq!(id.to_string(), "2");
}

#[test]
fn first_field_regardless_of_kind() {
    assert_eq!(
        decode_first_field("5;tempSensor;0.1;C;100;-10"),
        Ok(NodeId::new(5))
    );
    assert_eq!(decode_first_field("1;4.0"), Ok(AUTOMATION_NODE_ID));
    assert_eq!(decode_first_field("1"), Ok(AUTOMATION_NODE_ID));
    assert_eq!(decode_first_field(""), Err(FormatError::EmptyLine));
    assert!(matches!(
        decode_first_field("temp;1.0"),
        Err(FormatError::InvalidNodeId(_))
    ));
}

#[test]
fn discovery_record_keeps_field_order() {
    let descriptor = decode_discovery_record("5;tempSensor;0.1;C;100;-10").expect("descriptor");
    assert_eq!(descriptor.id, "5");
    assert_eq!(descriptor.name, "tempSensor");
    assert_eq!(descriptor.step, "0.1");
    assert_eq!(descriptor.unit, "C");
    assert_eq!(descriptor.max.as_deref(), Some("100"));
    assert_eq!(descriptor.min.as_deref(), Some("-10"));
}

#[test]
fn discovery_record_placeholders_and_crlf() {
    let descriptor = decode_discovery_record("9;pressure;1;kPa;;None\r").expect("descriptor");
    assert_eq!(descriptor.unit, "kPa");
    assert!(descriptor.max.is_none());
    assert!(descriptor.min.is_none());
}

#[test]
fn discovery_record_wrong_field_count() {
    assert_eq!(
        decode_discovery_record("5;tempSensor;0.1;C"),
        Err(FormatError::FieldCount {
            expected: 6,
            actual: 4
        })
    );
    assert_eq!(decode_discovery_record(""), Err(FormatError::EmptyLine));
}

#[test]
fn reading_record_decodes() {
    let record = decode_reading_record("5;23.7").expect("reading");
    assert_eq!(record.sender, "5");
    assert_eq!(record.value, 23.7);

    let record = decode_reading_record("12; -4.5\r").expect("reading");
    assert_eq!(record.value, -4.5);
}

#[test]
fn reading_record_rejects_bad_input() {
    assert!(matches!(
        decode_reading_record("5;warm"),
        Err(FormatError::InvalidValue(value)) if value == "warm"
    ));
    assert_eq!(
        decode_reading_record("5;1.0;2.0"),
        Err(FormatError::FieldCount {
            expected: 2,
            actual: 3
        })
    );
    assert_eq!(
        decode_reading_record("5"),
        Err(FormatError::FieldCount {
            expected: 2,
            actual: 1
        })
    );
}

#[test]
fn encoded_records_decode_back() {
    let descriptor = decode_discovery_record("9;pressure;1;kPa;;-5").expect("descriptor");
    let line = bus_protocol::encode_discovery_record(&descriptor);
    assert_eq!(line, "9;pressure;1;kPa;None;-5");
    assert_eq!(decode_discovery_record(&line), Ok(descriptor));

    let reading = decode_reading_record("5;23.7").expect("reading");
    assert_eq!(bus_protocol::encode_reading_record(&reading), "5;23.7");
}
