//! Round-trip tests: tape blobs decode with a plain Avro datum reader

use apache_avro::{from_value, types::Value, Schema};
use tapeavro::{AvroEngine, AvroTopic, Record, TapeAvroSerializer, EMPTY_HEADER, HEADER_LEN};

use super::common::*;

#[test]
fn test_device_heart_rate_round_trip() {
    init_test_env();
    let topic = heart_rate_topic();
    let mut serializer = heart_rate_serializer();

    let record = Record::new("device-1".to_string(), HeartRate { hr: 72 });
    let blob = serialize_blob(&mut serializer, &record);

    let (key, value) = decode_blob(&blob, topic.key_schema(), topic.value_schema());
    assert_eq!(key, Value::String("device-1".to_string()));
    assert_eq!(from_value::<HeartRate>(&value).unwrap(), record.value);
}

#[test]
fn test_structured_key_round_trip() {
    init_test_env();
    let topic: AvroTopic<ObservationKey, Acceleration> =
        AvroTopic::parse("android_phone_acceleration", OBSERVATION_KEY_SCHEMA, ACCELERATION_SCHEMA)
            .unwrap();
    let mut serializer = TapeAvroSerializer::new(&topic, &AvroEngine).unwrap();

    let key = ObservationKey {
        project_id: Some("radar-test".to_string()),
        user_id: "user-7".to_string(),
        source_id: "phone-3".to_string(),
    };
    let samples = [
        Acceleration { time: 1.5e9, x: 0.1, y: -9.8, z: 0.25, source: None },
        Acceleration {
            time: 1.5e9 + 0.02,
            x: 0.2,
            y: -9.7,
            z: 0.5,
            source: Some("imu".to_string()),
        },
    ];

    for sample in &samples {
        let record = Record::new(key.clone(), sample.clone());
        let blob = serialize_blob(&mut serializer, &record);

        let (decoded_key, decoded_value) =
            decode_blob(&blob, topic.key_schema(), topic.value_schema());
        assert_eq!(from_value::<ObservationKey>(&decoded_key).unwrap(), key);
        assert_eq!(from_value::<Acceleration>(&decoded_value).unwrap(), *sample);
    }

    assert_eq!(serializer.stats().key_cache_hits, 1);
}

#[test]
fn test_one_header_per_record() {
    init_test_env();
    let topic = heart_rate_topic();
    let mut serializer = heart_rate_serializer();

    // a shared sink: records follow each other with no separators
    let mut tape = Vec::new();
    let records: Vec<_> = (0..25)
        .map(|i| Record::new(format!("device-{}", i / 10), HeartRate { hr: 50 + i }))
        .collect();
    for record in &records {
        serializer.serialize(record, &mut tape).unwrap();
    }

    let mut reader = &tape[..];
    for record in &records {
        assert_eq!(&reader[..HEADER_LEN], &EMPTY_HEADER);
        reader = &reader[HEADER_LEN..];
        let key = apache_avro::from_avro_datum(topic.key_schema(), &mut reader, None).unwrap();
        let value = apache_avro::from_avro_datum(topic.value_schema(), &mut reader, None).unwrap();
        assert_eq!(key, Value::String(record.key.clone()));
        assert_eq!(from_value::<HeartRate>(&value).unwrap(), record.value);
    }
    assert!(reader.is_empty());

    let stats = serializer.stats();
    assert_eq!(stats.records, 25);
    assert_eq!(stats.key_encodings, 3);
    assert_eq!(stats.key_cache_hits, 22);
    assert_eq!(stats.bytes_written, tape.len() as u64);
}

#[test]
fn test_json_values_match_typed_values() {
    init_test_env();
    let json_topic: AvroTopic<serde_json::Value, serde_json::Value> =
        AvroTopic::parse("android_heart_rate", r#""string""#, HEART_RATE_SCHEMA).unwrap();
    let mut json_serializer = TapeAvroSerializer::new(&json_topic, &AvroEngine).unwrap();
    let mut typed_serializer = heart_rate_serializer();

    let json_blob = serialize_blob(
        &mut json_serializer,
        &Record::new(serde_json::json!("device-1"), serde_json::json!({"hr": 72})),
    );
    let typed_blob = serialize_blob(
        &mut typed_serializer,
        &Record::new("device-1".to_string(), HeartRate { hr: 72 }),
    );

    assert_eq!(json_blob, typed_blob);
}

#[test]
fn test_large_value_exceeding_encoder_buffer() {
    init_test_env();
    let schema = r#"{"type": "array", "items": "long"}"#;
    let topic: AvroTopic<String, Vec<i64>> =
        AvroTopic::parse("bulk", r#""string""#, schema).unwrap();
    let mut serializer = TapeAvroSerializer::new(&topic, &AvroEngine).unwrap();

    let value: Vec<i64> = (0..5_000).map(|i| i * 1_000_003).collect();
    let record = Record::new("bulk-key".to_string(), value.clone());
    let blob = serialize_blob(&mut serializer, &record);
    assert!(blob.len() > 2048);

    let value_schema = Schema::parse_str(schema).unwrap();
    let (_, decoded) = decode_blob(&blob, &Schema::String, &value_schema);
    assert_eq!(from_value::<Vec<i64>>(&decoded).unwrap(), value);
}
