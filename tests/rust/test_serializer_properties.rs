//! Property tests for header, key memoization and key segment contents

use apache_avro::types::Value;
use proptest::prelude::*;
use tapeavro::{
    AvroDatumWriter, AvroEngine, Record, SerializerConfig, TapeAvroSerializer, HEADER_LEN,
};

use super::common::*;

fn key_bytes(key: &str) -> Vec<u8> {
    AvroDatumWriter::<String>::new(apache_avro::Schema::String)
        .unwrap()
        .encode(&key.to_string())
        .unwrap()
}

proptest! {
    #[test]
    fn prop_header_always_zero(key in ".{0,40}", hr in any::<i32>()) {
        let mut serializer = heart_rate_serializer();
        let blob = serialize_blob(&mut serializer, &Record::new(key, HeartRate { hr }));

        prop_assert!(blob.len() > HEADER_LEN);
        prop_assert!(blob[..HEADER_LEN].iter().all(|b| *b == 0));
    }

    #[test]
    fn prop_key_segment_matches_direct_encoding(
        records in prop::collection::vec(("[a-c]{1,3}", any::<i32>()), 1..40)
    ) {
        let topic = heart_rate_topic();
        let mut serializer = heart_rate_serializer();
        let mut previous: Option<String> = None;
        let mut expected_encodings = 0u64;

        for (key, hr) in records {
            if previous.as_ref() != Some(&key) {
                expected_encodings += 1;
            }
            let blob = serialize_blob(&mut serializer, &Record::new(key.clone(), HeartRate { hr }));

            let expected = key_bytes(&key);
            prop_assert_eq!(&blob[HEADER_LEN..HEADER_LEN + expected.len()], &expected[..]);

            let (decoded_key, _) = decode_blob(&blob, topic.key_schema(), topic.value_schema());
            prop_assert_eq!(decoded_key, Value::String(key.clone()));
            previous = Some(key);
        }

        prop_assert_eq!(serializer.stats().key_encodings, expected_encodings);
    }

    #[test]
    fn prop_memoization_does_not_change_output(
        records in prop::collection::vec(("[a-b]{1,2}", 0i32..300), 1..30)
    ) {
        let topic = heart_rate_topic();
        let mut memoized = heart_rate_serializer();
        let config = SerializerConfig { memoize_keys: false, ..SerializerConfig::default() };
        let mut plain = TapeAvroSerializer::with_config(&topic, &AvroEngine, config).unwrap();

        for (key, hr) in records {
            let record = Record::new(key, HeartRate { hr });
            prop_assert_eq!(
                serialize_blob(&mut memoized, &record),
                serialize_blob(&mut plain, &record)
            );
        }
    }
}
