pub mod topic_avro;

pub use topic_avro::AvroTopic;
