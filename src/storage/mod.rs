pub mod tape;

pub use tape::{ObjectSerializer, TapeAvroSerializer};
