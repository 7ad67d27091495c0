pub mod bounded_log;
pub mod ring;

pub use bounded_log::BoundedLog;
pub use ring::RingBuffer;
