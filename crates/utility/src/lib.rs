pub mod id;
pub mod progress;
pub mod serde;
