pub mod ids;
pub mod sample;
pub mod timestamp;
