pub mod aggregator;
pub mod ring;
pub mod rollup;

pub use aggregator::Aggregator;
pub use ring::SampleRing;
pub use rollup::Rollups;
