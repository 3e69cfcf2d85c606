pub mod ingestor;

pub use ingestor::Ingestor;
