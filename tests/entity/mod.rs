pub mod chaining;
pub mod enrichment;
pub mod sink;
