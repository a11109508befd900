pub mod aggregator;
pub mod normalize;

pub use aggregator::AlertAggregator;
