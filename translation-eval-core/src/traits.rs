use crate::error::Result;

/// A deterministic text metric.
///
/// Implementations are pure: the same input always yields the same output,
/// and a calculator holds no mutable state, so one instance can be shared
/// freely across threads.
pub trait MetricCalculator: Send + Sync {
    type Input: ?Sized;
    type Output;

    fn calculate(&self, input: &Self::Input) -> Result<Self::Output>;
}

/// A named set of non-negative metric weights.
///
/// `METRICS` lists, in aggregation order, every metric the set can weight.
pub trait WeightSet {
    const METRICS: &'static [crate::domain::MetricId];

    fn weight(&self, metric: crate::domain::MetricId) -> f64;
}
