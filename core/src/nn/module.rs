use std::fmt::Debug;

/// Common interface for layers holding learned parameters.
///
/// Layers are `Send + Sync` so one instance can serve concurrent forward passes.
pub trait Module: Debug + Send + Sync {
    /// Total number of scalar parameters held by the layer.
    fn num_parameters(&self) -> usize;
}
