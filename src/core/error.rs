use crate::core::{MeterId, PlanName};

/// The requested data does not exist or cannot produce an estimate.
///
/// Callers are expected to render it as «no content» rather than as a failure.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum NotFound {
    #[error("no readings are recorded for meter `{0}`")]
    Readings(MeterId),

    /// All the readings are taken at the same instant, so there is no consumption rate.
    #[error("readings of meter `{0}` do not span any time")]
    ElapsedTime(MeterId),

    /// The readings are so large that the estimate does not fit into a float.
    #[error("costs for meter `{0}` overflow")]
    Overflow(MeterId),

    #[error("the price plan catalog is empty")]
    Plans,

    #[error("price plan `{0}` does not exist")]
    Plan(PlanName),

    #[error("supplier `{0}` offers no price plans")]
    Supplier(String),
}
