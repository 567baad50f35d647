use serde::{Deserialize, Serialize};

use crate::quantity::rate::KilowattHourRate;

/// Unique price plan identifier.
#[derive(
    Clone,
    Debug,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::From,
    derive_more::FromStr,
)]
#[serde(transparent)]
pub struct PlanName(pub String);

impl From<&str> for PlanName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize, bon::Builder)]
#[serde(rename_all(serialize = "camelCase"))]
#[must_use]
pub struct PricePlan {
    #[builder(into)]
    pub name: PlanName,

    /// Energy supplier offering the plan, used only for grouping.
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,

    #[builder(into)]
    pub unit_rate: KilowattHourRate,
}
