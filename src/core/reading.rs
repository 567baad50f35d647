use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::quantity::energy::KilowattHours;

/// Smart meter identifier.
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
pub struct MeterId(pub String);

impl From<&str> for MeterId {
    fn from(meter_id: &str) -> Self {
        Self(meter_id.to_owned())
    }
}

/// Consumption recorded by a meter at an instant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize, derive_more::Constructor)]
#[must_use]
pub struct Reading {
    pub time: DateTime<Local>,
    pub consumption: KilowattHours,
}
