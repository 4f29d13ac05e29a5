//! Errors raised at the simulation boundary
//!
//! Stepping the simulation never fails. These cover the calls an adapter
//! makes into the core: answering an upgrade offer and loading tuning.

use thiserror::Error;

use crate::sim::UpgradeId;

#[derive(Debug, Error)]
pub enum SimError {
    /// `apply_upgrade` was called while no offer is open
    #[error("no upgrade selection is pending")]
    NoUpgradePending,

    /// The chosen upgrade is not one of the three on offer
    #[error("upgrade {0:?} is not part of the current offer")]
    UpgradeNotOffered(UpgradeId),

    /// A tuning value is outside its usable range
    #[error("invalid tuning value for `{field}`: {value}")]
    InvalidTuning { field: &'static str, value: f64 },

    #[error("failed to read tuning file `{path}`: {source}")]
    TuningRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tuning: {0}")]
    TuningParse(#[from] serde_json::Error),
}
