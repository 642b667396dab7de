//! Optional TOML overlay for launch-time parameter tuning: every field is
//! optional, and an absent field leaves the shipped default untouched.

use std::path::Path;

use rstdp_core::Params;
use serde::Deserialize;

use crate::error::{CliError, CliResult};

/// A partial overlay over [`Params`]: every field is optional, and an absent
/// field leaves the shipped default untouched. Read from `--config <path>`.
#[derive(Debug, Default, Deserialize)]
pub struct ParamsOverlay {
    pub v_thresh: Option<i32>,
    pub v_rest: Option<i32>,
    pub refractory_period: Option<u32>,
    pub membrane_decay_period: Option<u32>,
    pub confidence_max: Option<i32>,
    pub confidence_thr: Option<i32>,
    pub spike_trace_window: Option<u32>,
    pub eligibility_trace_window: Option<u32>,
    pub confidence_leak_period: Option<u32>,
    pub reinforcement_inertia_period: Option<u32>,
    pub pruning_period: Option<u64>,
    pub world_size: Option<i32>,
    pub brain_size: Option<usize>,
    pub connection_density: Option<f64>,
    pub random_activity_count: Option<u32>,
    pub random_activity_period: Option<u64>,
}

impl ParamsOverlay {
    /// Read and parse a TOML overlay from `path`.
    pub fn load_from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::config(format!("{path:?}: {e}")))
    }

    /// Apply every present field onto `params`, in place.
    pub fn apply(&self, params: &mut Params) {
        macro_rules! overlay {
            ($field:ident) => {
                if let Some(value) = self.$field {
                    params.$field = value;
                }
            };
        }
        overlay!(v_thresh);
        overlay!(v_rest);
        overlay!(refractory_period);
        overlay!(membrane_decay_period);
        overlay!(confidence_max);
        overlay!(confidence_thr);
        overlay!(spike_trace_window);
        overlay!(eligibility_trace_window);
        overlay!(confidence_leak_period);
        overlay!(reinforcement_inertia_period);
        overlay!(pruning_period);
        overlay!(world_size);
        overlay!(brain_size);
        overlay!(connection_density);
        overlay!(random_activity_count);
        overlay!(random_activity_period);
    }
}
