//! The state file: what was recorded for each group after the last lifecycle call

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use groups_core::{logging::debug, GroupState};

/// Recorded groups, keyed by their address in the config
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct StateFile {
    #[serde(default)]
    pub(crate) groups: BTreeMap<String, GroupState>,
}

impl StateFile {
    /// Read the state file. A missing file is an empty state.
    pub(crate) async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("no state file at {}; starting fresh", path.display());
            return Ok(Default::default());
        }
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// Write the whole state file.
    pub(crate) async fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let raw = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, raw)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        debug!("saved state to {}", path.display());
        Ok(())
    }
}
