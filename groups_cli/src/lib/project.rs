//! Path utilities for the project.
//!

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;

lazy_static! {
    static ref CREDENTIALS_DIR: PathBuf = PathBuf::from(".groups");
    static ref CREDENTIALS_FILE: PathBuf = PathBuf::from("credentials.yaml");
}

/// Name of the credentials entry for the NerdGraph client
pub(crate) const NERDGRAPH_CREDENTIALS_KEY: &str = "nerdgraph";

/// Path for the credentials file, unless one was given on the command line.
pub(crate) fn credentials_path(overridden: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(path) = overridden {
        return Ok(path.to_owned());
    }
    Ok(home_dir()
        .ok_or_else(|| anyhow!("unable to find the home directory"))?
        .join(CREDENTIALS_DIR.as_path())
        .join(CREDENTIALS_FILE.as_path()))
}
