//!
//! Declarative group management
//!
//! Provides the typed group configuration, the membership reconciler, and the
//! lifecycle handlers that drive a remote group-management service.
#![deny(missing_docs)]

pub use client::GroupManagementClient;
pub use config::{GroupConfig, GroupState};
pub use error::GroupError;
pub use resource::{GroupResource, Timeouts};

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod plan;
pub mod reconcile;
pub mod resource;
pub mod retry;

mod test_util;

#[macro_export]
/// Time the code inside the macro. Write the elapsed time to debug logs.
macro_rules! log_runtime {
    ($context:literal, $($tt:tt)+) => {
        {
            $crate::logging::debug!("{}: starting", $context);
            let timer = std::time::Instant::now();
            let x =
            $(
                $tt
            )+;
            $crate::logging::debug!("{}: {:?}", $context, timer.elapsed());
            x
        }
    }
}
