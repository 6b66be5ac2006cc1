//! Application registry: where launchable applications come from and how they are started.
//!
//! Presentation code only talks to [`AppRegistry`], so the XDG implementation can be
//! swapped for a fake in tests.

mod desktop;
pub mod exec;
pub mod icon;

pub use desktop::DesktopRegistry;

use crate::model::AppRecord;

/// Read access to the host's launchable entry points plus the launch capability.
pub trait AppRegistry: Send + Sync {
    /// One record per matching entry point. Potentially slow; never drops an entry
    /// because its label or icon could not be resolved.
    fn list_launchable(&self) -> Vec<AppRecord>;

    /// Start the default entry point for `identifier`. Fire-and-forget: an identifier
    /// that no longer resolves is silently ignored.
    fn launch(&self, identifier: &str);
}

#[cfg(test)]
pub(crate) mod fake {
    use super::AppRegistry;
    use crate::model::AppRecord;
    use std::sync::Mutex;

    /// In-memory registry that records every launch request.
    #[derive(Default)]
    pub(crate) struct FakeRegistry {
        pub apps: Vec<AppRecord>,
        pub launches: Mutex<Vec<String>>,
    }

    impl FakeRegistry {
        pub fn with_apps(apps: Vec<AppRecord>) -> Self {
            Self {
                apps,
                launches: Mutex::new(Vec::new()),
            }
        }

        pub fn launched(&self) -> Vec<String> {
            self.launches.lock().unwrap().clone()
        }
    }

    impl AppRegistry for FakeRegistry {
        fn list_launchable(&self) -> Vec<AppRecord> {
            self.apps.clone()
        }

        fn launch(&self, identifier: &str) {
            // Unknown identifiers are accepted and ignored, like the real registry.
            self.launches.lock().unwrap().push(identifier.to_string());
        }
    }
}
