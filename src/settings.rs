//! Versioned shift configuration shared between classification sites.
//!
//! The current [`ShiftConfig`] lives behind a watch channel. Callers take a
//! [`ShiftSnapshot`] and pass `&snapshot.config` into one classification or
//! aggregation call, so a replacement mid-computation never mixes two configs.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::models::shift::{ActiveShift, ShiftConfig};

/// Immutable view of the shift configuration at one version.
#[derive(Debug, Clone)]
pub struct ShiftSnapshot {
    pub version: u64,
    pub config: Arc<ShiftConfig>,
}

/// Owner of the current shift configuration.
#[derive(Debug)]
pub struct ShiftSettings {
    sender: watch::Sender<ShiftSnapshot>,
}

impl Default for ShiftSettings {
    fn default() -> Self {
        Self::new(ShiftConfig::default())
    }
}

impl ShiftSettings {
    /// Start at version 0 with `config`.
    pub fn new(config: ShiftConfig) -> Self {
        let (sender, _receiver) = watch::channel(ShiftSnapshot {
            version: 0,
            config: Arc::new(config),
        });
        Self { sender }
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> ShiftSnapshot {
        self.sender.borrow().clone()
    }

    pub fn version(&self) -> u64 {
        self.sender.borrow().version
    }

    /// Replace the configuration wholesale and notify subscribers.
    ///
    /// Returns the new version.
    pub fn replace(&self, config: ShiftConfig) -> u64 {
        self.install(|_| config)
    }

    /// Edit a copy of the current configuration and install it.
    ///
    /// The edit runs while the channel holds the value, so concurrent updates
    /// apply one after another and none is lost.
    pub fn update(&self, edit: impl FnOnce(&mut ShiftConfig)) -> u64 {
        self.install(|current| {
            let mut config = current.clone();
            edit(&mut config);
            config
        })
    }

    fn install(&self, next: impl FnOnce(&ShiftConfig) -> ShiftConfig) -> u64 {
        let mut version = 0;
        let mut active = ActiveShift::Day;
        self.sender.send_modify(|snapshot| {
            let config = next(&snapshot.config);
            active = config.active_shift;
            snapshot.version += 1;
            snapshot.config = Arc::new(config);
            version = snapshot.version;
        });
        info!("Shift settings replaced (version {version}, active shift {active:?})");
        version
    }

    /// Listen for replacements.
    pub fn subscribe(&self) -> ShiftSubscription {
        ShiftSubscription {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Change listener returned by [`ShiftSettings::subscribe`].
#[derive(Debug, Clone)]
pub struct ShiftSubscription {
    receiver: watch::Receiver<ShiftSnapshot>,
}

impl ShiftSubscription {
    /// New snapshot if the configuration was replaced since the last call.
    ///
    /// Several replacements between calls are reported once, as the latest.
    pub fn changed(&mut self) -> Option<ShiftSnapshot> {
        match self.receiver.has_changed() {
            Ok(true) => Some(self.receiver.borrow_and_update().clone()),
            _ => None,
        }
    }

    /// Current snapshot without marking it seen.
    pub fn current(&self) -> ShiftSnapshot {
        self.receiver.borrow().clone()
    }
}
