use otakit_version::UpdateVersion;

use crate::config::UpdaterConfig;
use crate::descriptor::{UpdateDescriptor, UpdateKind};

/// What to do with a server-offered update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Offered version is not newer than what we run.
    NoOp,
    RunOtaUpdate,
    RunForceUpdate,
}

/// Decide the update path from the version comparison and the update kind.
/// Pure decision; performs no I/O.
///
/// Versions are compared numerically per dotted segment ("1.9.0" <
/// "1.10.0"), not lexicographically.
pub fn classify(config: &UpdaterConfig, descriptor: &UpdateDescriptor) -> Action {
    let target = UpdateVersion::parse(&descriptor.target_version);
    let current = UpdateVersion::parse(&config.current_version);

    if target <= current {
        return Action::NoOp;
    }

    match descriptor.kind {
        UpdateKind::Force => Action::RunForceUpdate,
        UpdateKind::Ota => Action::RunOtaUpdate,
    }
}
