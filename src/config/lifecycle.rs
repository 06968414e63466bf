//! Lifecycle resolution configuration

use serde::Deserialize;

use crate::domain::lifecycle::{LifecycleResolver, SlaPauseMode};

/// Policy knobs for lifecycle resolution
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LifecycleConfig {
    /// How paused SLA clocks are evaluated
    /// (`freeze_deadline` or `accumulated_offset`)
    #[serde(default)]
    pub sla_pause_mode: SlaPauseMode,
}

impl LifecycleConfig {
    /// Resolver configured with these policies
    pub fn resolver(&self) -> LifecycleResolver {
        LifecycleResolver::new(self.sla_pause_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_frozen_deadline() {
        assert_eq!(LifecycleConfig::default().sla_pause_mode, SlaPauseMode::FreezeDeadline);
    }

    #[test]
    fn resolver_carries_pause_mode() {
        let config = LifecycleConfig {
            sla_pause_mode: SlaPauseMode::AccumulatedOffset,
        };
        assert_eq!(
            config.resolver().pause_mode(),
            SlaPauseMode::AccumulatedOffset
        );
    }
}
