//! Controller state carried from one tick to the next.

use crate::{ControlConfig, Pid};

/// Persistent state of one session.
///
/// Created before the first tick and dropped when the session ends. The
/// lap time is `None` until the first tick has been seen.
#[derive(Debug, Clone)]
pub struct ControllerMemory {
    pub(crate) lateral: Pid,
    pub(crate) longitudinal: Pid,
    pub(crate) prev_lap_time: Option<f64>,
}

impl ControllerMemory {
    pub fn new(config: &ControlConfig) -> Self {
        Self {
            lateral: Pid::new(config.lateral),
            longitudinal: Pid::new(config.longitudinal),
            prev_lap_time: None,
        }
    }

    pub fn prev_lap_time(&self) -> Option<f64> {
        self.prev_lap_time
    }

    pub fn is_primed(&self) -> bool {
        self.prev_lap_time.is_some()
    }

    pub fn lateral(&self) -> &Pid {
        &self.lateral
    }

    pub fn longitudinal(&self) -> &Pid {
        &self.longitudinal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PidGains;

    #[test]
    fn test_fresh_memory_is_unprimed() {
        let memory = ControllerMemory::new(&ControlConfig::default());
        assert!(!memory.is_primed());
        assert_eq!(memory.prev_lap_time(), None);
        assert_eq!(memory.lateral().sample_count(), 0);
        assert_eq!(*memory.longitudinal().gains(), PidGains::LONGITUDINAL);
    }
}
