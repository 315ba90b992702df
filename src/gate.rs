// Publish gate - the on/off switch for result publishing

use crate::config::Config;

/// Fixed at construction; pass it where it is needed instead of reading a global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PublishGate {
    enabled: bool,
}

impl PublishGate {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.publish.enabled)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gate_is_closed() {
        assert!(!PublishGate::default().is_enabled());
        assert!(!PublishGate::disabled().is_enabled());
        assert!(!PublishGate::from_config(&Config::default()).is_enabled());
    }

    #[test]
    fn test_gate_follows_config() {
        let mut config = Config::default();
        config.publish.enabled = true;
        assert!(PublishGate::from_config(&config).is_enabled());
    }
}
