//! Reader configuration

use fos_dom::NodeId;

/// Configuration passed to [`VirtualScreenReader::start`](crate::VirtualScreenReader::start)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Root of the walked subtree
    pub container: Option<NodeId>,
    /// Notification cycles `act`/`press` wait before reading back
    pub settle_cycles: usize,
    /// Append live region announcements to the spoken log
    pub announce_live_regions: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            container: None,
            settle_cycles: 1,
            announce_live_regions: true,
        }
    }
}

impl ReaderConfig {
    pub fn new(container: NodeId) -> Self {
        Self::default().with_container(container)
    }

    pub fn with_container(mut self, container: NodeId) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_settle_cycles(mut self, cycles: usize) -> Self {
        self.settle_cycles = cycles;
        self
    }

    pub fn with_live_regions(mut self, announce: bool) -> Self {
        self.announce_live_regions = announce;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builders() {
        let config = ReaderConfig::default();
        assert_eq!(config.container, None);
        assert_eq!(config.settle_cycles, 1);
        assert!(config.announce_live_regions);

        let config = ReaderConfig::new(NodeId(3)).with_settle_cycles(4).with_live_regions(false);
        assert_eq!(config.container, Some(NodeId(3)));
        assert_eq!(config.settle_cycles, 4);
        assert!(!config.announce_live_regions);
    }
}
