//! Known-device allowlist.

use std::collections::HashSet;

use contracts::{AllowlistConfig, DeviceId};

/// Fixed set of device ids eligible for correlation
#[derive(Debug, Clone)]
pub struct AllowlistFilter {
    devices: HashSet<DeviceId>,
}

impl AllowlistFilter {
    pub fn new<I, S>(devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<DeviceId>,
    {
        Self {
            devices: devices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &AllowlistConfig) -> Self {
        Self::new(config.devices.iter().map(String::as_str))
    }

    /// Exact, case-sensitive match
    pub fn accepts(&self, device_id: &str) -> bool {
        self.devices.contains(device_id)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::DEFAULT_ALLOWLIST;

    #[test]
    fn test_exact_match() {
        let filter = AllowlistFilter::new(["AA:AA", "CC:CC"]);
        assert!(filter.accepts("AA:AA"));
        assert!(!filter.accepts("aa:aa"));
        assert!(!filter.accepts("BB:BB"));
        assert!(!filter.accepts(""));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_default_config() {
        let filter = AllowlistFilter::from_config(&AllowlistConfig::default());
        assert_eq!(filter.len(), DEFAULT_ALLOWLIST.len());
        for id in DEFAULT_ALLOWLIST {
            assert!(filter.accepts(id));
        }
    }

    #[test]
    fn test_empty_rejects_everything() {
        let filter = AllowlistFilter::new(Vec::<String>::new());
        assert!(filter.is_empty());
        assert!(!filter.accepts("AA:AA"));
    }
}
