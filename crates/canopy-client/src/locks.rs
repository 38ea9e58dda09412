use canopy_protocol::LockConfig;

/// How a facade's `lock` call was made.
pub enum LockUpdate {
    /// Lock every flag the target recognizes.
    All,
    /// Exactly these flags; omitted ones are unlocked by the frame.
    Explicit(LockConfig),
    /// Derive the new flags from the box's current resolved ones.
    Builder(Box<dyn FnOnce(&LockConfig) -> LockConfig + Send>),
}

impl LockUpdate {
    pub fn builder(build: impl FnOnce(&LockConfig) -> LockConfig + Send + 'static) -> Self {
        LockUpdate::Builder(Box::new(build))
    }

    /// The wire config. A builder runs here against `current`, so what the
    /// frame receives is always a concrete set.
    pub(crate) fn resolve(self, current: &LockConfig) -> Option<LockConfig> {
        match self {
            LockUpdate::All => None,
            LockUpdate::Explicit(config) => Some(config),
            LockUpdate::Builder(build) => Some(build(current)),
        }
    }
}

impl From<LockConfig> for LockUpdate {
    fn from(config: LockConfig) -> Self {
        LockUpdate::Explicit(config)
    }
}

impl std::fmt::Debug for LockUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockUpdate::All => f.write_str("All"),
            LockUpdate::Explicit(config) => f.debug_tuple("Explicit").field(config).finish(),
            LockUpdate::Builder(_) => f.write_str("Builder(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_protocol::LockFlag;

    #[test]
    fn builder_sees_current_flags() {
        let current = LockConfig::new().with(LockFlag::AllowDrop, false);
        let update = LockUpdate::builder(|c| c.clone().with(LockFlag::AllowSplitters, false));
        let resolved = update.resolve(&current).unwrap();
        assert_eq!(resolved.get(LockFlag::AllowDrop), Some(false));
        assert_eq!(resolved.get(LockFlag::AllowSplitters), Some(false));
    }

    #[test]
    fn lock_all_sends_no_config() {
        assert!(LockUpdate::All.resolve(&LockConfig::new()).is_none());
    }
}
