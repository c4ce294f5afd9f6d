//! Provider registry: name -> factory plus configuration contract.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::{Error, Kv, Provider, Result};

/// Configuration passed to provider factories.
pub type Config = BTreeMap<String, String>;

/// Factory constructing a provider from validated configuration.
pub type Factory = Box<dyn Fn(&Config) -> Result<Box<dyn Provider>> + Send + Sync>;

/// Introspection data for a registered provider, e.g. for building a CLI
/// flag surface.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Config keys that must be present and non-empty for `open`.
    pub required: Vec<String>,
    /// Additional recognized config keys.
    pub optional: Vec<String>,
}

struct Entry {
    factory: Factory,
    info: ProviderInfo,
}

/// Maps provider names to factories.
///
/// Construct one registry at process startup, let each backend crate add
/// itself (e.g. `treekv_memory::register(&registry)`), then pass it by
/// reference to whatever opens stores. All registry state sits behind a
/// single lock, independent of any store's own locking.
#[derive(Default)]
pub struct Registry {
    entries: Mutex<BTreeMap<String, Entry>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider under `name`.
    ///
    /// Registering the same name twice is a startup-time configuration
    /// error and fails with [`Error::AlreadyRegistered`]; entries are never
    /// replaced or removed.
    pub fn register(
        &self,
        name: &str,
        factory: Factory,
        required: &[&str],
        optional: &[&str],
    ) -> Result<()> {
        let mut entries = self.lock();
        if entries.contains_key(name) {
            return Err(Error::AlreadyRegistered {
                name: name.to_owned(),
            });
        }

        entries.insert(
            name.to_owned(),
            Entry {
                factory,
                info: ProviderInfo {
                    required: required.iter().map(|s| (*s).to_owned()).collect(),
                    optional: optional.iter().map(|s| (*s).to_owned()).collect(),
                },
            },
        );
        Ok(())
    }

    /// Open a store through the provider registered under `name`.
    ///
    /// Every required config key must be present and non-empty; the first
    /// missing one is reported as [`Error::MissingConfig`]. The provider
    /// the factory yields is wrapped in a [`Kv`].
    pub fn open(&self, name: &str, config: &Config) -> Result<Kv> {
        let entries = self.lock();
        let entry = entries.get(name).ok_or_else(|| Error::UnknownProvider {
            name: name.to_owned(),
        })?;

        for key in &entry.info.required {
            match config.get(key) {
                Some(value) if !value.is_empty() => {}
                _ => return Err(Error::MissingConfig { key: key.clone() }),
            }
        }

        log::debug!("opening '{}' provider", name);
        let provider = (entry.factory)(config)?;
        Ok(Kv::new(provider))
    }

    /// A snapshot of the registered providers.
    ///
    /// The returned map is a copy; the live registry state is never
    /// exposed.
    pub fn providers(&self) -> BTreeMap<String, ProviderInfo> {
        self.lock()
            .iter()
            .map(|(name, entry)| (name.clone(), entry.info.clone()))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Entry>> {
        self.entries.lock().expect("registry lock poisoned")
    }
}
