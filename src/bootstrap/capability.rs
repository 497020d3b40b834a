//! Capability definitions.

use std::fmt;

use super::ServerBuilder;

/// Whether a failed registration stops startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fatality {
    /// Failure aborts startup.
    Fatal,
    /// Failure is logged as an error and the capability is skipped.
    Recoverable,
    /// Failure is logged as a warning and the capability is skipped.
    Optional,
}

impl Fatality {
    pub fn is_fatal(self) -> bool {
        matches!(self, Fatality::Fatal)
    }
}

type Action = Box<dyn FnOnce(&mut ServerBuilder) -> anyhow::Result<()> + Send>;

/// One named registration step. Consumed when registered, so it runs once.
pub struct Capability {
    pub(crate) name: &'static str,
    pub(crate) fatality: Fatality,
    pub(crate) action: Action,
}

impl Capability {
    pub fn new<F>(name: &'static str, fatality: Fatality, action: F) -> Self
    where
        F: FnOnce(&mut ServerBuilder) -> anyhow::Result<()> + Send + 'static,
    {
        Self {
            name,
            fatality,
            action: Box::new(action),
        }
    }

    pub fn recoverable<F>(name: &'static str, action: F) -> Self
    where
        F: FnOnce(&mut ServerBuilder) -> anyhow::Result<()> + Send + 'static,
    {
        Self::new(name, Fatality::Recoverable, action)
    }

    /// A capability the server is expected to run without at times.
    pub fn optional<F>(name: &'static str, action: F) -> Self
    where
        F: FnOnce(&mut ServerBuilder) -> anyhow::Result<()> + Send + 'static,
    {
        Self::new(name, Fatality::Optional, action)
    }

    pub fn fatal<F>(name: &'static str, action: F) -> Self
    where
        F: FnOnce(&mut ServerBuilder) -> anyhow::Result<()> + Send + 'static,
    {
        Self::new(name, Fatality::Fatal, action)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fatality(&self) -> Fatality {
        self.fatality
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("name", &self.name)
            .field("fatality", &self.fatality)
            .finish_non_exhaustive()
    }
}
