//! Source of the name stamped into `created_by`.

use crate::config::Config;

pub trait Auditor: Send + Sync {
    fn current_auditor(&self) -> String;
}

/// Always reports the same configured name.
#[derive(Debug, Clone)]
pub struct StaticAuditor {
    name: String,
}

impl StaticAuditor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.auditor.clone())
    }
}

impl Auditor for StaticAuditor {
    fn current_auditor(&self) -> String {
        self.name.clone()
    }
}
