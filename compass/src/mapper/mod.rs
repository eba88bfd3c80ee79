//! Policy-to-compliance mapping
//!
//! A [`Mapper`] resolves a policy lookup key into compliance context using
//! the assessment plans registered with it and the catalogs in scope. One
//! mapper instance exists per configured plugin id; all ids currently share
//! the basic implementation via [`factory::mapper_for`].

pub mod basic;
pub mod factory;

use std::collections::HashMap;
use std::fmt;

use beacon_common::catalog::Catalog;
use beacon_common::plan::AssessmentPlan;
use beacon_common::{Compliance, Policy};

/// The catalogs the service can resolve against, keyed by catalog id.
/// Populated once at load, read-only thereafter.
pub type Scope = HashMap<String, Catalog>;

/// Identity of a mapper plugin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapperId(String);

impl MapperId {
    /// Create an id from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MapperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A plugin that maps policies into compliance context.
pub trait Mapper: Send + Sync {
    /// The plugin's identity.
    fn name(&self) -> MapperId;

    /// Resolve `policy` against the registered plans and `scope`.
    ///
    /// Always returns a value; when no mapping exists the result is the
    /// unmapped sentinel, never an error.
    fn map(&self, policy: &Policy, scope: &Scope) -> Compliance;

    /// Register an assessment plan under the catalog it references.
    fn add_plan(&mut self, catalog_id: &str, plan: AssessmentPlan);
}

/// Mappers by plugin id.
pub type MapperSet = HashMap<MapperId, Box<dyn Mapper>>;
