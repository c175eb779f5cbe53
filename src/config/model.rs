//! Application document model
//!
//! Typed, read-only view over the parsed configuration document: metadata,
//! ports exposed by the application, ports it depends on, and the dynamic
//! custom configuration bag. Constructed once at startup by the loader and
//! immutable afterwards; lookups that hand out port structures return owned
//! clones so callers can never mutate the stored spec.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::kv::Kv;

/// Name of a primary or secondary port within an application spec
pub type PortName = String;

/// Named interface a port implements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interface {
    pub name: String,
}

/// Network location of an endpoint
///
/// `address` may encode several comma-separated endpoints for clustered
/// backends; this engine never validates or splits it, consumers do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub address: String,
    pub port: u16,
}

/// A capability this application offers to others
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryPort {
    pub interface: Interface,
    pub location: Option<Location>,
}

/// The primary port a secondary port was bound to by the topology resolver
///
/// Populated externally before or during load and carried through verbatim.
/// Absence means the dependency is not yet bound, which is a valid state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchedPrimaryPort {
    pub location: Option<Location>,
    pub application_name: String,
}

/// A dependency this application consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryPort {
    pub interface: Interface,
    /// Per-port options (topic name, consumer group, ...). `None` when the
    /// document carries no options block at all.
    pub options: Option<Kv>,
    pub matched_primary_port: Option<MatchedPrimaryPort>,
}

/// Port maps and custom configuration of an application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSpec {
    pub primary_ports: BTreeMap<PortName, PrimaryPort>,
    pub secondary_ports: BTreeMap<PortName, SecondaryPort>,
    pub custom_config: Kv,
}

/// A deployable application resolved from its configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub kind: String,
    pub api_version: String,
    pub name: String,
    pub namespace: String,
    pub spec: ApplicationSpec,
}

impl Application {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn custom_config(&self) -> &Kv {
        &self.spec.custom_config
    }

    pub fn secondary_ports(&self) -> &BTreeMap<PortName, SecondaryPort> {
        &self.spec.secondary_ports
    }

    /// Look up a secondary port by name
    ///
    /// Returns an owned clone: mutating the result never affects the stored
    /// spec, and a later lookup sees the original value.
    pub fn secondary_port(&self, name: &str) -> Option<SecondaryPort> {
        self.spec.secondary_ports.get(name).cloned()
    }

    /// The primary port a secondary port was bound to, if resolved
    pub fn matched_primary_port(&self, name: &str) -> Option<MatchedPrimaryPort> {
        self.secondary_port(name)?.matched_primary_port
    }

    /// Location of the bound primary port, if resolved and located
    pub fn matched_primary_port_location(&self, name: &str) -> Option<Location> {
        self.matched_primary_port(name)?.location
    }
}
