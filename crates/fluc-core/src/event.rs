//! Per-event scalar context.

use serde::{Deserialize, Serialize};

use crate::config::{FlowConfig, FlucFlags, SubeventMask};

/// Scalar state set once before an event is processed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventContext {
    /// Centrality or multiplicity value tagging every emission.
    pub centrality: f64,
    /// Primary vertex position along the beam axis (QA only).
    pub vertex: f64,
    /// Enabled gap selectors.
    pub subevents: SubeventMask,
    /// Behaviour flags.
    pub flags: FlucFlags,
}

impl EventContext {
    /// Context with default selectors and flags.
    pub fn new(centrality: f64, vertex: f64) -> Self {
        Self {
            centrality,
            vertex,
            subevents: SubeventMask::default(),
            flags: FlucFlags::default(),
        }
    }

    /// Context inheriting selectors and flags from the configuration.
    pub fn from_config(config: &FlowConfig, centrality: f64, vertex: f64) -> Self {
        Self {
            centrality,
            vertex,
            subevents: config.subevents,
            flags: config.flags,
        }
    }

    /// Overrides the behaviour flags.
    pub fn with_flags(mut self, flags: FlucFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Overrides the enabled selectors.
    pub fn with_subevents(mut self, subevents: SubeventMask) -> Self {
        self.subevents = subevents;
        self
    }
}
