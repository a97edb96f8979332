use crate::error::UnknownPumpPolicyError;
use crate::loopback::LoopbackQueue;
use crate::policies::{run_collapsing, run_identity};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The body of a custom pump policy
pub type PumpFn = dyn Fn(&mut LoopbackQueue, &mut dyn FnMut(Bytes)) + Send + Sync;

/// Decides how the bytes queued by one peer reach the other peer.
#[derive(Clone)]
pub enum PumpPolicy {
    /// Deliver every chunk as it was written
    Identity,
    /// Deliver everything queued as one chunk
    Collapsing,
    /// A caller-supplied policy
    Custom(Arc<PumpFn>),
}

/// The policy a listener uses unless it is given another one
pub const IDENTITY_PUMP_POLICY: PumpPolicy = PumpPolicy::Identity;

/// The serializable names of the built-in policies
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum PumpPolicyKind {
    /// See [`PumpPolicy::Identity`]
    #[default]
    #[serde(rename = "identity")]
    Identity,
    /// See [`PumpPolicy::Collapsing`]
    #[serde(rename = "collapsing")]
    Collapsing,
}

impl PumpPolicy {
    /// Wraps a closure as a policy
    pub fn custom<P>(pump: P) -> Self
    where
        P: Fn(&mut LoopbackQueue, &mut dyn FnMut(Bytes)) + Send + Sync + 'static,
    {
        PumpPolicy::Custom(Arc::new(pump))
    }

    /// Moves bytes out of `queue`, handing them to `deliver`
    pub fn pump(&self, queue: &mut LoopbackQueue, deliver: &mut dyn FnMut(Bytes)) {
        match self {
            PumpPolicy::Identity => run_identity(queue, deliver),
            PumpPolicy::Collapsing => run_collapsing(queue, deliver),
            PumpPolicy::Custom(pump) => pump(queue, deliver),
        }
    }
}

impl Default for PumpPolicy {
    fn default() -> Self {
        IDENTITY_PUMP_POLICY
    }
}

impl PartialEq for PumpPolicy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PumpPolicy::Identity, PumpPolicy::Identity) => true,
            (PumpPolicy::Collapsing, PumpPolicy::Collapsing) => true,
            (PumpPolicy::Custom(a), PumpPolicy::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PumpPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PumpPolicy::Identity => write!(f, "Identity"),
            PumpPolicy::Collapsing => write!(f, "Collapsing"),
            PumpPolicy::Custom(pump) => write!(f, "Custom({:p})", Arc::as_ptr(pump)),
        }
    }
}

impl fmt::Display for PumpPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PumpPolicy::Identity => write!(f, "identity"),
            PumpPolicy::Collapsing => write!(f, "collapsing"),
            PumpPolicy::Custom(..) => write!(f, "custom"),
        }
    }
}

impl From<PumpPolicyKind> for PumpPolicy {
    fn from(kind: PumpPolicyKind) -> Self {
        match kind {
            PumpPolicyKind::Identity => PumpPolicy::Identity,
            PumpPolicyKind::Collapsing => PumpPolicy::Collapsing,
        }
    }
}

impl fmt::Display for PumpPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&PumpPolicy::from(*self), f)
    }
}

impl FromStr for PumpPolicyKind {
    type Err = UnknownPumpPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identity" => Ok(PumpPolicyKind::Identity),
            "collapsing" => Ok(PumpPolicyKind::Collapsing),
            other => Err(UnknownPumpPolicyError(other.to_owned())),
        }
    }
}

impl TryFrom<String> for PumpPolicyKind {
    type Error = UnknownPumpPolicyError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}
