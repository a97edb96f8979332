use std::fmt;
use thiserror::Error;

/// Returned when a port cannot start listening.
///
/// The loopback types never bind anything, so `interface` and `port` are
/// always `None`; they exist so callers can treat this like a real bind failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Couldn't listen on {}:{}: {}", Unset(.interface), Unset(.port), .reason)]
pub struct CannotListenError {
    interface: Option<String>,
    port: Option<u16>,
    reason: &'static str,
}

impl CannotListenError {
    /// Creates a new error for the given interface, port and reason
    pub fn new(interface: Option<String>, port: Option<u16>, reason: &'static str) -> Self {
        CannotListenError {
            interface,
            port,
            reason,
        }
    }

    pub(crate) fn already_listening() -> Self {
        CannotListenError::new(None, None, "Already listening.")
    }

    pub(crate) fn listen_already_called() -> Self {
        CannotListenError::new(None, None, "listen() already called.")
    }

    /// The interface the port tried to listen on, if any
    pub fn interface(&self) -> Option<&str> {
        self.interface.as_deref()
    }

    /// The port number the port tried to listen on, if any
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Why listening failed
    pub fn reason(&self) -> &str {
        self.reason
    }
}

/// Returned when connecting to a listener that has no listening port.
///
/// Only [`crate::listener::LoopbackListener::connect`] returns this. Listening
/// itself fails with nothing but [`CannotListenError`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Connection refused: not listening")]
pub struct ConnectionRefusedError;

/// Returned when a pump policy name is not one of the built-in policies
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown pump policy: {0}")]
pub struct UnknownPumpPolicyError(pub String);

struct Unset<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Unset<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "*"),
        }
    }
}
