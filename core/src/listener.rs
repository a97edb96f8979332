use crate::error::{CannotListenError, ConnectionRefusedError};
use crate::loopback::LoopbackPair;
use crate::port::{ListeningPort, LoopbackPort};
use crate::protocol::{Protocol, ProtocolFactory};
use crate::pump_policy::{PumpPolicy, PumpPolicyKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Settings for building a [`LoopbackListener`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerConfig {
    /// The built-in policy the listener pumps with
    #[serde(default)]
    pub pump_policy: PumpPolicyKind,
}

/// Hands out a single [`LoopbackPort`] in place of binding a real socket.
///
/// A listener remembers the port from its first successful `listen` for its
/// whole lifetime, even after that port stops listening, so `listen` can only
/// succeed once.
#[derive(Debug)]
pub struct LoopbackListener<F> {
    listening_port: Option<LoopbackPort<F>>,
    pump_policy: PumpPolicy,
}

impl<F> LoopbackListener<F> {
    /// Creates a listener with the identity pump policy
    pub fn new() -> Self {
        LoopbackListener::with_pump_policy(PumpPolicy::default())
    }

    /// Creates a listener that pumps with `pump_policy`
    pub fn with_pump_policy(pump_policy: PumpPolicy) -> Self {
        LoopbackListener {
            listening_port: None,
            pump_policy,
        }
    }

    /// Creates a listener from its settings
    pub fn from_config(config: &ListenerConfig) -> Self {
        LoopbackListener::with_pump_policy(config.pump_policy.into())
    }

    /// The policy handed to every pair this listener connects
    pub fn pump_policy(&self) -> &PumpPolicy {
        &self.pump_policy
    }

    /// The port created by `listen`, if it was called
    pub fn listening_port(&self) -> Option<&LoopbackPort<F>> {
        self.listening_port.as_ref()
    }

    /// The port created by `listen`, if it was called
    pub fn listening_port_mut(&mut self) -> Option<&mut LoopbackPort<F>> {
        self.listening_port.as_mut()
    }

    /// Creates a port for `factory`, starts it and remembers it.
    ///
    /// Fails if this listener already created a port, whatever its state.
    pub fn listen(&mut self, factory: F) -> Result<&mut LoopbackPort<F>, CannotListenError> {
        if self.listening_port.is_some() {
            return Err(CannotListenError::listen_already_called());
        }
        let mut port = LoopbackPort::new(factory);
        port.start_listening()?;
        debug!(pump_policy = %self.pump_policy, "loopback listener created a port");
        Ok(self.listening_port.insert(port))
    }
}

impl<F: ProtocolFactory> LoopbackListener<F> {
    /// Connects `client` to a new server protocol built by the listening port's factory.
    ///
    /// Refused unless `listen` was called and the port is still listening.
    pub fn connect<C: Protocol>(
        &self,
        client: C,
    ) -> Result<LoopbackPair<F::Output, C>, ConnectionRefusedError> {
        let port = self
            .listening_port
            .as_ref()
            .filter(|port| port.is_listening())
            .ok_or(ConnectionRefusedError)?;
        let server = port.server_factory().build_protocol();
        Ok(LoopbackPair::new(server, client, self.pump_policy.clone()))
    }
}

impl<F> Default for LoopbackListener<F> {
    fn default() -> Self {
        LoopbackListener::new()
    }
}
