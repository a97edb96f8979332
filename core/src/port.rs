use crate::error::CannotListenError;
use futures::future::{self, Ready};
use std::cell::OnceCell;
use std::fmt;
use tracing::debug;

/// Something a listening port can report as its bound address
pub trait Address: fmt::Debug {}

/// The shape of a bound, listening socket that code under test relies on
pub trait ListeningPort {
    /// The address type this port reports from `get_host`
    type Address: Address;

    /// Starts listening. Fails if the port is already listening.
    fn start_listening(&mut self) -> Result<(), CannotListenError>;

    /// Stops listening. The returned future is already resolved.
    fn stop_listening(&mut self) -> Ready<()>;

    /// Returns the address this port is bound to
    fn get_host(&self) -> &Self::Address;
}

/// The address of every loopback port. It carries no information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LoopbackAddress;

impl Address for LoopbackAddress {}

impl fmt::Display for LoopbackAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loopback")
    }
}

/// A listening port that never touches the network.
///
/// `F` is whatever the caller uses to build server-side protocols. The port
/// only stores it; [`crate::listener::LoopbackListener::connect`] is what
/// actually builds protocols from it.
#[derive(Debug)]
pub struct LoopbackPort<F> {
    listening: bool,
    server_factory: F,
    address: OnceCell<LoopbackAddress>,
}

impl<F> LoopbackPort<F> {
    /// Creates a port for the given factory. It does not listen yet.
    pub fn new(server_factory: F) -> Self {
        LoopbackPort {
            listening: false,
            server_factory,
            address: OnceCell::new(),
        }
    }

    /// Whether `start_listening` was called more recently than `stop_listening`
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// The factory this port was created with
    pub fn server_factory(&self) -> &F {
        &self.server_factory
    }
}

impl<F> ListeningPort for LoopbackPort<F> {
    type Address = LoopbackAddress;

    fn start_listening(&mut self) -> Result<(), CannotListenError> {
        if self.listening {
            return Err(CannotListenError::already_listening());
        }
        self.listening = true;
        debug!("loopback port listening");
        Ok(())
    }

    fn stop_listening(&mut self) -> Ready<()> {
        if self.listening {
            debug!("loopback port stopped listening");
        }
        self.listening = false;
        future::ready(())
    }

    fn get_host(&self) -> &LoopbackAddress {
        self.address.get_or_init(|| LoopbackAddress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;
    use tokio_test::{assert_err, assert_ok, assert_ready, task};

    fn assert_listening_port<P: ListeningPort>(_port: &P) {}

    fn assert_address<A: Address>(_address: &A) {}

    #[test]
    fn implements_listening_port() {
        assert_listening_port(&LoopbackPort::new(()));
    }

    #[test]
    fn new_port_knows_its_factory() {
        let port = LoopbackPort::new("server factory");
        assert_eq!(*port.server_factory(), "server factory");
        assert!(!port.is_listening());
    }

    #[test]
    fn get_host_returns_an_address() {
        let port = LoopbackPort::new(());
        let host = port.get_host();
        assert_address(host);
        assert_eq!(*host, LoopbackAddress);
    }

    #[test]
    fn get_host_returns_the_same_address() {
        let port = LoopbackPort::new(());
        let first: *const LoopbackAddress = port.get_host();
        assert!(ptr::eq(first, port.get_host()));
    }

    #[test]
    fn start_listening_not_listening() {
        let mut port = LoopbackPort::new(());
        assert!(!port.is_listening());
        assert_ok!(port.start_listening());
        assert!(port.is_listening());
    }

    #[test]
    fn start_listening_already_listening() {
        let mut port = LoopbackPort::new(());
        assert_ok!(port.start_listening());
        assert!(port.is_listening());
        let err = assert_err!(port.start_listening());
        assert_eq!(err, CannotListenError::already_listening());
        assert!(port.is_listening());
    }

    #[test]
    fn stop_listening_is_resolved() {
        let mut port = LoopbackPort::new(());
        assert_ok!(port.start_listening());
        let mut stopped = task::spawn(port.stop_listening());
        assert_ready!(stopped.poll());
        assert!(!port.is_listening());
    }

    #[test]
    fn stop_listening_not_listening() {
        let mut port = LoopbackPort::new(());
        assert!(!port.is_listening());
        let mut stopped = task::spawn(port.stop_listening());
        assert_ready!(stopped.poll());
        assert!(!port.is_listening());
    }

    #[tokio::test]
    async fn stop_listening_can_be_awaited() {
        let mut port = LoopbackPort::new(());
        assert_ok!(port.start_listening());
        port.stop_listening().await;
        assert!(!port.is_listening());
    }

    #[test]
    fn restart_after_stop() {
        let mut port = LoopbackPort::new(());
        assert_ok!(port.start_listening());
        let _ = port.stop_listening();
        assert_ok!(port.start_listening());
        assert!(port.is_listening());
    }
}
