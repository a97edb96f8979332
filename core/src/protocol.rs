use crate::loopback::Transport;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;

/// One end of a loopback connection
#[cfg_attr(test, automock)]
pub trait Protocol {
    /// Called once when the connection is set up
    fn connection_made(&mut self, _transport: &mut Transport) {}

    /// Called with every chunk the pump policy delivers
    fn data_received(&mut self, data: Bytes, transport: &mut Transport);

    /// Called once when either side has lost the connection
    fn connection_lost(&mut self) {}
}

/// Builds server-side protocols for connections accepted by a listener
#[cfg_attr(test, automock(type Output = MockProtocol;))]
pub trait ProtocolFactory {
    /// The protocol this factory builds
    type Output: Protocol;

    /// Builds the protocol for one new connection
    fn build_protocol(&self) -> Self::Output;
}

impl<P, F> ProtocolFactory for F
where
    P: Protocol,
    F: Fn() -> P,
{
    type Output = P;

    fn build_protocol(&self) -> P {
        self()
    }
}
