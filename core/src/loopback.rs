use crate::port::LoopbackAddress;
use crate::protocol::Protocol;
use crate::pump_policy::PumpPolicy;
use bytes::Bytes;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Bytes written by one peer that the other peer has not received yet
#[derive(Debug, Default)]
pub struct LoopbackQueue {
    chunks: VecDeque<Bytes>,
    disconnecting: bool,
}

impl LoopbackQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        LoopbackQueue::default()
    }

    /// Appends a chunk to the back of the queue
    pub fn push(&mut self, chunk: Bytes) {
        self.chunks.push_back(chunk);
    }

    /// Takes the oldest chunk
    pub fn pop(&mut self) -> Option<Bytes> {
        self.chunks.pop_front()
    }

    /// The number of queued chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk is queued
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether the writing side asked to close the connection
    pub fn is_disconnecting(&self) -> bool {
        self.disconnecting
    }
}

/// What a protocol writes to. Writes are queued until the pair is pumped.
#[derive(Debug, Default)]
pub struct Transport {
    outgoing: LoopbackQueue,
    address: LoopbackAddress,
    closed: bool,
}

impl Transport {
    /// Queues `data` for the peer. Ignored once the connection is closing or closed.
    pub fn write(&mut self, data: impl Into<Bytes>) {
        if self.closed {
            trace!("write after connection lost ignored");
            return;
        }
        if self.outgoing.disconnecting {
            trace!("write after lose_connection ignored");
            return;
        }
        self.outgoing.push(data.into());
    }

    /// Closes the connection once everything already written is delivered
    pub fn lose_connection(&mut self) {
        self.outgoing.disconnecting = true;
    }

    /// Whether `lose_connection` was called
    pub fn is_disconnecting(&self) -> bool {
        self.outgoing.disconnecting
    }

    /// The local address
    pub fn get_host(&self) -> &LoopbackAddress {
        &self.address
    }

    /// The remote address. Both ends of a loopback pair share one address.
    pub fn get_peer(&self) -> &LoopbackAddress {
        &self.address
    }

    /// Bytes written but not yet delivered
    pub fn pending(&self) -> &LoopbackQueue {
        &self.outgoing
    }
}

#[derive(Debug)]
struct Peer<P> {
    protocol: P,
    transport: Transport,
}

impl<P: Protocol> Peer<P> {
    fn new(protocol: P) -> Self {
        Peer {
            protocol,
            transport: Transport::default(),
        }
    }
}

/// A server and a client protocol connected in memory.
///
/// Nothing moves until the pair is pumped. Each pump round hands the bytes
/// queued by the server to the client, then the bytes queued by the client to
/// the server, through the pair's [`PumpPolicy`].
#[derive(Debug)]
pub struct LoopbackPair<S, C> {
    server: Peer<S>,
    client: Peer<C>,
    policy: PumpPolicy,
    connected: bool,
}

impl<S: Protocol, C: Protocol> LoopbackPair<S, C> {
    /// Connects `server` and `client`, calling `connection_made` on the server first
    pub fn new(server: S, client: C, policy: PumpPolicy) -> Self {
        let mut pair = LoopbackPair {
            server: Peer::new(server),
            client: Peer::new(client),
            policy,
            connected: true,
        };
        debug!(policy = %pair.policy, "loopback connection made");
        pair.server
            .protocol
            .connection_made(&mut pair.server.transport);
        pair.client
            .protocol
            .connection_made(&mut pair.client.transport);
        pair
    }

    /// Runs one pump round. Returns whether anything was delivered or the
    /// connection was closed during the round.
    pub fn pump_once(&mut self) -> bool {
        if !self.connected {
            return false;
        }
        let to_client = deliver(
            &self.policy,
            &mut self.server.transport.outgoing,
            &mut self.client,
        );
        let to_server = deliver(
            &self.policy,
            &mut self.client.transport.outgoing,
            &mut self.server,
        );
        let closed = self.close_if_done();
        trace!(to_client, to_server, closed, "pump round");
        to_client || to_server || closed
    }

    /// Pumps until a round moves nothing. Returns the number of productive rounds.
    ///
    /// Protocols that answer every chunk with another chunk keep this from returning.
    pub fn flush(&mut self) -> usize {
        let mut rounds = 0;
        while self.pump_once() {
            rounds += 1;
        }
        rounds
    }

    // Both queues must be drained, or a slow policy would lose the peer's bytes.
    fn close_if_done(&mut self) -> bool {
        let server = &self.server.transport.outgoing;
        let client = &self.client.transport.outgoing;
        let disconnecting = server.is_disconnecting() || client.is_disconnecting();
        if disconnecting && server.is_empty() && client.is_empty() {
            self.connected = false;
            self.server.transport.closed = true;
            self.client.transport.closed = true;
            debug!("loopback connection lost");
            self.server.protocol.connection_lost();
            self.client.protocol.connection_lost();
            true
        } else {
            false
        }
    }
}

impl<S, C> LoopbackPair<S, C> {
    /// Whether neither side has lost the connection yet
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The policy this pair pumps with
    pub fn pump_policy(&self) -> &PumpPolicy {
        &self.policy
    }

    /// The server protocol
    pub fn server(&self) -> &S {
        &self.server.protocol
    }

    /// The server protocol
    pub fn server_mut(&mut self) -> &mut S {
        &mut self.server.protocol
    }

    /// The transport the server protocol writes to
    pub fn server_transport_mut(&mut self) -> &mut Transport {
        &mut self.server.transport
    }

    /// The client protocol
    pub fn client(&self) -> &C {
        &self.client.protocol
    }

    /// The client protocol
    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client.protocol
    }

    /// The transport the client protocol writes to
    pub fn client_transport_mut(&mut self) -> &mut Transport {
        &mut self.client.transport
    }

    /// Takes the protocols back out of the pair
    pub fn into_protocols(self) -> (S, C) {
        (self.server.protocol, self.client.protocol)
    }
}

fn deliver<P: Protocol>(policy: &PumpPolicy, queue: &mut LoopbackQueue, target: &mut Peer<P>) -> bool {
    let queued = queue.len();
    if queued == 0 {
        return false;
    }
    let Peer {
        protocol,
        transport,
    } = target;
    policy.pump(queue, &mut |chunk| protocol.data_received(chunk, transport));
    queue.len() < queued
}
