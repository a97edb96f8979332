use crate::loopback::LoopbackQueue;
use bytes::{Bytes, BytesMut};
use tracing::trace;

/// Deliver everything queued as a single chunk
pub fn run_collapsing(queue: &mut LoopbackQueue, deliver: &mut dyn FnMut(Bytes)) {
    let mut collapsed = BytesMut::new();
    let mut count = 0usize;
    while let Some(chunk) = queue.pop() {
        collapsed.extend_from_slice(&chunk);
        count += 1;
    }
    if count > 0 {
        trace!(chunks = count, len = collapsed.len(), "collapsing pump delivering");
        deliver(collapsed.freeze());
    }
}
