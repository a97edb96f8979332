use crate::loopback::LoopbackQueue;
use bytes::Bytes;
use tracing::trace;

/// Deliver every queued chunk on its own, in the order it was written
pub fn run_identity(queue: &mut LoopbackQueue, deliver: &mut dyn FnMut(Bytes)) {
    while let Some(chunk) = queue.pop() {
        trace!(len = chunk.len(), "identity pump delivering chunk");
        deliver(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::test_utils::*;

    #[test]
    fn delivers_each_chunk() {
        let mut queue = queue_of(&[b"he", b"llo", b"!"]);
        let delivered = collect(run_identity, &mut queue);
        assert_eq!(delivered, chunks(&[b"he", b"llo", b"!"]));
        assert!(queue.is_empty());
    }

    #[test]
    fn empty_queue_delivers_nothing() {
        let mut queue = LoopbackQueue::new();
        assert!(collect(run_identity, &mut queue).is_empty());
    }
}
