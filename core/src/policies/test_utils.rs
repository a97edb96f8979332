use crate::loopback::LoopbackQueue;
use bytes::Bytes;

pub(crate) fn chunks(data: &[&[u8]]) -> Vec<Bytes> {
    data.iter().map(|chunk| Bytes::copy_from_slice(chunk)).collect()
}

pub(crate) fn queue_of(data: &[&[u8]]) -> LoopbackQueue {
    let mut queue = LoopbackQueue::new();
    for chunk in chunks(data) {
        queue.push(chunk);
    }
    queue
}

pub(crate) fn collect(
    policy: fn(&mut LoopbackQueue, &mut dyn FnMut(Bytes)),
    queue: &mut LoopbackQueue,
) -> Vec<Bytes> {
    let mut delivered = Vec::new();
    policy(queue, &mut |chunk| delivered.push(chunk));
    delivered
}
