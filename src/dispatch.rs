//! # Event delivery
//!
//! The bounded queue between the input-processing thread and the single
//! external subscriber. Everything crossing it is an immutable, fully
//! computed [`EventBatch`]; no domain logic runs on the consumer side of the
//! channel.
//!
//! Delivery is fire-and-forget: the input path uses `try_send` and treats a
//! full or closed queue as the subscriber's problem, never its own.

use crate::events::{EventBatch, EventStream};

/// How many undelivered batches may pile up before they get dropped. At one
/// batch per input frame this is roughly half a second of backlog.
const EVENT_QUEUE_DEPTH: usize = 64;

pub(crate) fn event_channel() -> (async_channel::Sender<EventBatch>, EventStream) {
    let (tx, rx) = async_channel::bounded(EVENT_QUEUE_DEPTH);
    (tx, EventStream { rx })
}

/// Push a batch without ever blocking the input thread.
pub(crate) fn send_nonblocking(tx: &async_channel::Sender<EventBatch>, batch: EventBatch) {
    match tx.try_send(batch) {
        Ok(()) => {}
        Err(async_channel::TrySendError::Full(batch)) => {
            log::warn!("subscriber too slow, dropping {} event(s)", batch.len());
        }
        Err(async_channel::TrySendError::Closed(_)) => {
            // Subscriber went away entirely. Not an error for input handling.
            log::debug!("event stream closed, discarding batch");
        }
    }
}
