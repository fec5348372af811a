//! Deferred Action Queue: mutations scheduled for the next processing pass.
//!
//! Actions enqueued while a drain is running land in the pending buffer and
//! run on the following drain, never on the current one. Two buffers are
//! kept and swapped so the drained allocation is reused.

use std::borrow::Cow;

pub type DeferredFn<C> = Box<dyn FnOnce(&mut C)>;

pub struct DeferredAction<C> {
    /// Diagnostic only.
    pub label: Cow<'static, str>,
    pub action: DeferredFn<C>,
}

pub struct DeferredActionQueue<C> {
    pending: Vec<DeferredAction<C>>,
    spare: Vec<DeferredAction<C>>,
    draining: bool,
}

impl<C> DeferredActionQueue<C> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            spare: Vec::new(),
            draining: false,
        }
    }

    pub fn enqueue(
        &mut self,
        label: impl Into<Cow<'static, str>>,
        action: impl FnOnce(&mut C) + 'static,
    ) {
        self.pending.push(DeferredAction {
            label: label.into(),
            action: Box::new(action),
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_draining(&self) -> bool {
        self.draining
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.pending.iter().map(|a| a.label.as_ref())
    }

    /// Swap buffers: the pending list becomes the batch, the cleared spare
    /// becomes the new pending list.
    fn take_batch(&mut self) -> Vec<DeferredAction<C>> {
        self.spare.clear();
        let batch = std::mem::replace(&mut self.pending, std::mem::take(&mut self.spare));
        self.draining = true;
        batch
    }

    fn recycle(&mut self, mut batch: Vec<DeferredAction<C>>) {
        batch.clear();
        self.spare = batch;
        self.draining = false;
    }
}

impl<C> Default for DeferredActionQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Run every action queued before this call, in FIFO order. `queue` locates
/// the queue inside the context so actions can enqueue through `ctx`.
/// Returns the number of actions run.
pub fn drain<C>(ctx: &mut C, queue: fn(&mut C) -> &mut DeferredActionQueue<C>) -> usize {
    let mut batch = queue(ctx).take_batch();
    let count = batch.len();
    for DeferredAction { label, action } in batch.drain(..) {
        tracing::trace!(%label, "running deferred action");
        action(ctx);
    }
    queue(ctx).recycle(batch);
    count
}
