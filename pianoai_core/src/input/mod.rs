pub mod events;

pub use self::events::InputEvent;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Hand-off point between the input collaborator and the engine.
///
/// Producers on any thread hold a `Sender` from `sender()`; the thread that
/// owns the engine drains the queue with `GameEngine::drain_input`, so
/// presses are applied one at a time in arrival order.
pub struct InputQueue {
    tx: Sender<InputEvent>,
    rx: Receiver<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn push(&self, event: InputEvent) {
        // The queue owns a receiver, so the channel cannot be disconnected.
        let _ = self.tx.send(event);
    }

    pub fn note_on(&self, pitch: impl Into<String>) {
        self.push(InputEvent::note_on(pitch));
    }

    /// Non-blocking.
    pub fn pop(&self) -> Option<InputEvent> {
        self.rx.try_recv().ok()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn sender(&self) -> Sender<InputEvent> {
        self.tx.clone()
    }

    pub(crate) fn receiver(&self) -> &Receiver<InputEvent> {
        &self.rx
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
