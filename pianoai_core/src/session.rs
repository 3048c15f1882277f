use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context;
use crossbeam_channel::{bounded, select, tick, Sender};
use log::{debug, error};
use parking_lot::Mutex;

use crate::gameplay::{EngineSnapshot, GameEngine, PlayResult};
use crate::input::{InputEvent, InputQueue};
use crate::time::{Phase, TimeSource};

/// Runs a `GameEngine` on its own thread: ticks it every `frame` and
/// judges note-ons as soon as they arrive.
///
/// Every tick and press holds the engine lock for the whole transition, so
/// readers never see a half-applied judgement. After `stop()` returns the
/// thread has been joined and the engine will not be ticked again.
pub struct SessionDriver {
    engine: Arc<Mutex<GameEngine>>,
    input: Sender<InputEvent>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl SessionDriver {
    /// Calls `start()` on the engine and anchors it at `source.now()`
    /// before returning, then ticks it every `frame` on the session thread.
    pub fn spawn<T>(mut engine: GameEngine, source: T, frame: Duration) -> anyhow::Result<Self>
    where
        T: TimeSource + 'static,
    {
        engine.start();
        engine.tick(source.now());
        let engine = Arc::new(Mutex::new(engine));
        let queue = InputQueue::new();
        let input = queue.sender();
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let worker = Arc::clone(&engine);
        let handle = thread::Builder::new()
            .name("pianoai-session".to_string())
            .spawn(move || {
                let ticker = tick(frame);
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(queue.receiver()) -> msg => {
                            if let Ok(InputEvent::NoteOn { pitch }) = msg {
                                let mut engine = worker.lock();
                                // Bring the clock up to date so the press is judged at its arrival time.
                                engine.tick(source.now());
                                engine.handle_note_on(&pitch);
                            }
                        }
                        recv(ticker) -> _ => {
                            let mut engine = worker.lock();
                            engine.tick(source.now());
                            if engine.phase() == Phase::Finished {
                                break;
                            }
                        }
                    }
                }
                debug!("session thread exiting");
            })
            .context("failed to spawn session thread")?;

        Ok(Self {
            engine,
            input,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Queues a press; it is judged on the session thread.
    pub fn note_on(&self, pitch: impl Into<String>) {
        let _ = self.input.send(InputEvent::note_on(pitch));
    }

    pub fn input(&self) -> Sender<InputEvent> {
        self.input.clone()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.lock().snapshot()
    }

    pub fn result(&self) -> PlayResult {
        self.engine.lock().result()
    }

    /// Read-only access to the engine between ticks.
    pub fn with_engine<R>(&self, f: impl FnOnce(&GameEngine) -> R) -> R {
        f(&self.engine.lock())
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops ticking and joins the session thread. Idempotent.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("session thread panicked");
            }
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
