use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// The countdown granularity: whole seconds, decremented once per tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Unified event type consumed by the app runner. All stimuli funnel through
/// one channel, so a tick and an input event can never interleave mid-update.
#[derive(Clone, Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    /// One second elapsed on the countdown spawned under `epoch`. Ticks
    /// carrying an epoch the engine no longer recognizes are discarded.
    Tick { epoch: u64 },
}

/// Forward terminal events (keyboard, resize) into the shared channel.
pub fn spawn_input_thread(tx: Sender<Event>) {
    thread::spawn(move || loop {
        match event::read() {
            Ok(CtEvent::Key(key)) => {
                if tx.send(Event::Key(key)).is_err() {
                    break;
                }
            }
            Ok(CtEvent::Resize(_, _)) => {
                if tx.send(Event::Resize).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });
}

/// A cancelable once-per-second tick source for one timed run.
///
/// The cancel flag is checked before every send, so after `cancel` returns
/// no further ticks enter the channel; a tick already queued is defused by
/// the epoch check on the receiving side.
pub struct CountdownTimer {
    cancel: Arc<AtomicBool>,
}

impl CountdownTimer {
    pub fn spawn(tx: Sender<Event>, epoch: u64) -> Self {
        Self::spawn_with_interval(tx, epoch, TICK_INTERVAL)
    }

    pub fn spawn_with_interval(tx: Sender<Event>, epoch: u64, interval: Duration) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = cancel.clone();

        thread::spawn(move || loop {
            thread::sleep(interval);
            if flag.load(Ordering::SeqCst) {
                break;
            }
            if tx.send(Event::Tick { epoch }).is_err() {
                break;
            }
        });

        Self { cancel }
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Drains the event channel strictly in arrival order.
pub struct Runner {
    rx: Receiver<Event>,
}

impl Runner {
    pub fn new(rx: Receiver<Event>) -> Self {
        Self { rx }
    }

    /// Block for the next event; None once every sender is gone.
    pub fn step(&self) -> Option<Event> {
        self.rx.recv().ok()
    }
}
