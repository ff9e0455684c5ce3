use std::{
    sync::{
        atomic::{AtomicBool, AtomicU8, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use log::{debug, error, warn};

use crate::snake::Direction::{self, *};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Latest input, written by the polling thread and read by the game loop.
/// Plain atomics: a read may miss the event that lands right after it.
#[derive(Debug)]
pub struct InputSignals {
    direction: AtomicU8,
    quit: AtomicBool,
    stop: AtomicBool,
}

impl InputSignals {
    pub fn new() -> Self {
        InputSignals {
            direction: AtomicU8::new(Right.to_u8()),
            quit: AtomicBool::new(false),
            stop: AtomicBool::new(false),
        }
    }

    pub fn direction(&self) -> Direction {
        Direction::from_u8(self.direction.load(Ordering::Relaxed))
    }

    pub fn set_direction(&self, direction: Direction) {
        self.direction.store(direction.to_u8(), Ordering::Relaxed);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Relaxed)
    }

    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::Relaxed);
    }

    /// Tells the polling thread to finish.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Applies one key press. Returns false for keys the game ignores.
    pub fn handle_key(&self, ev: &KeyEvent) -> bool {
        match ev {
            ev if is_quit(ev) => self.request_quit(),
            KeyEvent { code, modifiers: _ } => match code {
                KeyCode::Char('w') | KeyCode::Up => self.set_direction(Up),
                KeyCode::Char('a') | KeyCode::Left => self.set_direction(Left),
                KeyCode::Char('s') | KeyCode::Down => self.set_direction(Down),
                KeyCode::Char('d') | KeyCode::Right => self.set_direction(Right),
                _ => return false,
            },
        }

        true
    }
}

impl Default for InputSignals {
    fn default() -> Self {
        InputSignals::new()
    }
}

/// Drains terminal events on its own thread so the tick loop never waits on
/// the keyboard.
pub struct InputSource {
    signals: Arc<InputSignals>,
    handle: Option<JoinHandle<()>>,
}

impl InputSource {
    pub fn spawn() -> std::io::Result<Self> {
        let signals = Arc::new(InputSignals::new());
        let worker = Arc::clone(&signals);

        let handle = thread::Builder::new()
            .name("input".into())
            .spawn(move || poll_events(&worker))?;

        Ok(InputSource { signals, handle: Some(handle) })
    }

    pub fn signals(&self) -> Arc<InputSignals> {
        Arc::clone(&self.signals)
    }

    pub fn shutdown(mut self) {
        self.join();
    }

    fn join(&mut self) {
        self.signals.stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("input thread panicked");
            }
        }
    }
}

impl Drop for InputSource {
    fn drop(&mut self) {
        self.join();
    }
}

fn poll_events(signals: &InputSignals) {
    debug!("input thread started");

    while !signals.is_stopped() {
        match poll(POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(err) => {
                warn!("polling terminal events failed: {}", err);
                signals.request_quit();
                break;
            }
        }

        match read() {
            Ok(Event::Key(ev)) => {
                if !signals.handle_key(&ev) {
                    debug!("ignoring {:?}", ev.code);
                }
            }
            Ok(_) => {}
            Err(err) => {
                warn!("reading a terminal event failed: {}", err);
                signals.request_quit();
                break;
            }
        }
    }

    debug!("input thread finished");
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(
        ev,
        KeyEvent { code: KeyCode::Char('q'), .. }
            | KeyEvent { code: KeyCode::Char('Q'), .. }
            | KeyEvent { code: KeyCode::Esc, .. }
            | KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL }
    )
}
