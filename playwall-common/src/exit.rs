use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use rdev::{EventType, Key};
use crate::error::{PlaywallError, ValidationError};
use crate::shutdown::ShutdownSignal;
use crate::Result;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// How long a freshly installed keyboard hook gets to report a failure.
const HOOK_STARTUP_WINDOW: Duration = Duration::from_millis(300);

/// Blocking source of the exit request.
pub trait ExitTrigger: Send {
    /// Acquires whatever the trigger needs before any player is started.
    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    /// Blocks until the exit key is observed (`true`) or the shutdown signal
    /// was raised some other way (`false`).
    fn wait_for_exit(&mut self, shutdown: &ShutdownSignal) -> bool;
}

fn wait_on_channel(rx: &Receiver<()>, shutdown: &ShutdownSignal) -> bool {
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(()) => return true,
            Err(RecvTimeoutError::Timeout) => {
                if shutdown.is_set() {
                    return false;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                while !shutdown.wait_timeout(POLL_INTERVAL) {}
                return false;
            }
        }
    }
}

fn hook_unavailable(message: String) -> PlaywallError {
    PlaywallError::Validation(ValidationError::ExitKeyUnavailable { message })
}

/// Listens for `Escape` through a global keyboard hook.
#[derive(Default)]
pub struct KeyboardExitTrigger {
    rx: Option<Receiver<()>>,
}

impl KeyboardExitTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    fn install_hook(&mut self) -> Result<()> {
        if self.rx.is_some() {
            return Ok(());
        }

        let (tx, rx) = mpsc::channel();
        let (err_tx, err_rx) = mpsc::channel();
        // rdev::listen never returns while the hook is alive, so this
        // thread is left detached and ends with the process.
        thread::Builder::new()
            .name("playwall-keyboard".to_string())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    if let EventType::KeyPress(Key::Escape) = event.event_type {
                        let _ = tx.send(());
                    }
                });
                let message = match result {
                    Ok(()) => "keyboard hook stopped".to_string(),
                    Err(e) => format!("{:?}", e),
                };
                log::error!("Keyboard hook failed: {}", message);
                let _ = err_tx.send(message);
            })
            .map_err(|e| hook_unavailable(e.to_string()))?;

        match err_rx.recv_timeout(HOOK_STARTUP_WINDOW) {
            Ok(message) => Err(hook_unavailable(message)),
            Err(RecvTimeoutError::Disconnected) => Err(hook_unavailable("keyboard hook thread exited".to_string())),
            Err(RecvTimeoutError::Timeout) => {
                log::debug!("Keyboard hook installed");
                self.rx = Some(rx);
                Ok(())
            }
        }
    }
}

impl ExitTrigger for KeyboardExitTrigger {
    fn prepare(&mut self) -> Result<()> {
        self.install_hook()
    }

    fn wait_for_exit(&mut self, shutdown: &ShutdownSignal) -> bool {
        if let Err(e) = self.install_hook() {
            log::error!("{}. Exit key is unavailable, stop with Ctrl+C", e);
        }
        match &self.rx {
            Some(rx) => wait_on_channel(rx, shutdown),
            None => {
                while !shutdown.wait_timeout(POLL_INTERVAL) {}
                false
            }
        }
    }
}

/// Programmatic exit trigger, paired with an [`ExitHandle`].
pub struct ManualExitTrigger {
    rx: Receiver<()>,
}

/// Presses the exit key of a [`ManualExitTrigger`].
#[derive(Clone)]
pub struct ExitHandle {
    tx: Sender<()>,
}

impl ExitHandle {
    pub fn press(&self) {
        let _ = self.tx.send(());
    }
}

pub fn manual_exit_trigger() -> (ManualExitTrigger, ExitHandle) {
    let (tx, rx) = mpsc::channel();
    (ManualExitTrigger { rx }, ExitHandle { tx })
}

impl ExitTrigger for ManualExitTrigger {
    fn wait_for_exit(&mut self, shutdown: &ShutdownSignal) -> bool {
        wait_on_channel(&self.rx, shutdown)
    }
}

/// Turns one exit key press into the shutdown signal.
pub struct ExitListener<T: ExitTrigger> {
    trigger: T,
    shutdown: ShutdownSignal,
}

impl<T: ExitTrigger + 'static> ExitListener<T> {
    pub fn new(trigger: T, shutdown: ShutdownSignal) -> Self {
        Self { trigger, shutdown }
    }

    /// Startup check, run before any background activity.
    pub fn prepare(&mut self) -> Result<()> {
        self.trigger.prepare()
    }

    pub fn run(mut self) {
        if self.trigger.wait_for_exit(&self.shutdown) && self.shutdown.trigger() {
            log::info!("Exit key pressed, shutting down");
        }
        log::debug!("Exit listener stopped");
    }

    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("playwall-exit".to_string())
            .spawn(move || self.run())
    }
}
