// src/service.rs
use crate::error::Result;
use crate::types::SubbruteError;
use async_trait::async_trait;
use log::info;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Created,
    Running,
    Stopped,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self {
            ServiceState::Created => "created",
            ServiceState::Running => "running",
            ServiceState::Stopped => "stopped",
        };
        f.write_str(state)
    }
}

/// A pipeline stage with a one-shot lifecycle: `Created -> Running -> Stopped`.
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;
    fn state(&self) -> ServiceState;
    /// Begin processing. Fails if the service was already started or stopped.
    fn start(&self) -> Result<()>;
    /// Signal cancellation and wait for the processing loop to exit.
    async fn stop(&self) -> Result<()>;
    /// Whether the stage has seen inbound work within its idle window.
    fn is_active(&self) -> bool;
}

/// Advisory activity marker shared between a stage and its coordinator.
#[derive(Debug, Clone, Default)]
pub struct ActivityFlag(Arc<AtomicBool>);

impl ActivityFlag {
    pub fn set(&self, active: bool) {
        self.0.store(active, Ordering::SeqCst);
    }

    /// Store `active` and return the previous value.
    pub fn swap(&self, active: bool) -> bool {
        self.0.swap(active, Ordering::SeqCst)
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Bookkeeping every stage shares: name, lifecycle state, activity flag and
/// the quit signal observed by the processing loop.
#[derive(Debug)]
pub struct BaseService {
    name: String,
    state: Mutex<ServiceState>,
    active: ActivityFlag,
    quit_tx: watch::Sender<bool>,
}

impl BaseService {
    pub fn new(name: impl Into<String>) -> Self {
        let (quit_tx, _) = watch::channel(false);
        Self {
            name: name.into(),
            state: Mutex::new(ServiceState::Created),
            active: ActivityFlag::default(),
            quit_tx,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> ServiceState {
        *self.lock_state()
    }

    pub fn activity(&self) -> ActivityFlag {
        self.active.clone()
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    /// Receiver the processing loop watches. Flips to `true` on stop.
    pub fn quit_signal(&self) -> watch::Receiver<bool> {
        self.quit_tx.subscribe()
    }

    /// `Created -> Running`. Any other starting state is an error.
    pub fn begin_start(&self) -> Result<()> {
        let mut state = self.lock_state();
        match *state {
            ServiceState::Created => {
                *state = ServiceState::Running;
                info!("{} started", self.name);
                Ok(())
            }
            other => Err(self.error(format!("cannot start a {} service", other))),
        }
    }

    /// Move to `Stopped` and raise the quit signal.
    ///
    /// Returns `true` if a processing loop was running and needs to be
    /// waited on. Stopping twice is a no-op.
    pub fn begin_stop(&self) -> bool {
        let mut state = self.lock_state();
        let was_running = *state == ServiceState::Running;
        if *state != ServiceState::Stopped {
            *state = ServiceState::Stopped;
            self.quit_tx.send_replace(true);
            info!("{} stopped", self.name);
        }
        was_running
    }

    pub fn error(&self, message: impl Into<String>) -> SubbruteError {
        SubbruteError::ServiceError {
            service_name: self.name.clone(),
            message: message.into(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ServiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
