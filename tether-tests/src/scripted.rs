use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};
use tether_core::{Driver, Error, Meta, Result};

/// Driver call observed by a [`ScriptedManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Acquire { meta: Option<Meta> },
    Release { id: usize, meta: Option<Meta> },
}

#[derive(Default)]
struct Script {
    acquire_error: Option<String>,
    release_error: Option<String>,
    opened: AtomicUsize,
    calls: Mutex<Vec<Call>>,
}

impl Script {
    fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

/// Driver whose acquire and release outcomes are decided upfront, recording every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedDriver;

impl ScriptedDriver {
    pub const fn new() -> Self {
        Self
    }
}

#[derive(Default)]
pub struct ScriptedManager {
    script: Arc<Script>,
}

impl ScriptedManager {
    pub fn new() -> Self {
        Default::default()
    }

    /// Every acquisition fails with `message`.
    pub fn failing_acquire(message: impl Into<String>) -> Self {
        Self {
            script: Arc::new(Script {
                acquire_error: Some(message.into()),
                ..Default::default()
            }),
        }
    }

    /// Every release fails with `message`.
    pub fn failing_release(message: impl Into<String>) -> Self {
        Self {
            script: Arc::new(Script {
                release_error: Some(message.into()),
                ..Default::default()
            }),
        }
    }

    /// Opens a connection outside of the driver, as a caller owning it would.
    pub fn open(&self) -> ScriptedConnection {
        ScriptedConnection {
            id: self.script.opened.fetch_add(1, Ordering::Relaxed),
            script: self.script.clone(),
            log: Vec::new(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn acquired(&self) -> usize {
        self.calls()
            .iter()
            .filter(|v| matches!(v, Call::Acquire { .. }))
            .count()
    }

    pub fn released(&self) -> usize {
        self.calls()
            .iter()
            .filter(|v| matches!(v, Call::Release { .. }))
            .count()
    }
}

pub struct ScriptedConnection {
    pub id: usize,
    script: Arc<Script>,
    /// Statements "executed" on this connection.
    pub log: Vec<String>,
}

impl ScriptedConnection {
    pub fn execute(&mut self, statement: impl Into<String>) {
        self.log.push(statement.into());
    }
}

impl Driver for ScriptedDriver {
    type Manager = ScriptedManager;
    type Connection = ScriptedConnection;

    const NAME: &'static str = "scripted";

    async fn acquire(
        &self,
        manager: &ScriptedManager,
        meta: Option<&Meta>,
    ) -> Result<ScriptedConnection> {
        manager.script.record(Call::Acquire {
            meta: meta.cloned(),
        });
        match &manager.script.acquire_error {
            Some(message) => Err(Error::msg(message.clone())),
            None => Ok(manager.open()),
        }
    }

    async fn release(&self, connection: ScriptedConnection, meta: Option<&Meta>) -> Result<()> {
        let script = connection.script;
        script.record(Call::Release {
            id: connection.id,
            meta: meta.cloned(),
        });
        match &script.release_error {
            Some(message) => Err(Error::msg(message.clone())),
            None => Ok(()),
        }
    }
}
