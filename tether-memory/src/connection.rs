use crate::pool::PoolState;
use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};
use tether_core::{Error, Meta, Result, logged};
use uuid::Uuid;

/// Session leased from a [`MemoryPool`](crate::MemoryPool).
pub struct MemoryConnection {
    pub(crate) id: Uuid,
    pub(crate) pool: Arc<PoolState>,
    pub(crate) closed: bool,
    pub(crate) meta: Option<Meta>,
}

impl MemoryConnection {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Context the session was acquired with.
    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Close the session. It can no longer be used nor given back to the pool.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        self.ensure_open()?;
        Ok(self.pool.store.lock().await.get(key).cloned())
    }

    pub async fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>> {
        self.ensure_open()?;
        Ok(self
            .pool
            .store
            .lock()
            .await
            .insert(key.into(), value.into()))
    }

    pub async fn remove(&mut self, key: &str) -> Result<Option<String>> {
        self.ensure_open()?;
        Ok(self.pool.store.lock().await.remove(key))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(logged!(Error::msg(format!(
                "Session {} of memory pool `{}` is closed",
                self.id, self.pool.name
            ))));
        }
        Ok(())
    }
}

impl Debug for MemoryConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryConnection")
            .field("id", &self.id)
            .field("pool", &self.pool.name)
            .field("closed", &self.closed)
            .finish()
    }
}
