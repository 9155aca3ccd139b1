use crate::{MemoryConnection, MemoryPool};
use tether_core::{Driver, Meta, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryDriver;

impl MemoryDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MemoryDriver {
    type Manager = MemoryPool;
    type Connection = MemoryConnection;

    const NAME: &'static str = "memory";

    async fn acquire(
        &self,
        pool: &MemoryPool,
        meta: Option<&Meta>,
    ) -> Result<MemoryConnection> {
        pool.lease(meta.cloned()).await
    }

    async fn release(&self, connection: MemoryConnection, _meta: Option<&Meta>) -> Result<()> {
        connection.pool.clone().restore(connection).await
    }
}
