use crate::{MemoryConnection, MemoryDriver};
use std::{
    borrow::Cow,
    collections::BTreeMap,
    fmt::{self, Debug, Formatter},
    sync::Arc,
};
use tether_core::{Context, Driver, Error, Meta, Result, logged, truncate_long};
use tokio::sync::Mutex;
use url::Url;
use urlencoding::decode;
use uuid::Uuid;

pub const DEFAULT_CAPACITY: usize = 8;

#[derive(Default)]
pub(crate) struct Sessions {
    pub(crate) idle: Vec<Uuid>,
    pub(crate) leased: usize,
}

pub(crate) struct PoolState {
    pub(crate) name: String,
    pub(crate) capacity: usize,
    pub(crate) sessions: Mutex<Sessions>,
    pub(crate) store: Mutex<BTreeMap<String, String>>,
}

/// Bounded pool of in-memory sessions sharing one key/value store.
///
/// Created from a URL of the form `memory://<name>?capacity=<n>`.
#[derive(Clone)]
pub struct MemoryPool {
    pub(crate) state: Arc<PoolState>,
}

impl MemoryPool {
    pub async fn connect(url: impl Into<Cow<'static, str>>) -> Result<MemoryPool> {
        let url = url.into();
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let prefix = format!("{}://", MemoryDriver::NAME);
        if !url.starts_with(&prefix) {
            return Err(logged!(
                Error::msg(format!("Connection URL must start with `{}`", prefix))
                    .context(context())
            ));
        }
        let parsed = Url::parse(&url).with_context(context)?;
        let name = decode(parsed.host_str().unwrap_or_default())
            .with_context(context)?
            .into_owned();
        if name.is_empty() {
            return Err(logged!(
                Error::msg("Connection URL must name the pool").context(context())
            ));
        }
        let mut capacity = DEFAULT_CAPACITY;
        for (key, value) in parsed.query_pairs() {
            match &*key {
                "capacity" => {
                    capacity = value
                        .parse()
                        .with_context(|| format!("Invalid capacity `{}`", value))
                        .with_context(context)?;
                    if capacity == 0 {
                        return Err(logged!(
                            Error::msg("Capacity must be at least 1").context(context())
                        ));
                    }
                }
                _ => log::warn!("Unknown memory pool parameter `{}` is ignored", key),
            }
        }
        log::debug!("Memory pool `{}` with capacity {}", name, capacity);
        Ok(Self {
            state: Arc::new(PoolState {
                name,
                capacity,
                sessions: Default::default(),
                store: Default::default(),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn capacity(&self) -> usize {
        self.state.capacity
    }

    /// Sessions currently handed out.
    pub async fn leased(&self) -> usize {
        self.state.sessions.lock().await.leased
    }

    /// Sessions open and waiting to be leased again.
    pub async fn idle(&self) -> usize {
        self.state.sessions.lock().await.idle.len()
    }

    pub(crate) async fn lease(&self, meta: Option<Meta>) -> Result<MemoryConnection> {
        let mut sessions = self.state.sessions.lock().await;
        let reused = sessions.idle.pop();
        let id = match reused {
            Some(id) => id,
            None if sessions.leased < self.state.capacity => Uuid::new_v4(),
            None => {
                return Err(logged!(Error::msg(format!(
                    "Memory pool `{}` is exhausted, all of its {} sessions are leased",
                    self.state.name, self.state.capacity
                ))));
            }
        };
        sessions.leased += 1;
        log::debug!("Leasing session {} of memory pool `{}`", id, self.state.name);
        Ok(MemoryConnection {
            id,
            pool: self.state.clone(),
            closed: false,
            meta,
        })
    }
}

impl PoolState {
    pub(crate) async fn restore(self: Arc<Self>, connection: MemoryConnection) -> Result<()> {
        let mut sessions = self.sessions.lock().await;
        sessions.leased = sessions.leased.saturating_sub(1);
        if connection.closed {
            return Err(logged!(Error::msg(format!(
                "Session {} of memory pool `{}` was closed before being released",
                connection.id, self.name
            ))));
        }
        sessions.idle.push(connection.id);
        Ok(())
    }
}

impl Debug for MemoryPool {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPool")
            .field("name", &self.state.name)
            .field("capacity", &self.state.capacity)
            .finish()
    }
}
