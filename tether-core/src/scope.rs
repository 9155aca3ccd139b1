use crate::{
    Completion, CompositeError, Driver, Error, Meta, PreconditionError, Result, Work, logged,
    panic_message,
};
use futures::FutureExt;
use std::{
    fmt::{self, Debug, Formatter},
    panic::AssertUnwindSafe,
};

/// Runs one unit of work against exactly one connection.
///
/// The connection is either borrowed from the caller ([`with_connection`](Self::with_connection))
/// or leased from a manager through its driver ([`with_manager`](Self::with_manager)).
/// A leased connection is released once the work settled, whatever the
/// outcome. A borrowed one is never released.
///
/// Outcome delivered by [`run`](Self::run):
///
/// | connection | work  | release | result                 |
/// |------------|-------|---------|------------------------|
/// | borrowed   | `Ok`  |         | the value              |
/// | borrowed   | `Err` |         | the work error         |
/// | leased     | `Ok`  | `Ok`    | the value              |
/// | leased     | `Err` | `Ok`    | the work error         |
/// | leased     | `Err` | `Err`   | [`CompositeError`]     |
/// | leased     | `Ok`  | `Err`   | the release error      |
///
/// In the last case the value is lost: it is only reported through a warning.
pub struct ConnectionScope<'s, D: Driver> {
    connection: Option<&'s mut D::Connection>,
    source: Option<(&'s D, &'s D::Manager)>,
    meta: Option<&'s Meta>,
}

enum Handle<'s, D: Driver> {
    Borrowed(&'s mut D::Connection),
    Leased {
        driver: &'s D,
        connection: D::Connection,
    },
}

impl<'s, D: Driver> Handle<'s, D> {
    fn connection(&mut self) -> &mut D::Connection {
        match self {
            Handle::Borrowed(connection) => &mut **connection,
            Handle::Leased { connection, .. } => connection,
        }
    }
}

impl<'s, D: Driver> ConnectionScope<'s, D> {
    pub fn new() -> Self {
        Self {
            connection: None,
            source: None,
            meta: None,
        }
    }

    /// Scope over a connection owned by the caller.
    pub fn borrowed(connection: &'s mut D::Connection) -> Self {
        Self::new().with_connection(connection)
    }

    pub fn with_connection(mut self, connection: &'s mut D::Connection) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn with_manager(mut self, driver: &'s D, manager: &'s D::Manager) -> Self {
        self.source = Some((driver, manager));
        self
    }

    /// Context forwarded untouched to the driver's `acquire` and `release`.
    pub fn with_meta(mut self, meta: &'s Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub async fn run<T, W>(self, work: W) -> Result<T>
    where
        W: Work<D::Connection, T>,
    {
        let meta = self.meta;
        let mut handle: Handle<'s, D> = match (self.connection, self.source) {
            (Some(connection), None) => {
                log::debug!("Running the work on a borrowed {} connection", D::NAME);
                Handle::Borrowed(connection)
            }
            (None, Some((driver, manager))) => {
                let connection = driver.acquire(manager, meta).await.map_err(|e| {
                    log::debug!("Could not acquire a {} connection: {:#}", D::NAME, e);
                    e
                })?;
                log::debug!("Leased a {} connection", D::NAME);
                Handle::Leased { driver, connection }
            }
            (None, None) => {
                return Err(logged!(Error::new(PreconditionError::new(
                    "either a connection or a manager to acquire one from is required",
                ))));
            }
            (Some(..), Some(..)) => {
                return Err(logged!(Error::new(PreconditionError::new(
                    "a connection and a manager were both provided, expected exactly one",
                ))));
            }
        };
        let outcome = invoke(work, handle.connection()).await;
        match handle {
            Handle::Borrowed(..) => outcome,
            Handle::Leased { driver, connection } => {
                let released = driver.release(connection, meta).await;
                log::debug!(
                    "Released the {} connection ({})",
                    D::NAME,
                    if released.is_ok() { "ok" } else { "failed" }
                );
                settle(outcome, released)
            }
        }
    }
}

impl<'s, D: Driver> Default for ConnectionScope<'s, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'s, D: Driver> Debug for ConnectionScope<'s, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionScope")
            .field("driver", &D::NAME)
            .field("borrowed", &self.connection.is_some())
            .field("managed", &self.source.is_some())
            .field("meta", &self.meta)
            .finish()
    }
}

/// Invokes the work once and waits for its first signaled outcome.
async fn invoke<C, T, W>(work: W, connection: &mut C) -> Result<T>
where
    W: Work<C, T>,
{
    let (completion, settlement) = Completion::channel();
    let returned = AssertUnwindSafe(work.invoke(connection, completion.clone()))
        .catch_unwind()
        .await;
    let failure = match returned {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e),
        Err(payload) => Some(Error::msg(format!(
            "The work panicked: {}",
            panic_message(&*payload)
        ))),
    };
    if let Some(e) = failure {
        completion.fail(e);
    }
    drop(completion);
    settlement.outcome().await
}

/// Merges the outcome of the work with the outcome of the release.
fn settle<T>(outcome: Result<T>, released: Result<()>) -> Result<T> {
    match (outcome, released) {
        (outcome, Ok(())) => outcome,
        (Err(primary), Err(secondary)) => {
            let error = CompositeError::new(primary, secondary);
            log::error!("{}", error);
            Err(Error::new(error))
        }
        (Ok(..), Err(e)) => {
            log::warn!(
                "The work succeeded but its connection could not be released, the value is discarded: {:#}",
                e
            );
            Err(e)
        }
    }
}
