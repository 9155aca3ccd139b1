use crate::{ConnectionScope, Meta, Result};
use std::future::Future;

/// A source of connections.
///
/// Drivers implement this trait to let a [`ConnectionScope`] lease a
/// connection from a manager (usually a pool) and give it back once the work
/// is done.
///
/// # Lifecycle
/// - `acquire` obtains a connection the caller becomes responsible for. It may
///   suspend on I/O; always await it.
/// - `release` hands the connection back. It consumes the handle, a failed
///   release is reported as an error but the handle is gone either way.
pub trait Driver {
    /// Whatever the driver acquires from, typically a pool.
    type Manager;
    /// The live handle the work runs against.
    type Connection;

    /// Scheme used in connection URLs.
    const NAME: &'static str;

    fn acquire(
        &self,
        manager: &Self::Manager,
        meta: Option<&Meta>,
    ) -> impl Future<Output = Result<Self::Connection>>;

    fn release(
        &self,
        connection: Self::Connection,
        meta: Option<&Meta>,
    ) -> impl Future<Output = Result<()>>;

    /// Start a scope that leases its connection from `manager`.
    fn scope<'s>(&'s self, manager: &'s Self::Manager) -> ConnectionScope<'s, Self>
    where
        Self: Sized,
    {
        ConnectionScope::new().with_manager(self, manager)
    }
}
