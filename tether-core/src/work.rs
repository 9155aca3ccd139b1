use crate::{Completion, Result};
use std::future::Future;

/// A unit of work run against one connection.
///
/// The calling convention is declared by the wrapper implementing it:
/// [`Deferred`] for work that returns its outcome, [`Callback`] for work that
/// signals it through a [`Completion`]. Either way the outcome reaches the
/// same one-shot latch.
pub trait Work<C, T> {
    /// Run the work. An `Err` returned here is fed to `completion` exactly as
    /// if the work had signaled it.
    fn invoke(
        self,
        connection: &mut C,
        completion: Completion<T>,
    ) -> impl Future<Output = Result<()>>;
}

/// Work returning its outcome: `Ok` completes with the value, `Err` with the error.
///
/// ```ignore
/// scope.run(Deferred(async |connection: &mut MemoryConnection| {
///     connection.get("key")
/// }))
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Deferred<F>(pub F);

/// Work that signals its outcome through the [`Completion`] it receives.
///
/// Returning `Err` from the work itself is the same as calling
/// [`Completion::fail`] with that error.
#[derive(Debug, Clone, Copy)]
pub struct Callback<F>(pub F);

impl<C, T, F> Work<C, T> for Deferred<F>
where
    F: AsyncFnOnce(&mut C) -> Result<T>,
{
    async fn invoke(self, connection: &mut C, completion: Completion<T>) -> Result<()> {
        completion.complete((self.0)(connection).await);
        Ok(())
    }
}

impl<C, T, F> Work<C, T> for Callback<F>
where
    F: AsyncFnOnce(&mut C, Completion<T>) -> Result<()>,
{
    async fn invoke(self, connection: &mut C, completion: Completion<T>) -> Result<()> {
        (self.0)(connection, completion).await
    }
}
