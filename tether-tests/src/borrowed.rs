use tether_core::{Callback, Completion, ConnectionScope, Deferred, Driver, Error, Result};

pub async fn borrowed<D: Driver>(driver: &D, manager: &D::Manager) {
    let mut connection = driver
        .acquire(manager, None)
        .await
        .expect("Could not acquire a connection");

    let value = ConnectionScope::<D>::borrowed(&mut connection)
        .run(Deferred(async |_connection: &mut D::Connection| -> Result<i32> {
            Ok(42)
        }))
        .await
        .expect("Work on a borrowed connection should succeed");
    assert_eq!(value, 42);

    let error = ConnectionScope::<D>::borrowed(&mut connection)
        .run(Callback(
            async |_connection: &mut D::Connection, completion: Completion<()>| -> Result<()> {
                completion.fail(Error::msg("boom"));
                Ok(())
            },
        ))
        .await
        .expect_err("Failing work on a borrowed connection should fail the scope");
    assert_eq!(error.to_string(), "boom");

    // Still owned by the caller, who must release it
    driver
        .release(connection, None)
        .await
        .expect("The borrowed connection should still be releasable by its owner");
}
