use tether_core::{Callback, Completion, ConnectionScope, Deferred, Driver, Error, Meta, Result};

pub async fn leased<D: Driver>(driver: &D, manager: &D::Manager) {
    let value = driver
        .scope(manager)
        .run(Deferred(async |_connection: &mut D::Connection| -> Result<i32> {
            Ok(42)
        }))
        .await
        .expect("Deferred work on a leased connection should succeed");
    assert_eq!(value, 42);

    let value = ConnectionScope::new()
        .with_manager(driver, manager)
        .with_meta(&Meta::new().with("suite", "leased"))
        .run(Callback(
            async |_connection: &mut D::Connection, completion: Completion<String>| -> Result<()> {
                completion.succeed("signaled".into());
                Ok(())
            },
        ))
        .await
        .expect("Callback work on a leased connection should succeed");
    assert_eq!(value, "signaled");

    let error = driver
        .scope(manager)
        .run(Deferred(async |_connection: &mut D::Connection| -> Result<()> {
            Err(Error::msg("boom"))
        }))
        .await
        .expect_err("Failing work should fail the scope");
    assert_eq!(error.to_string(), "boom");

    // The connection went back to the manager, it can be leased again
    for i in 0..16 {
        let value = driver
            .scope(manager)
            .run(Deferred(async |_connection: &mut D::Connection| -> Result<i32> {
                Ok(i)
            }))
            .await
            .expect("Leasing repeatedly should not exhaust the manager");
        assert_eq!(value, i);
    }
}
