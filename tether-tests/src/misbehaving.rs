use crate::silent_logs;
use tether_core::{
    Callback, Completion, ConnectionScope, Deferred, Driver, Error, PreconditionError, Result,
};

/// Work that does not follow the completion contract.
pub async fn misbehaving<D: Driver>(driver: &D, manager: &D::Manager) {
    silent_logs! {
        // Signaled twice, only the first outcome counts
        let value = driver
            .scope(manager)
            .run(Callback(
                async |_connection: &mut D::Connection, completion: Completion<i32>| -> Result<()> {
                    assert!(completion.succeed(1));
                    assert!(!completion.succeed(2));
                    assert!(!completion.fail(Error::msg("late")));
                    assert_eq!(completion.discarded(), 2);
                    Ok(())
                },
            ))
            .await
            .expect("The first signal should be delivered");
        assert_eq!(value, 1);

        // Signaled, then failed: the failure is a late signal as well
        let value = driver
            .scope(manager)
            .run(Callback(
                async |_connection: &mut D::Connection, completion: Completion<&'static str>| -> Result<()> {
                    completion.succeed("first");
                    Err(Error::msg("thrown after signaling"))
                },
            ))
            .await
            .expect("An error returned after signaling should be discarded");
        assert_eq!(value, "first");

        // Returning an error is the same as signaling it
        let thrown = driver
            .scope(manager)
            .run(Callback(
                async |_connection: &mut D::Connection, _completion: Completion<()>| -> Result<()> {
                    Err(Error::msg("boom"))
                },
            ))
            .await
            .expect_err("Thrown error should fail the scope");
        let signaled = driver
            .scope(manager)
            .run(Callback(
                async |_connection: &mut D::Connection, completion: Completion<()>| -> Result<()> {
                    completion.fail(Error::msg("boom"));
                    Ok(())
                },
            ))
            .await
            .expect_err("Signaled error should fail the scope");
        let rejected = driver
            .scope(manager)
            .run(Deferred(async |_connection: &mut D::Connection| -> Result<()> {
                Err(Error::msg("boom"))
            }))
            .await
            .expect_err("Rejected deferred work should fail the scope");
        assert_eq!(thrown.to_string(), signaled.to_string());
        assert_eq!(signaled.to_string(), rejected.to_string());

        // Never signaled
        let error = driver
            .scope(manager)
            .run(Callback(
                async |_connection: &mut D::Connection, _completion: Completion<()>| -> Result<()> {
                    Ok(())
                },
            ))
            .await
            .expect_err("Work that never signals should fail the scope");
        assert!(
            error.to_string().contains("without signaling"),
            "Unexpected error: {error:#}"
        );

        // Panicked
        let error = driver
            .scope(manager)
            .run(Deferred(async |_connection: &mut D::Connection| -> Result<()> {
                panic!("work exploded")
            }))
            .await
            .expect_err("Panicking work should fail the scope");
        assert_eq!(error.to_string(), "The work panicked: work exploded");

        // No source at all
        let error = ConnectionScope::<D>::new()
            .run(Deferred(async |_connection: &mut D::Connection| -> Result<()> {
                Ok(())
            }))
            .await
            .expect_err("A scope without connection nor manager should fail");
        assert!(error.downcast_ref::<PreconditionError>().is_some());
    };

    // Leasing still works after all of the above
    driver
        .scope(manager)
        .run(Deferred(async |_connection: &mut D::Connection| -> Result<()> {
            Ok(())
        }))
        .await
        .expect("The manager should be usable after misbehaving work");
}
