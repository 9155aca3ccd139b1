#[cfg(test)]
mod tests {
    use log::{Level, LevelFilter, Log, Metadata, Record};
    use std::sync::{Mutex, PoisonError};
    use tether::{Callback, Completion, Driver, Error, Result};
    use tether_tests::{ScriptedConnection, ScriptedDriver, ScriptedManager};

    const DRIVER: ScriptedDriver = ScriptedDriver::new();

    /// Keeps every record emitted by this test binary.
    struct Capture(Mutex<Vec<(Level, String)>>);

    impl Capture {
        fn take(&self) -> Vec<(Level, String)> {
            std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
        }
    }

    impl Log for Capture {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if record.target().starts_with("tether") {
                self.0
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(Mutex::new(Vec::new()));

    fn at(records: &[(Level, String)], level: Level) -> Vec<&str> {
        records
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    // Single test: the logger is global to the binary.
    #[tokio::test]
    async fn diagnostics() {
        log::set_logger(&CAPTURE).expect("Could not install the logger");
        log::set_max_level(LevelFilter::Trace);

        // Extra signals produce exactly one warning
        let manager = ScriptedManager::new();
        let value = DRIVER
            .scope(&manager)
            .run(Callback(
                async |_connection: &mut ScriptedConnection, completion: Completion<i32>| -> Result<()> {
                    completion.succeed(1);
                    completion.succeed(2);
                    completion.fail(Error::msg("late"));
                    assert_eq!(completion.discarded(), 2);
                    Ok(())
                },
            ))
            .await
            .expect("The first signal should be delivered");
        assert_eq!(value, 1);
        assert_eq!(manager.released(), 1);
        let records = CAPTURE.take();
        let warnings = at(&records, Level::Warn);
        assert_eq!(warnings.len(), 1, "Unexpected warnings: {warnings:?}");
        assert!(warnings[0].contains("more than once"), "{}", warnings[0]);
        assert!(at(&records, Level::Error).is_empty());

        // A panic after signaling is discarded the same way
        let manager = ScriptedManager::new();
        let value = DRIVER
            .scope(&manager)
            .run(Callback(
                async |_connection: &mut ScriptedConnection, completion: Completion<&'static str>| -> Result<()> {
                    completion.succeed("done");
                    panic!("too late")
                },
            ))
            .await
            .expect("The signal sent before panicking should be delivered");
        assert_eq!(value, "done");
        assert_eq!(manager.acquired(), 1);
        assert_eq!(manager.released(), 1);
        let records = CAPTURE.take();
        let warnings = at(&records, Level::Warn);
        assert_eq!(warnings.len(), 1, "Unexpected warnings: {warnings:?}");
        assert!(warnings[0].contains("The work panicked: too late"), "{}", warnings[0]);

        // The composite error is logged once, each failure appearing once
        let manager = ScriptedManager::failing_release("disconnect");
        let error = DRIVER
            .scope(&manager)
            .run(Callback(
                async |_connection: &mut ScriptedConnection, _completion: Completion<()>| -> Result<()> {
                    Err(Error::msg("boom"))
                },
            ))
            .await
            .expect_err("Both failures should be reported");
        assert_eq!(error.to_string().matches("boom").count(), 1);
        let records = CAPTURE.take();
        let composite = at(&records, Level::Error)
            .into_iter()
            .filter(|m| m.starts_with("Primary failure"))
            .collect::<Vec<_>>();
        assert_eq!(composite.len(), 1, "Unexpected errors: {records:?}");
        assert_eq!(composite[0].matches("boom").count(), 1, "{}", composite[0]);
        assert_eq!(composite[0].matches("disconnect").count(), 1, "{}", composite[0]);
    }
}
