#[cfg(test)]
mod tests {
    use tether_core::{Completion, Error};

    #[tokio::test]
    async fn first_signal_wins() {
        let (completion, settlement) = Completion::<i32>::channel();
        assert!(!completion.is_settled());
        assert!(completion.succeed(1));
        assert!(completion.is_settled());
        assert!(!completion.succeed(2));
        assert!(!completion.fail(Error::msg("late")));
        assert_eq!(completion.discarded(), 2);
        assert_eq!(settlement.outcome().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn first_error_wins() {
        let (completion, settlement) = Completion::<i32>::channel();
        assert!(completion.fail(Error::msg("first")));
        assert!(!completion.succeed(7));
        let error = settlement.outcome().await.unwrap_err();
        assert_eq!(error.to_string(), "first");
    }

    #[tokio::test]
    async fn clones_share_the_latch() {
        let (completion, settlement) = Completion::<&'static str>::channel();
        let other = completion.clone();
        let task = tokio::spawn(async move { other.succeed("from task") });
        assert!(task.await.unwrap());
        assert!(completion.is_settled());
        assert!(!completion.succeed("from caller"));
        assert_eq!(completion.discarded(), 1);
        assert_eq!(settlement.outcome().await.unwrap(), "from task");
    }

    #[tokio::test]
    async fn dropped_without_signal() {
        let (completion, settlement) = Completion::<()>::channel();
        drop(completion.clone());
        drop(completion);
        let error = settlement.outcome().await.unwrap_err();
        assert!(
            error.to_string().contains("without signaling"),
            "Unexpected error: {error}"
        );
    }

    #[test]
    fn signal_after_settlement_dropped() {
        let (completion, settlement) = Completion::<u8>::channel();
        drop(settlement);
        assert!(completion.succeed(3));
        assert!(!completion.succeed(4));
    }

    #[test]
    fn debug_shows_state() {
        let (completion, _settlement) = Completion::<u8>::channel();
        assert_eq!(format!("{:?}", completion), "Completion { settled: false, discarded: 0 }");
        completion.succeed(0);
        completion.succeed(1);
        assert_eq!(
            format!("{:?}", completion),
            "Completion { settled: true, discarded: 1 }"
        );
    }
}
