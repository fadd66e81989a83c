//! Outcome channels connecting validators to the pipeline.

use tokio::sync::mpsc;

use crate::model::{ValidationOutcome, Verdict};

use super::error::DeliveryError;

/// Create the valid/invalid outcome channel pair, each holding up to
/// `capacity` undelivered outcomes.
pub fn outcome_channels(capacity: usize) -> (OutcomeSender, OutcomeReceiver) {
    let (valid_tx, valid_rx) = mpsc::channel(capacity);
    let (invalid_tx, invalid_rx) = mpsc::channel(capacity);
    (
        OutcomeSender {
            valid: valid_tx,
            invalid: invalid_tx,
        },
        OutcomeReceiver {
            valid: valid_rx,
            invalid: invalid_rx,
        },
    )
}

/// Producer side. Cheaply cloneable; the channels close once every clone is
/// dropped.
#[derive(Debug, Clone)]
pub struct OutcomeSender {
    valid: mpsc::Sender<ValidationOutcome>,
    invalid: mpsc::Sender<ValidationOutcome>,
}

impl OutcomeSender {
    /// Route an outcome by its verdict, waiting for channel capacity.
    pub async fn deliver(&self, outcome: ValidationOutcome) -> Result<(), DeliveryError> {
        let channel = match &outcome.validation {
            Verdict::Success => &self.valid,
            Verdict::Failure => &self.invalid,
            Verdict::Other(verdict) => return Err(DeliveryError::Unroutable(verdict.clone())),
        };
        channel
            .send(outcome)
            .await
            .map_err(|_| DeliveryError::ChannelClosed)
    }
}

/// One event read from the outcome channels.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeEvent {
    Valid(ValidationOutcome),
    Invalid(ValidationOutcome),
    /// One of the channels closed; no more outcomes will arrive.
    Closed,
}

/// Consumer side, owned by the pipeline event loop.
#[derive(Debug)]
pub struct OutcomeReceiver {
    valid: mpsc::Receiver<ValidationOutcome>,
    invalid: mpsc::Receiver<ValidationOutcome>,
}

impl OutcomeReceiver {
    /// Wait for the next outcome on either channel.
    ///
    /// Cancel safe: dropping the future before it completes never loses an
    /// outcome.
    pub async fn next(&mut self) -> OutcomeEvent {
        tokio::select! {
            ev = self.valid.recv() => match ev {
                Some(ev) => OutcomeEvent::Valid(ev),
                None => OutcomeEvent::Closed,
            },
            iev = self.invalid.recv() => match iev {
                Some(iev) => OutcomeEvent::Invalid(iev),
                None => OutcomeEvent::Closed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValidationRequest;

    fn outcome(request_id: &str, verdict: Verdict) -> ValidationOutcome {
        let request = ValidationRequest::new(request_id, "A", "advisor", "compliance");
        ValidationOutcome::from_request(&request, verdict)
    }

    #[tokio::test]
    async fn test_success_routes_to_valid() {
        let (tx, mut rx) = outcome_channels(4);
        tx.deliver(outcome("r1", Verdict::Success)).await.unwrap();

        match rx.next().await {
            OutcomeEvent::Valid(ev) => assert_eq!(ev.request_id, "r1"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_routes_to_invalid() {
        let (tx, mut rx) = outcome_channels(4);
        tx.deliver(outcome("r2", Verdict::Failure)).await.unwrap();

        match rx.next().await {
            OutcomeEvent::Invalid(ev) => assert_eq!(ev.request_id, "r2"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_other_verdict_is_unroutable() {
        let (tx, _rx) = outcome_channels(4);
        let result = tx
            .deliver(outcome("r3", Verdict::Other("handoff".to_string())))
            .await;

        assert_eq!(result, Err(DeliveryError::Unroutable("handoff".to_string())));
    }

    #[tokio::test]
    async fn test_dropping_senders_closes() {
        let (tx, mut rx) = outcome_channels(4);
        drop(tx);

        assert_eq!(rx.next().await, OutcomeEvent::Closed);
    }

    #[tokio::test]
    async fn test_deliver_after_receiver_dropped() {
        let (tx, rx) = outcome_channels(4);
        drop(rx);

        let result = tx.deliver(outcome("r1", Verdict::Success)).await;
        assert_eq!(result, Err(DeliveryError::ChannelClosed));
    }

    #[tokio::test]
    async fn test_full_channel_blocks_producer() {
        let (tx, mut rx) = outcome_channels(1);
        tx.deliver(outcome("r1", Verdict::Success)).await.unwrap();

        let blocked = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            tx.deliver(outcome("r2", Verdict::Success)),
        )
        .await;
        assert!(blocked.is_err(), "second delivery should wait for capacity");

        assert!(matches!(rx.next().await, OutcomeEvent::Valid(_)));
        tx.deliver(outcome("r2", Verdict::Success)).await.unwrap();
    }

    #[tokio::test]
    async fn test_next_is_cancel_safe() {
        use tokio_test::{assert_pending, assert_ready_eq, task};

        let (tx, mut rx) = outcome_channels(4);

        {
            let mut waiting = task::spawn(rx.next());
            assert_pending!(waiting.poll());
        }

        tx.deliver(outcome("r1", Verdict::Failure)).await.unwrap();

        let mut next = task::spawn(rx.next());
        assert_ready_eq!(
            next.poll(),
            OutcomeEvent::Invalid(outcome("r1", Verdict::Failure))
        );
    }
}
