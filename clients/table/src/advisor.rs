use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hilo_blackjack::{counted_move, AdvisoryRequest};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Shown in place of a suggestion whenever the advisor fails.
pub const UNAVAILABLE: &str = "suggestion unavailable";
pub const THINKING: &str = "thinking...";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvisorError {
    #[error("advisor unavailable: {0}")]
    Unavailable(String),
    #[error("advisor timed out")]
    TimedOut,
}

/// Something that can suggest the player's next move.
pub trait Advisor {
    fn suggest(
        &self,
        request: &AdvisoryRequest,
    ) -> impl Future<Output = Result<String, AdvisorError>> + Send;
}

/// Answers with Hi-Lo adjusted basic strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStrategyAdvisor;

impl Advisor for BasicStrategyAdvisor {
    async fn suggest(&self, request: &AdvisoryRequest) -> Result<String, AdvisorError> {
        let choice = counted_move(
            request.player_value,
            request.dealer_up_card,
            request.true_count,
        );
        Ok(choice.label().to_string())
    }
}

/// Call the advisor, giving up after `limit`.
pub async fn consult<A: Advisor>(
    advisor: &A,
    request: &AdvisoryRequest,
    limit: Duration,
) -> Result<String, AdvisorError> {
    tokio::time::timeout(limit, advisor.suggest(request))
        .await
        .map_err(|_| AdvisorError::TimedOut)?
}

/// Advisor text tagged with the request generation that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub generation: u64,
    pub text: String,
}

/// Runs the advisor only once the hand has been quiet for `delay`.
///
/// Every `schedule` aborts the pending call and bumps the generation, so a
/// suggestion that arrives late is recognisably stale.
pub struct Debouncer<A> {
    advisor: Arc<A>,
    delay: Duration,
    limit: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<Suggestion>,
}

impl<A> Debouncer<A>
where
    A: Advisor + Send + Sync + 'static,
{
    pub fn new(
        advisor: A,
        delay: Duration,
        limit: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Suggestion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                advisor: Arc::new(advisor),
                delay,
                limit,
                generation: 0,
                pending: None,
                tx,
            },
            rx,
        )
    }

    pub fn schedule(&mut self, request: AdvisoryRequest) -> u64 {
        self.abort_pending();
        self.generation += 1;

        let generation = self.generation;
        let advisor = Arc::clone(&self.advisor);
        let tx = self.tx.clone();
        let delay = self.delay;
        let limit = self.limit;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let text = consult(advisor.as_ref(), &request, limit)
                .await
                .unwrap_or_else(|e| {
                    log::warn!("{e}");
                    UNAVAILABLE.to_string()
                });
            log::debug!("Advisor answered {text:?} for request {generation}");
            // Receiver gone means the client is shutting down
            let _ = tx.send(Suggestion { generation, text });
        }));
        generation
    }

    /// Drop any pending call and invalidate results already in flight.
    pub fn cancel(&mut self) {
        self.abort_pending();
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, suggestion: &Suggestion) -> bool {
        suggestion.generation == self.generation
    }

    fn abort_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilo_blackjack::{HandValue, Rank};

    const DELAY: Duration = Duration::from_millis(750);
    const LIMIT: Duration = Duration::from_secs(2);

    fn request(total: u8, up: Rank) -> AdvisoryRequest {
        AdvisoryRequest {
            player_ranks: vec![Rank::Ten, Rank::Six],
            player_value: HandValue { total, soft: false },
            dealer_up_card: up,
            true_count: 0.0,
        }
    }

    struct Failing;

    impl Advisor for Failing {
        async fn suggest(&self, _request: &AdvisoryRequest) -> Result<String, AdvisorError> {
            Err(AdvisorError::Unavailable("no backend".to_string()))
        }
    }

    struct Slow;

    impl Advisor for Slow {
        async fn suggest(&self, _request: &AdvisoryRequest) -> Result<String, AdvisorError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("Hit".to_string())
        }
    }

    #[tokio::test]
    async fn test_basic_strategy_advisor() {
        let advisor = BasicStrategyAdvisor;
        assert_eq!(advisor.suggest(&request(16, Rank::Nine)).await.unwrap(), "Hit");
        assert_eq!(advisor.suggest(&request(16, Rank::Six)).await.unwrap(), "Stand");
    }

    #[tokio::test(start_paused = true)]
    async fn test_suggestion_arrives_after_quiet_period() {
        let (mut debouncer, mut rx) = Debouncer::new(BasicStrategyAdvisor, DELAY, LIMIT);
        let start = tokio::time::Instant::now();
        let generation = debouncer.schedule(request(12, Rank::Five));

        let suggestion = rx.recv().await.unwrap();
        assert!(start.elapsed() >= DELAY);
        assert_eq!(suggestion.generation, generation);
        assert_eq!(suggestion.text, "Stand");
        assert!(debouncer.is_current(&suggestion));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_pending_call() {
        let (mut debouncer, mut rx) = Debouncer::new(BasicStrategyAdvisor, DELAY, LIMIT);
        debouncer.schedule(request(12, Rank::Five));
        tokio::time::sleep(Duration::from_millis(300)).await;
        let latest = debouncer.schedule(request(16, Rank::Ace));

        let suggestion = rx.recv().await.unwrap();
        assert_eq!(suggestion.generation, latest);
        assert_eq!(suggestion.text, "Hit");

        tokio::time::sleep(DELAY * 4).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_delivery() {
        let (mut debouncer, mut rx) = Debouncer::new(BasicStrategyAdvisor, DELAY, LIMIT);
        debouncer.schedule(request(12, Rank::Five));
        debouncer.cancel();

        tokio::time::sleep(DELAY * 4).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_marks_delivered_result_stale() {
        let (mut debouncer, mut rx) = Debouncer::new(BasicStrategyAdvisor, DELAY, LIMIT);
        debouncer.schedule(request(12, Rank::Five));
        let suggestion = rx.recv().await.unwrap();
        debouncer.cancel();
        assert!(!debouncer.is_current(&suggestion));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_advisor_shows_placeholder() {
        let (mut debouncer, mut rx) = Debouncer::new(Failing, DELAY, LIMIT);
        debouncer.schedule(request(12, Rank::Five));
        assert_eq!(rx.recv().await.unwrap().text, UNAVAILABLE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_advisor_times_out() {
        assert_eq!(
            consult(&Slow, &request(12, Rank::Five), LIMIT).await,
            Err(AdvisorError::TimedOut)
        );

        let (mut debouncer, mut rx) = Debouncer::new(Slow, DELAY, LIMIT);
        let start = tokio::time::Instant::now();
        debouncer.schedule(request(12, Rank::Five));
        assert_eq!(rx.recv().await.unwrap().text, UNAVAILABLE);
        assert!(start.elapsed() < Duration::from_secs(60));
    }
}
