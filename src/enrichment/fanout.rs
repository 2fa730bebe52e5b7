//! Per-provider fan-out of one call per location, joined on a settlement count.
//!
//! A [`FanOutJoin`] issues every call of a batch at once and drives them to
//! completion in any order. Each call settles its [`BatchState`] exactly once,
//! whether it succeeded, failed or panicked, and the batch resolves only once
//! the settled count has reached the number of calls issued.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use futures::stream::{FuturesUnordered, StreamExt};
use poi_common::ProviderKind;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::location::ProviderSlot;

use super::error::{EnrichError, ProviderError};
use super::listener::EnrichmentListener;
use super::provider::ProviderClient;

/// One call of a batch: the slot to fill and a label for logging.
pub struct CallTarget<'a, T> {
    pub label: &'a str,
    pub slot: &'a mut ProviderSlot<T>,
}

/// Settlement counter for one provider batch of one pass.
#[derive(Debug)]
pub struct BatchState {
    total: usize,
    settled: AtomicUsize,
    succeeded: AtomicUsize,
    terminal: AtomicBool,
}

impl BatchState {
    /// A batch of `total` calls. An empty batch is terminal from the start.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            settled: AtomicUsize::new(0),
            succeeded: AtomicUsize::new(0),
            terminal: AtomicBool::new(total == 0),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn settled(&self) -> usize {
        self.settled.load(Ordering::Acquire)
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::Acquire)
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.load(Ordering::Acquire)
    }

    /// Record one settled call.
    ///
    /// Returns `true` only for the settlement that completes the batch. The
    /// count never exceeds `total`; an extra settlement is logged and dropped.
    pub fn settle(&self, success: bool) -> bool {
        let total = self.total;
        let prev = match self.settled.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
            (n < total).then_some(n + 1)
        }) {
            Ok(prev) => prev,
            Err(settled) => {
                error!(settled, total, "Settlement beyond batch total ignored");
                return false;
            }
        };

        if success {
            self.succeeded.fetch_add(1, Ordering::AcqRel);
        }

        prev + 1 == total
            && self
                .terminal
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
    }

    fn report(&self, provider: ProviderKind) -> BatchReport {
        let succeeded = self.succeeded();
        BatchReport {
            provider,
            total: self.total,
            succeeded,
            failed: self.settled() - succeeded,
        }
    }
}

/// Settles its batch when dropped, so every exit path of a call counts.
struct SettleGuard<'s> {
    state: &'s BatchState,
    success: bool,
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if self.state.settle(self.success) {
            debug!(total = self.state.total(), "Last call settled");
        }
    }
}

/// Summary of a resolved provider batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub provider: ProviderKind,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Issues one call per target against a single provider and joins on them.
pub struct FanOutJoin<'c, P: ProviderClient + ?Sized> {
    client: &'c P,
    listener: &'c dyn EnrichmentListener,
}

impl<'c, P: ProviderClient + ?Sized> FanOutJoin<'c, P> {
    pub fn new(client: &'c P, listener: &'c dyn EnrichmentListener) -> Self {
        Self { client, listener }
    }

    /// Run every call concurrently and resolve once all of them have settled.
    ///
    /// Call failures are absorbed; the only error is a batch whose counter did
    /// not reach its total, which means a settlement was lost.
    pub async fn run(
        &self,
        targets: Vec<CallTarget<'_, P::Payload>>,
    ) -> Result<BatchReport, EnrichError> {
        let state = BatchState::new(targets.len());
        self.drive(&state, targets).await
    }

    /// Body of [`run`](Self::run) against a caller-owned counter. If this
    /// future is dropped or unwinds, every call still in flight settles as a
    /// failure.
    async fn drive(
        &self,
        state: &BatchState,
        targets: Vec<CallTarget<'_, P::Payload>>,
    ) -> Result<BatchReport, EnrichError> {
        let provider = self.client.kind();

        if state.is_terminal() {
            debug!(provider = %provider, "Empty batch; nothing to fetch");
            return Ok(state.report(provider));
        }

        info!(provider = %provider, calls = state.total(), "Starting provider batch");

        let mut calls: FuturesUnordered<_> = targets
            .into_iter()
            .map(|target| {
                let guard = SettleGuard {
                    state,
                    success: false,
                };
                self.call(guard, target)
            })
            .collect();
        while calls.next().await.is_some() {}

        if !state.is_terminal() {
            return Err(EnrichError::BatchIncomplete {
                provider,
                settled: state.settled(),
                total: state.total(),
            });
        }

        let report = state.report(provider);
        info!(
            provider = %provider,
            succeeded = report.succeeded,
            failed = report.failed,
            "Provider batch resolved"
        );
        Ok(report)
    }

    /// The guard is created before the call future so that a call dropped
    /// before its first poll still settles.
    async fn call(&self, mut guard: SettleGuard<'_>, target: CallTarget<'_, P::Payload>) {
        let provider = self.client.kind();

        match self.client.fetch(&target.slot.key).await {
            Ok(payload) => {
                target.slot.store(payload);
                guard.success = true;
                debug!(provider = %provider, location = target.label, "Provider call succeeded");
            }
            Err(err) => {
                warn!(
                    provider = %provider,
                    location = target.label,
                    key = %target.slot.key,
                    error = %err,
                    "Provider call failed"
                );
                self.listener
                    .report_error(&ProviderError::user_message(provider));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::FutureExt;
    use parking_lot::Mutex;
    use rand::Rng;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::time::Duration;

    use crate::enrichment::provider::ProviderCallResult;

    /// Stub provider: keys starting with "fail" fail, "hang" never finishes and
    /// "panic" panics; everything else echoes the key back. Optional random
    /// latency and in-flight tracking.
    struct StubProvider {
        max_delay_ms: u64,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl StubProvider {
        fn new(max_delay_ms: u64) -> Self {
            Self {
                max_delay_ms,
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                peak_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ProviderClient for StubProvider {
        type Payload = String;

        fn kind(&self) -> ProviderKind {
            ProviderKind::Foursquare
        }

        fn is_available(&self) -> bool {
            true
        }

        async fn fetch(&self, key: &str) -> ProviderCallResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

            if self.max_delay_ms > 0 {
                let delay = rand::thread_rng().gen_range(0..=self.max_delay_ms);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            if key.starts_with("hang") {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            if key.starts_with("panic") {
                panic!("stub provider panicked on {key}");
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if key.starts_with("fail") {
                Err(ProviderError::malformed("stubbed failure"))
            } else {
                Ok(format!("payload:{key}"))
            }
        }
    }

    #[derive(Default)]
    struct RecordingListener {
        errors: Mutex<Vec<String>>,
    }

    impl EnrichmentListener for RecordingListener {
        fn report_error(&self, message: &str) {
            self.errors.lock().push(message.to_string());
        }
    }

    fn slots(keys: &[&str]) -> Vec<ProviderSlot<String>> {
        keys.iter().map(|k| ProviderSlot::pending(*k)).collect()
    }

    fn targets(slots: &mut [ProviderSlot<String>]) -> Vec<CallTarget<'_, String>> {
        slots
            .iter_mut()
            .map(|slot| CallTarget { label: "test", slot })
            .collect()
    }

    #[test]
    fn batch_state_counts_to_total_exactly_once() {
        let state = BatchState::new(3);
        assert!(!state.is_terminal());
        assert!(!state.settle(true));
        assert!(!state.settle(false));
        assert!(state.settle(true));
        assert!(state.is_terminal());
        assert_eq!(state.settled(), 3);
        assert_eq!(state.succeeded(), 2);

        // Extra settlements are refused and never re-resolve the batch.
        assert!(!state.settle(true));
        assert_eq!(state.settled(), 3);
        assert_eq!(state.succeeded(), 2);
    }

    #[test]
    fn empty_batch_state_is_terminal() {
        let state = BatchState::new(0);
        assert!(state.is_terminal());
        assert!(!state.settle(true));
        assert_eq!(state.settled(), 0);
    }

    #[test]
    fn concurrent_settlements_are_not_lost() {
        let state = BatchState::new(1000);
        let completions = AtomicUsize::new(0);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..200 {
                        if state.settle(true) {
                            completions.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                });
            }
        });
        assert_eq!(state.settled(), 1000);
        assert_eq!(state.succeeded(), 1000);
        assert_eq!(completions.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn guard_settles_on_panic() {
        let state = BatchState::new(1);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = SettleGuard {
                state: &state,
                success: false,
            };
            panic!("call blew up");
        }));
        assert!(result.is_err());
        assert!(state.is_terminal());
        assert_eq!(state.succeeded(), 0);
    }

    #[tokio::test]
    async fn empty_batch_issues_no_calls() {
        let provider = StubProvider::new(0);
        let listener = RecordingListener::default();
        let report = FanOutJoin::new(&provider, &listener)
            .run(Vec::new())
            .await
            .unwrap();

        assert_eq!(report.total, 0);
        assert_eq!(report.succeeded + report.failed, 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failures_settle_and_leave_slots_untouched() {
        let provider = StubProvider::new(0);
        let listener = RecordingListener::default();
        let mut slots = slots(&["a", "fail-b", "c"]);

        let report = FanOutJoin::new(&provider, &listener)
            .run(targets(&mut slots))
            .await
            .unwrap();

        assert_eq!(
            report,
            BatchReport {
                provider: ProviderKind::Foursquare,
                total: 3,
                succeeded: 2,
                failed: 1,
            }
        );
        assert_eq!(slots[0].value.as_deref(), Some("payload:a"));
        assert_eq!(slots[1], ProviderSlot::pending("fail-b"));
        assert_eq!(slots[2].value.as_deref(), Some("payload:c"));
        assert_eq!(
            *listener.errors.lock(),
            vec!["Whoops! The Foursquare API isn't loading.".to_string()]
        );
    }

    #[tokio::test]
    async fn cancelled_batch_settles_every_call() {
        let provider = StubProvider::new(0);
        let listener = RecordingListener::default();
        let mut slots = slots(&["a", "hang-b", "fail-c", "hang-d"]);
        let state = BatchState::new(slots.len());

        let join = FanOutJoin::new(&provider, &listener);
        let outcome =
            tokio::time::timeout(Duration::from_millis(50), join.drive(&state, targets(&mut slots)))
                .await;

        assert!(outcome.is_err());
        assert!(state.is_terminal());
        assert_eq!(state.settled(), 4);
        assert_eq!(state.succeeded(), 1);
        assert_eq!(slots[0].value.as_deref(), Some("payload:a"));
        assert!(slots[1].value.is_none());
        assert!(slots[3].value.is_none());
    }

    #[tokio::test]
    async fn panicking_call_still_settles_the_batch() {
        let provider = StubProvider::new(0);
        let listener = RecordingListener::default();
        let mut slots = slots(&["panic-a", "b", "c"]);
        let state = BatchState::new(slots.len());

        let join = FanOutJoin::new(&provider, &listener);
        let outcome = AssertUnwindSafe(join.drive(&state, targets(&mut slots)))
            .catch_unwind()
            .await;

        assert!(outcome.is_err());
        assert!(state.is_terminal());
        assert_eq!(state.settled(), 3);
        assert!(state.succeeded() <= 2);
        assert!(slots[0].value.is_none());
    }

    #[tokio::test]
    async fn hundred_calls_with_random_latency_all_settle() {
        let provider = StubProvider::new(20);
        let listener = RecordingListener::default();
        let keys: Vec<String> = (0..100)
            .map(|i| if i % 7 == 0 { format!("fail-{i}") } else { format!("k{i}") })
            .collect();
        let mut slots: Vec<ProviderSlot<String>> =
            keys.iter().map(|k| ProviderSlot::pending(k.as_str())).collect();

        let report = FanOutJoin::new(&provider, &listener)
            .run(targets(&mut slots))
            .await
            .unwrap();

        let expected_failures = (0..100).filter(|i| i % 7 == 0).count();
        assert_eq!(report.total, 100);
        assert_eq!(report.failed, expected_failures);
        assert_eq!(report.succeeded, 100 - expected_failures);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 100);
        assert!(provider.peak_in_flight.load(Ordering::SeqCst) > 1);
        assert_eq!(listener.errors.lock().len(), expected_failures);

        for slot in &slots {
            if slot.key.starts_with("fail") {
                assert!(slot.value.is_none());
            } else {
                assert_eq!(slot.value, Some(format!("payload:{}", slot.key)));
            }
        }
    }
}
