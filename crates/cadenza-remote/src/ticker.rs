//! Rotating display of the current suggestion list.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use cadenza_core::SuggestionOption;
use cadenza_search::SuggestionCycle;

/// Cycles the displayed suggestion on a fixed period.
///
/// The displayed option is published on a `watch` channel. Each
/// [`restart`](Self::restart) aborts the previous rotation before starting
/// a new one, so at most one rotation task is alive per ticker.
#[derive(Debug)]
pub struct SuggestionTicker {
    period: Duration,
    display: Arc<watch::Sender<Option<SuggestionOption>>>,
    task: Option<JoinHandle<()>>,
}

impl SuggestionTicker {
    pub fn new(period: Duration) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            period,
            display: Arc::new(tx),
            task: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SuggestionOption>> {
        self.display.subscribe()
    }

    /// The option on display right now.
    pub fn current(&self) -> Option<SuggestionOption> {
        self.display.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Display the first of `options` and rotate through them.
    ///
    /// A single option is displayed without rotating. An empty list is the
    /// same as [`stop`](Self::stop).
    pub fn restart(&mut self, options: Vec<SuggestionOption>) {
        self.abort();

        let mut cycle = SuggestionCycle::new(options);
        self.display.send_replace(cycle.current().cloned());

        if cycle.options().len() < 2 {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("No async runtime; suggestion rotation disabled");
            return;
        };

        let display = Arc::clone(&self.display);
        let period = self.period;
        self.task = Some(runtime.spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                display.send_replace(cycle.advance().cloned());
            }
        }));
    }

    /// Stop rotating and clear the display.
    pub fn stop(&mut self) {
        self.abort();
        self.display.send_replace(None);
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for SuggestionTicker {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadenza_core::SuggestionKind;

    const PERIOD: Duration = Duration::from_secs(2);

    fn options(values: &[&str]) -> Vec<SuggestionOption> {
        values
            .iter()
            .map(|v| SuggestionOption::new(*v, SuggestionKind::Artist))
            .collect()
    }

    fn shown(ticker: &SuggestionTicker) -> Option<String> {
        ticker.current().map(|o| o.value)
    }

    /// Let the rotation task run after a clock change.
    async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotates_and_wraps() {
        let mut ticker = SuggestionTicker::new(PERIOD);
        ticker.restart(options(&["a", "b", "c"]));
        assert!(ticker.is_running());
        assert_eq!(shown(&ticker).as_deref(), Some("a"));

        tokio::time::advance(Duration::from_millis(1999)).await;
        settle().await;
        assert_eq!(shown(&ticker).as_deref(), Some("a"));

        for expected in ["b", "c", "a"] {
            tokio::time::advance(Duration::from_millis(1)).await;
            settle().await;
            assert_eq!(shown(&ticker).as_deref(), Some(expected));
            tokio::time::advance(PERIOD - Duration::from_millis(1)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_clears_display() {
        let mut ticker = SuggestionTicker::new(PERIOD);
        let rx = ticker.subscribe();
        ticker.restart(options(&["a", "b"]));
        ticker.stop();
        assert!(!ticker.is_running());
        assert!(rx.borrow().is_none());

        tokio::time::advance(PERIOD * 3).await;
        settle().await;
        assert!(ticker.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_rotation() {
        let mut ticker = SuggestionTicker::new(PERIOD);
        ticker.restart(options(&["a", "b"]));
        tokio::time::advance(Duration::from_secs(1)).await;
        ticker.restart(options(&["x", "y"]));
        assert_eq!(shown(&ticker).as_deref(), Some("x"));

        // The old rotation would have fired at 2s; the new one fires at 3s.
        tokio::time::advance(Duration::from_millis(1500)).await;
        settle().await;
        assert_eq!(shown(&ticker).as_deref(), Some("x"));

        tokio::time::advance(Duration::from_millis(500)).await;
        settle().await;
        assert_eq!(shown(&ticker).as_deref(), Some("y"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_option_is_static() {
        let mut ticker = SuggestionTicker::new(PERIOD);
        ticker.restart(options(&["only"]));
        assert!(!ticker.is_running());
        tokio::time::advance(PERIOD * 2).await;
        assert_eq!(shown(&ticker).as_deref(), Some("only"));
    }

    #[tokio::test]
    async fn test_empty_restart_clears() {
        let mut ticker = SuggestionTicker::new(PERIOD);
        ticker.restart(options(&["a"]));
        ticker.restart(Vec::new());
        assert!(ticker.current().is_none());
        assert!(!ticker.is_running());
    }

    #[test]
    fn test_restart_outside_runtime_shows_first() {
        let mut ticker = SuggestionTicker::new(PERIOD);
        ticker.restart(options(&["a", "b"]));
        assert_eq!(shown(&ticker).as_deref(), Some("a"));
        assert!(!ticker.is_running());
    }
}
