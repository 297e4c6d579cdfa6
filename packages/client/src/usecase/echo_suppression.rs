//! Time-window echo suppression for host playback broadcasts.
//!
//! After the host sends a playback action the coordination service usually
//! reflects it back within a short window. Inbound actions arriving inside
//! the window are dropped. This is a time heuristic: an echo slower than the
//! window is applied once more.

use std::{sync::Arc, time::Duration};

use tokio::time::Instant;

use crate::domain::Clock;

/// Default suppression window after an outbound action
pub const DEFAULT_ECHO_WINDOW: Duration = Duration::from_millis(100);

pub struct EchoSuppressor {
    clock: Arc<dyn Clock>,
    window: Duration,
    /// Inbound actions are dropped until this instant
    suppressed_until: Option<Instant>,
}

impl EchoSuppressor {
    pub fn new(clock: Arc<dyn Clock>, window: Duration) -> Self {
        Self {
            clock,
            window,
            suppressed_until: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Raise the flag; it clears by itself once the window has elapsed.
    ///
    /// A later call restarts the window from its own send time.
    pub fn mark_outbound_sent(&mut self) {
        self.suppressed_until = Some(self.clock.now() + self.window);
    }

    /// Whether an inbound action arriving now should reach the player
    pub fn should_apply_inbound_action(&self) -> bool {
        match self.suppressed_until {
            Some(until) => self.clock.now() >= until,
            None => true,
        }
    }

    /// Drop any pending window
    pub fn reset(&mut self) {
        self.suppressed_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::ManualClock;

    fn suppressor() -> (Arc<ManualClock>, EchoSuppressor) {
        let clock = Arc::new(ManualClock::new());
        let suppressor = EchoSuppressor::new(clock.clone(), DEFAULT_ECHO_WINDOW);
        (clock, suppressor)
    }

    #[test]
    fn test_applies_when_nothing_was_sent() {
        // テスト項目: 送信していなければ受信アクションは常に適用される
        let (_clock, suppressor) = suppressor();
        assert!(suppressor.should_apply_inbound_action());
    }

    #[test]
    fn test_echo_inside_window_is_dropped_and_later_action_applied() {
        // テスト項目: t=0 で送信、t=50ms の受信は抑制、t=150ms の受信は適用
        // given (前提条件):
        let (clock, mut suppressor) = suppressor();

        // when (操作):
        suppressor.mark_outbound_sent();
        clock.advance(Duration::from_millis(50));
        let at_50 = suppressor.should_apply_inbound_action();
        clock.advance(Duration::from_millis(100));
        let at_150 = suppressor.should_apply_inbound_action();

        // then (期待する結果):
        assert!(!at_50);
        assert!(at_150);
    }

    #[test]
    fn test_window_boundary_clears_flag() {
        // テスト項目: ちょうど 100ms 経過した時点でフラグは解除されている
        let (clock, mut suppressor) = suppressor();
        suppressor.mark_outbound_sent();
        clock.advance(Duration::from_millis(99));
        assert!(!suppressor.should_apply_inbound_action());
        clock.advance(Duration::from_millis(1));
        assert!(suppressor.should_apply_inbound_action());
    }

    #[test]
    fn test_second_send_restarts_window() {
        // テスト項目: 連続送信するとウィンドウは最後の送信から数え直される
        // given (前提条件):
        let (clock, mut suppressor) = suppressor();
        suppressor.mark_outbound_sent();
        clock.advance(Duration::from_millis(80));

        // when (操作):
        suppressor.mark_outbound_sent();
        clock.advance(Duration::from_millis(50)); // 初回から 130ms、2 回目から 50ms

        // then (期待する結果):
        assert!(!suppressor.should_apply_inbound_action());
    }

    #[test]
    fn test_reset_clears_pending_window() {
        // テスト項目: reset するとウィンドウ内でも適用される
        let (_clock, mut suppressor) = suppressor();
        suppressor.mark_outbound_sent();
        suppressor.reset();
        assert!(suppressor.should_apply_inbound_action());
    }
}
