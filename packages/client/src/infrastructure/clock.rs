use tokio::time::Instant;

use crate::domain::Clock;

/// Clock backed by the tokio runtime's monotonic time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
