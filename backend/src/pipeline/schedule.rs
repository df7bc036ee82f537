use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, SeedableRng};

use super::Orchestrator;

/// Extra wait past midnight so the new UTC date is unambiguous
pub const SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Time left until the next UTC midnight
pub fn until_next_day(now: DateTime<Utc>) -> Duration {
    let Some(midnight) = now
        .date_naive()
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return Duration::from_secs(24 * 60 * 60);
    };

    (midnight.and_utc() - now).to_std().unwrap_or(Duration::ZERO)
}

/// Background task running the pipeline once per UTC day
pub async fn daily_generation_task(orchestrator: Arc<Orchestrator>, run_on_start: bool) {
    let mut rng = StdRng::from_os_rng();

    if run_on_start {
        orchestrator.run(Utc::now().date_naive(), &mut rng).await;
    }

    loop {
        let wait = until_next_day(Utc::now()) + SETTLE_DELAY;
        tracing::info!("Next daily game run in {}s", wait.as_secs());
        tokio::time::sleep(wait).await;

        orchestrator.run(Utc::now().date_naive(), &mut rng).await;
    }
}
