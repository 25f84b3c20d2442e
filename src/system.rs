//! Fatal fault handling and the platform clock.
//!
//! No error is retried in place.  A fatal error is reported and the MCU
//! is reset, which rebuilds all volatile state; the flash counter
//! survives.

use cortex_m::peripheral::SCB;
use defmt::error;
use embassy_time::{Instant, Timer};
use wizmote::config::RESTART_DELAY_MS;
use wizmote::input::Clock;
use wizmote::Error;

/// Report `err` and reset after `RESTART_DELAY_MS`.
pub async fn restart_after(err: Error) -> ! {
    error!("========================");
    error!("  An unexpected error occurred.");
    error!("  message: {}", err.message());
    error!("  detail: {}", err);
    error!("========================");
    error!("System will restart in {} seconds...", RESTART_DELAY_MS / 1000);

    Timer::after_millis(RESTART_DELAY_MS).await;
    SCB::sys_reset();
}

/// Milliseconds since boot from the Embassy time driver.
pub struct UptimeClock;

impl Clock for UptimeClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
