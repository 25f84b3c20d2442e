//! wizmote firmware entry point (nRF52840).
//!
//! Two tasks share the single core:
//!
//! - **main**: latches the power rail, classifies button gestures and
//!   signals a fresh frame for every one of them.
//! - **broadcast_task**: replays the latest frame across all channels and
//!   rounds, then cuts the power rail.
//!
//! The first gesture is read before the radio comes up; it is the press
//! that switched the remote on.

#![no_std]
#![no_main]

mod radio;
mod storage;
mod system;

use defmt::{info, unwrap, warn};
use defmt_rtt as _;
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_nrf::config::{Config, HfclkSource};
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::radio::ieee802154;
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Delay;
use panic_probe as _;

use wizmote::broadcast::{Broadcaster, FrameSource, ReplayConfig};
use wizmote::input::shift_register::ShiftRegister;
use wizmote::power::RegulatorSwitch;
use wizmote::remote::Remote;
use wizmote::Frame;

use crate::radio::LinkRadio;
use crate::storage::FlashCounterStore;
use crate::system::UptimeClock;

bind_interrupts!(struct Irqs {
    RADIO => embassy_nrf::radio::InterruptHandler<peripherals::RADIO>;
});

/// Latest classified frame; a newer one replaces an unread older one.
static FRAMES: Signal<CriticalSectionRawMutex, Frame> = Signal::new();

struct PendingFrames(&'static Signal<CriticalSectionRawMutex, Frame>);

impl FrameSource for PendingFrames {
    async fn next_frame(&mut self) -> Frame {
        self.0.wait().await
    }

    fn try_next_frame(&mut self) -> Option<Frame> {
        self.0.try_take()
    }
}

#[embassy_executor::task]
async fn broadcast_task(
    radio: LinkRadio<'static, peripherals::RADIO>,
    power: RegulatorSwitch<Output<'static>>,
) -> ! {
    let mut broadcaster = Broadcaster::new(radio, power, Delay, ReplayConfig::default());
    let mut frames = PendingFrames(&FRAMES);

    loop {
        match broadcaster.run(&mut frames).await {
            Ok(never) => match never {},
            Err(e) if e.is_fatal() => system::restart_after(e).await,
            Err(e) => warn!("Replay abandoned: {}", e),
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // The radio needs the external HF crystal; HFINT drifts off-channel.
    let mut config = Config::default();
    config.hfclk_source = HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(config);
    info!("wizmote {} starting", env!("CARGO_PKG_VERSION"));

    // Hold the regulator before the waking button is released.
    let power = RegulatorSwitch::hold(Output::new(p.P0_12, Level::High, OutputDrive::Standard));

    let mut buttons = ShiftRegister::new(
        Output::new(p.P0_13, Level::High, OutputDrive::Standard),
        Output::new(p.P0_04, Level::High, OutputDrive::Standard),
        Input::new(p.P0_05, Pull::None),
        Input::new(p.P0_14, Pull::Up),
        Delay,
    );
    let flash = BlockingAsync::new(Nvmc::new(p.NVMC));
    let mut remote = Remote::new(FlashCounterStore::new(flash));
    let clock = UptimeClock;

    let first = remote.next_frame(&mut buttons, &clock, &mut Delay).await;

    let radio = LinkRadio::new(ieee802154::Radio::new(p.RADIO, Irqs));
    unwrap!(spawner.spawn(broadcast_task(radio, power)));
    FRAMES.signal(first);

    match remote
        .run(&mut buttons, &clock, &mut Delay, |frame| FRAMES.signal(frame))
        .await
    {}
}
