#![no_std]
#![no_main]

use defmt::{info, unwrap, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Delay;
use pad_to_procon_rp2040::hostlink::{self, BtHidLink, HostEvent, ScanModeControl};
use pad_to_procon_rp2040::{
    config, identity, ConnectionManager, ConnectionState, LinkStatus, PairingSession, ReplyTable,
    ReportScheduler, SharedPadState, ShiftPad, StatusIndicator,
};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

/// Latest pad state, written by the sampler and drained by the scheduler.
static SHARED: SharedPadState<CriticalSectionRawMutex> = SharedPadState::new();

/// Connected flag, the cooperative stop signal of the scheduler and blinker.
static LINK: LinkStatus = LinkStatus::new();

/// Connection-state wakeups, one per listening task (latest value wins).
static SCHEDULER_WAKEUP: Signal<CriticalSectionRawMutex, ConnectionState> = Signal::new();
static INDICATOR_WAKEUP: Signal<CriticalSectionRawMutex, ConnectionState> = Signal::new();

/// Outbound transport, shared by the scheduler and the pairing handshake.
/// The mutex keeps their writes from interleaving.
static TRANSPORT: Mutex<CriticalSectionRawMutex, BtHidLink> = Mutex::new(BtHidLink);

/// Pairing session (needs the boot-time device address, hence StaticCell).
static PAIRING: StaticCell<PairingSession> = StaticCell::new();

type PadLines = ShiftPad<Output<'static>, Output<'static>, Input<'static>, Delay>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("pad-to-procon starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // Device identity first: the handshake reply table embeds the persisted
    // address, and failing to read it is fatal at boot.
    let mut flash = Flash::<_, _, { identity::FLASH_SIZE }>::new_blocking(p.FLASH);
    let address = unwrap!(identity::load_or_generate(&mut flash));
    info!("device address {:?}", address);

    let pairing: &'static PairingSession =
        PAIRING.init(PairingSession::new(ReplyTable::new(&address)));

    // --- Pad lines ---
    let latch = Output::new(p.PIN_13, Level::Low);
    let clock = Output::new(p.PIN_14, Level::Low);
    let data = Input::new(p.PIN_15, Pull::Up);
    let pad = ShiftPad::new(latch, clock, data, Delay, config::CONTROLLER_TYPE);

    // --- Status LED ---
    let led = Output::new(p.PIN_25, Level::Low);

    unwrap!(spawner.spawn(sampler_task(pad)));
    unwrap!(spawner.spawn(dispatch_task(pairing)));
    unwrap!(spawner.spawn(report_task(pairing)));
    unwrap!(spawner.spawn(indicator_task(led)));

    info!("pad-to-procon up, discoverable as a Pro Controller");
}

/// Sampler task - polls the shift register forever.
#[embassy_executor::task]
async fn sampler_task(pad: PadLines) {
    pad.run(&SHARED).await
}

/// Dispatch task - consumes stack events; the pairing state machine runs
/// here, in the inbound-data context, not as its own task.
#[embassy_executor::task]
async fn dispatch_task(pairing: &'static PairingSession) {
    let listeners = [&SCHEDULER_WAKEUP, &INDICATOR_WAKEUP];
    let mut manager = ConnectionManager::new(&LINK, pairing, ScanModeControl, &listeners);

    loop {
        match hostlink::next_host_event().await {
            HostEvent::Link(event) => manager.on_event(event),
            HostEvent::InterruptData { report_id: _, data } => {
                if let Err(e) = pairing.handle_inbound(&data, &TRANSPORT).await {
                    warn!("handshake reply failed: {:?}", e);
                }
            }
        }
    }
}

/// Report task - streams idle/full input reports while connected.
#[embassy_executor::task]
async fn report_task(pairing: &'static PairingSession) {
    let mut scheduler = ReportScheduler::new(&SHARED, pairing, &TRANSPORT, Delay);
    scheduler.run(&LINK, &SCHEDULER_WAKEUP).await
}

/// Indicator task - heartbeat while waiting for a host, solid once connected.
#[embassy_executor::task]
async fn indicator_task(led: Output<'static>) {
    let mut indicator = StatusIndicator::new(led, Delay);
    indicator.run(&LINK, &INDICATOR_WAKEUP).await
}
