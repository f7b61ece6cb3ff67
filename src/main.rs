#![no_std]
#![no_main]

// https://dev.to/theembeddedrustacean/embedded-rust-embassy-gpio-button-controlled-blinking-3ee6
// https://www.youtube.com/watch?v=dab_vzVDr_M

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel, signal::Signal};
use embassy_time::Ticker;
use {defmt_rtt as _, panic_probe as _};

mod buzzer;
mod io;
mod oled;

use crossing::countdown::TICK_PERIOD;
use crossing::{
    ButtonId, Config, Controller, Debouncer, DisplayCommand, Effect, Effects, Rag, Shared,
    ToneCommand,
};
use io::CHANNEL_CAPACITY;

static CONFIG: Config = Config::new();
static SHARED: Shared = Shared::new();

static RAGS: Channel<ThreadModeRawMutex, Rag, CHANNEL_CAPACITY> = Channel::new();
static DISPLAY: Channel<ThreadModeRawMutex, DisplayCommand, CHANNEL_CAPACITY> = Channel::new();
static TONE: Channel<ThreadModeRawMutex, ToneCommand, CHANNEL_CAPACITY> = Channel::new();

// Single-slot mailboxes: a newer value replaces one that was not picked up.
static PRESSES: Signal<ThreadModeRawMutex, ButtonId> = Signal::new();
static TICKS: Signal<ThreadModeRawMutex, ()> = Signal::new();

// The countdown runs for the whole life of the program, whatever phase the
// light is in. After updating the display it wakes the controller.
#[embassy_executor::task]
async fn tick_task() -> ! {
    let mut ticker = Ticker::every(TICK_PERIOD);
    loop {
        ticker.next().await;

        if let Some(seconds) = SHARED.remaining.tick() {
            info!("Tempo restante: {} segundos", seconds);
            if DISPLAY.try_send(DisplayCommand::Countdown(seconds)).is_err() {
                warn!("display busy, countdown refresh dropped");
            }
        }
        TICKS.signal(());
    }
}

// Hand the effects to the tasks that own the hardware. Never wait here: a
// full queue means a dropped update, not a late light.
fn dispatch(effects: Effects) {
    for effect in effects {
        let sent = match effect {
            Effect::Display(command) => DISPLAY.try_send(command).is_ok(),
            Effect::Tone(command) => TONE.try_send(command).is_ok(),
            Effect::Lamps(rag) => RAGS.try_send(rag).is_ok(),
        };
        if !sent {
            warn!("queue full, {} dropped", effect);
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let peripherals = embassy_stm32::init(Default::default());
    info!("crossing controller starting");

    spawner
        .spawn(io::io_task(
            (peripherals.PB10, peripherals.PB12, peripherals.PB14),
            (
                peripherals.PE11,
                peripherals.EXTI11,
                peripherals.PE10,
                peripherals.EXTI10,
            ),
            Debouncer::new(CONFIG.debounce_window),
            RAGS.receiver(),
            &PRESSES,
            &SHARED,
        ))
        .unwrap();
    spawner
        .spawn(oled::display_task(
            (
                peripherals.I2C1,
                peripherals.PB6,
                peripherals.PB7,
                peripherals.DMA1_CH6,
                peripherals.DMA1_CH7,
            ),
            DISPLAY.receiver(),
        ))
        .unwrap();
    spawner
        .spawn(buzzer::tone_task(
            (peripherals.TIM3, peripherals.PA6),
            CONFIG.tone,
            TONE.receiver(),
            &SHARED,
        ))
        .unwrap();

    let mut controller = Controller::new(&CONFIG, &SHARED);
    dispatch(controller.start());

    spawner.spawn(tick_task()).unwrap();

    loop {
        let effects = match select(TICKS.wait(), PRESSES.wait()).await {
            Either::First(()) => controller.on_tick(),
            Either::Second(button) => controller.on_press(button),
        };
        dispatch(effects);
    }
}
