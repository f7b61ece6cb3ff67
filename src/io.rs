/*
 * The I/O module for the crossing.
 *
 * This module implements the task that owns the lamp outputs and the two
 * pedestrian buttons. Together with `oled` and `buzzer` it is the only part of
 * the program that is device-specific.
 *
 * The buttons stand in for the interrupt handler: the task wakes on each
 * falling edge, runs the debouncer (which nothing else touches), raises the
 * crossing request and leaves the button id in a single-slot mailbox. All
 * feedback to the pedestrian is given by the controller loop, never here.
 */

use embassy_futures::select::{Either3, select3};
use embassy_stm32::{
    exti::ExtiInput,
    gpio::{Level, Output, Pull, Speed},
    peripherals::{EXTI10, EXTI11, PB10, PB12, PB14, PE10, PE11},
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Receiver, signal::Signal};
use embassy_time::Instant;

use crossing::{ButtonId, Debouncer, Edge, Rag, Shared};
use defmt::{debug, info};

pub const CHANNEL_CAPACITY: usize = 4;

pub type LampPins = (PB10, PB12, PB14);
pub type ButtonPins = (PE11, EXTI11, PE10, EXTI10);

#[embassy_executor::task]
pub async fn io_task(
    lamp_pins: LampPins,
    button_pins: ButtonPins,
    mut debouncer: Debouncer,
    rags: Receiver<'static, ThreadModeRawMutex, Rag, CHANNEL_CAPACITY>,
    presses: &'static Signal<ThreadModeRawMutex, ButtonId>,
    shared: &'static Shared,
) -> ! {
    let mut outputs: [Output; 3] = [
        Output::new(lamp_pins.0, Level::High, Speed::Low),
        Output::new(lamp_pins.1, Level::Low, Speed::Low),
        Output::new(lamp_pins.2, Level::Low, Speed::Low),
    ];

    let mut button_a = ExtiInput::new(button_pins.0, button_pins.1, Pull::Up);
    let mut button_b = ExtiInput::new(button_pins.2, button_pins.3, Pull::Up);

    loop {
        let (button, raw_level) = match select3(
            rags.receive(),
            button_a.wait_for_falling_edge(),
            button_b.wait_for_falling_edge(),
        )
        .await
        {
            Either3::First(rag) => {
                light(&mut outputs, &rag);
                continue;
            }
            Either3::Second(_) => (ButtonId::A, button_a.is_high()),
            Either3::Third(_) => (ButtonId::B, button_b.is_high()),
        };

        match debouncer.on_edge(button, raw_level, Instant::now()) {
            Some(Edge::Pressed) => {
                if !shared.crossing.raise() {
                    info!("button {}: request already pending", button);
                }
                presses.signal(button);
            }
            Some(Edge::Released) => debug!("button {} released", button),
            None => {}
        }
    }
}

fn light(outputs: &mut [Output; 3], rag: &Rag) {
    outputs[0].set_level(if rag.red { Level::High } else { Level::Low });
    outputs[1].set_level(if rag.amber { Level::High } else { Level::Low });
    outputs[2].set_level(if rag.green { Level::High } else { Level::Low });
}
