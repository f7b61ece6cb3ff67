/*
 * The SSD1306 OLED on I2C1, driven in terminal mode.
 *
 *      Display -> STM32
 * (black)  GND -> GND
 * (red)    VCC -> 3V3
 * (yellow) SDA -> PB7
 * (green)  SCL -> PB6
 */

use defmt::{info, warn};
use embassy_stm32::{
    bind_interrupts, i2c,
    i2c::I2c,
    mode::Async,
    peripherals::{self, DMA1_CH6, DMA1_CH7, I2C1, PB6, PB7},
    time::Hertz,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Receiver};
use ssd1306::{I2CDisplayInterface, Ssd1306Async, mode::TerminalModeAsync, prelude::*};

use crossing::{DisplayAdapter, DisplayCommand, DisplaySink, Frame};

use crate::io::CHANNEL_CAPACITY;

pub type I2cPins = (I2C1, PB6, PB7, DMA1_CH6, DMA1_CH7);

bind_interrupts!(struct Irqs {
    I2C1_EV => i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

type Terminal = Ssd1306Async<I2CInterface<I2c<'static, Async>>, DisplaySize128x64, TerminalModeAsync>;

pub struct OledSink {
    display: Terminal,
    ready: bool,
}

impl DisplaySink for OledSink {
    type Error = ssd1306::mode::TerminalModeError;

    async fn draw(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        if !self.ready {
            self.display.init().await?;
            self.ready = true;
        }
        self.display.clear().await?;
        self.display.write_str(frame.header.as_str()).await?;
        self.display.set_position(0, 2).await?;
        self.display.write_str(frame.value.as_str()).await
    }
}

#[embassy_executor::task]
pub async fn display_task(
    p: I2cPins,
    commands: Receiver<'static, ThreadModeRawMutex, DisplayCommand, CHANNEL_CAPACITY>,
) -> ! {
    let i2c = I2c::new(
        p.0,
        p.1,
        p.2,
        Irqs,
        p.3,
        p.4,
        Hertz::khz(400),
        Default::default(),
    );

    let interface: I2CInterface<_> = I2CDisplayInterface::new(i2c);
    let display: Terminal =
        Ssd1306Async::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_terminal_mode();

    let mut sink = OledSink {
        display,
        ready: false,
    };
    match sink.display.init().await {
        Ok(()) => sink.ready = true,
        // Keep going: the next frame retries the init.
        Err(e) => warn!("display init failed: {}", defmt::Debug2Format(&e)),
    }
    info!("display ready");

    let mut adapter = DisplayAdapter::new(sink);
    loop {
        adapter.render(commands.receive().await).await;
    }
}
