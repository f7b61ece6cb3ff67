/*
 * The buzzer: a PWM tone on TIM3 channel 1 (PA6), plus the task that owns
 * the tone scheduler. The task sleeps until the scheduler's next alarm or
 * until the controller sends a command, whichever comes first.
 */

use core::convert::Infallible;

use defmt::{debug, info};
use embassy_futures::select::{Either, select};
use embassy_stm32::{
    gpio::OutputType,
    peripherals::{PA6, TIM3},
    time::Hertz,
    timer::simple_pwm::{PwmPin, SimplePwm},
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Receiver};
use embassy_time::{Instant, Timer};

use crossing::{Shared, ToneCommand, ToneGenerator, ToneProfile, ToneScheduler};

use crate::io::CHANNEL_CAPACITY;

pub type BuzzerPins = (TIM3, PA6);

pub struct PwmBuzzer {
    pwm: SimplePwm<'static, TIM3>,
}

impl PwmBuzzer {
    pub fn new(pins: BuzzerPins) -> Self {
        let ch1 = PwmPin::new_ch1(pins.1, OutputType::PushPull);
        let mut pwm = SimplePwm::new(
            pins.0,
            Some(ch1),
            None,
            None,
            None,
            Hertz(4_000),
            Default::default(),
        );
        pwm.ch1().disable();
        Self { pwm }
    }
}

impl ToneGenerator for PwmBuzzer {
    type Error = Infallible;

    fn tone_on(&mut self, frequency_hz: u32) -> Result<(), Self::Error> {
        self.pwm.set_frequency(Hertz(frequency_hz));
        let mut ch1 = self.pwm.ch1();
        ch1.set_duty_cycle_percent(50);
        ch1.enable();
        Ok(())
    }

    fn tone_off(&mut self) -> Result<(), Self::Error> {
        let mut ch1 = self.pwm.ch1();
        ch1.set_duty_cycle_fully_off();
        ch1.disable();
        Ok(())
    }
}

#[embassy_executor::task]
pub async fn tone_task(
    pins: BuzzerPins,
    profile: ToneProfile,
    commands: Receiver<'static, ThreadModeRawMutex, ToneCommand, CHANNEL_CAPACITY>,
    shared: &'static Shared,
) -> ! {
    let mut scheduler = ToneScheduler::new(PwmBuzzer::new(pins), &shared.bip_gate, profile);
    info!("buzzer ready at {} Hz", profile.frequency_hz);

    loop {
        let deadline = scheduler.next_deadline();
        let alarm = async move {
            match deadline {
                Some(deadline) => Timer::at(deadline).await,
                None => core::future::pending().await,
            }
        };

        // Commands are polled first so a queued `Silence` wins over an alarm
        // that is due at the same time.
        let event = select(commands.receive(), alarm).await;
        match event {
            Either::First(command) => {
                debug!("tone command {}", command);
                scheduler.apply(command, Instant::now());
            }
            Either::Second(_) => scheduler.poll(Instant::now()),
        }
    }
}
