/*
 * Display sink adapter
 *
 * Translates what the controller wants to show (current phase, seconds
 * left, a short message) into two-line text frames for the display. The
 * display is cosmetic: a failed write is logged and dropped, it never
 * holds up the light cycle.
 */

use core::fmt::Write;

use heapless::String;

use crate::fmt::log_failure;
use crate::trafficlight::Phase;

/// Characters per line on the 128 px wide OLED with the 6 px terminal font.
pub const FRAME_COLUMNS: usize = 21;

/// Message shown when a pedestrian request is accepted.
pub const REQUEST_RECEIVED: &str = "Pedido recebido";

/// What the controller asks the display task to show.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayCommand {
    Phase(Phase),
    Countdown(u32),
    Message(&'static str),
}

/// A full screen of text. The header goes on the first row, the value on
/// the row below.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub header: String<FRAME_COLUMNS>,
    pub value: String<FRAME_COLUMNS>,
}

impl Frame {
    fn new(header: &str) -> Self {
        let mut frame = Frame::default();
        push_truncated(&mut frame.header, header);
        frame
    }
}

fn push_truncated(line: &mut String<FRAME_COLUMNS>, text: &str) {
    for c in text.chars() {
        if line.push(c).is_err() {
            break;
        }
    }
}

/// Trait for the physical display
///
/// Implementations draw a whole frame, replacing what was shown before.
#[allow(async_fn_in_trait)]
pub trait DisplaySink {
    type Error: core::fmt::Debug;

    async fn draw(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

pub struct DisplayAdapter<S: DisplaySink> {
    sink: S,
}

impl<S: DisplaySink> DisplayAdapter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub async fn show_phase(&mut self, name: &str) {
        let mut frame = Frame::new("Sinal:");
        push_truncated(&mut frame.value, name);
        self.draw(&frame).await;
    }

    pub async fn show_countdown(&mut self, seconds: u32) {
        let mut frame = Frame::new("Tempo restante:");
        // Two digits always fit in a line.
        let _ = write!(frame.value, "{:02}", seconds);
        self.draw(&frame).await;
    }

    pub async fn show_message(&mut self, text: &str) {
        self.draw(&Frame::new(text)).await;
    }

    pub async fn render(&mut self, command: DisplayCommand) {
        match command {
            DisplayCommand::Phase(phase) => self.show_phase(phase.name()).await,
            DisplayCommand::Countdown(seconds) => self.show_countdown(seconds).await,
            DisplayCommand::Message(text) => self.show_message(text).await,
        }
    }

    async fn draw(&mut self, frame: &Frame) {
        if let Err(e) = self.sink.draw(frame).await {
            log_failure("display write", &e);
        }
    }
}
