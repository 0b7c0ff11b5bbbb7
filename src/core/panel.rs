// Buzzer, indicator LEDs and vibration motor.

use super::alerts::model::LedStates;

/// Output side of the alert hardware other than the haptic controller.
/// Every call is a short synchronous write.
pub trait Panel {
    /// Play a continuous tone, or silence the buzzer with None
    fn set_tone(&mut self, tone: Option<u32>);
    fn set_leds(&mut self, leds: LedStates);
    fn set_vibrator(&mut self, on: bool);
}

impl<P: Panel + ?Sized> Panel for Box<P> {
    fn set_tone(&mut self, tone: Option<u32>) {
        (**self).set_tone(tone);
    }

    fn set_leds(&mut self, leds: LedStates) {
        (**self).set_leds(leds);
    }

    fn set_vibrator(&mut self, on: bool) {
        (**self).set_vibrator(on);
    }
}

/// Host stand-in that reports every change through the log
#[derive(Debug, Default)]
pub struct LogPanel;

impl Panel for LogPanel {
    fn set_tone(&mut self, tone: Option<u32>) {
        match tone {
            Some(hz) => log::debug!("buzzer: {} Hz", hz),
            None => log::debug!("buzzer: off"),
        }
    }

    fn set_leds(&mut self, leds: LedStates) {
        log::debug!(
            "leds: green={} yellow={} red={}",
            leds.green,
            leds.yellow,
            leds.red
        );
    }

    fn set_vibrator(&mut self, on: bool) {
        log::debug!("vibrator: {}", if on { "on" } else { "off" });
    }
}

#[cfg(test)]
/// In-memory panel keeping the current state and the sequence of tones written
#[derive(Debug, Default)]
pub struct RecordingPanel {
    pub tone: Option<u32>,
    pub leds: LedStates,
    pub vibrator: bool,
    pub tone_writes: Vec<Option<u32>>,
    pub led_writes: usize,
}

#[cfg(test)]
impl RecordingPanel {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Panel for RecordingPanel {
    fn set_tone(&mut self, tone: Option<u32>) {
        self.tone = tone;
        self.tone_writes.push(tone);
    }

    fn set_leds(&mut self, leds: LedStates) {
        self.leds = leds;
        self.led_writes += 1;
    }

    fn set_vibrator(&mut self, on: bool) {
        self.vibrator = on;
    }
}

/// Plays the buzzer tone on the default audio output. LEDs and the vibrator
/// are reported through the log.
#[cfg(feature = "audio")]
pub struct AudioPanel {
    // Dropping the stream stops playback, keep it alive alongside the sink
    _stream: rodio::OutputStream,
    sink: rodio::Sink,
    rest: LogPanel,
}

#[cfg(feature = "audio")]
impl AudioPanel {
    pub fn open() -> Result<Self, rodio::StreamError> {
        let stream = rodio::OutputStreamBuilder::open_default_stream()?;
        let sink = rodio::Sink::connect_new(stream.mixer());
        Ok(Self {
            _stream: stream,
            sink,
            rest: LogPanel,
        })
    }
}

#[cfg(feature = "audio")]
impl Panel for AudioPanel {
    fn set_tone(&mut self, tone: Option<u32>) {
        self.sink.clear();
        if let Some(hz) = tone {
            use rodio::Source;
            let wave = rodio::source::SineWave::new(hz as f32).amplify(0.2);
            self.sink.append(wave);
            self.sink.play();
        }
    }

    fn set_leds(&mut self, leds: LedStates) {
        self.rest.set_leds(leds);
    }

    fn set_vibrator(&mut self, on: bool) {
        self.rest.set_vibrator(on);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_panel_tracks_writes() {
        let mut panel = RecordingPanel::new();
        panel.set_tone(Some(2500));
        panel.set_tone(None);
        panel.set_leds(LedStates {
            yellow: true,
            ..LedStates::OFF
        });
        panel.set_vibrator(true);

        assert_eq!(panel.tone, None);
        assert_eq!(panel.tone_writes, vec![Some(2500), None]);
        assert!(panel.leds.yellow);
        assert_eq!(panel.led_writes, 1);
        assert!(panel.vibrator);
    }

    #[test]
    fn test_boxed_panel_forwards() {
        let mut boxed: Box<dyn Panel> = Box::new(LogPanel);
        boxed.set_tone(Some(4000));
        boxed.set_leds(LedStates::OFF);
        boxed.set_vibrator(false);
    }
}
