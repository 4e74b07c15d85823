use std::cell::Cell;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use log::warn;

/// Host-side beep collaborator: one 440 Hz output stream, built once
/// and played or paused as the machine's sound timer goes nonzero or
/// back to zero.
pub struct Beeper {
    stream: cpal::Stream,
    playing: Cell<bool>,
}

impl Beeper {
    /// Open the default output device and build a paused tone stream.
    /// Returns `None` (with a warning) when there is no usable audio
    /// output; the emulator just runs silent.
    pub fn new() -> Option<Self> {
        let host = cpal::default_host();
        let device = match host.default_output_device() {
            Some(device) => device,
            None => {
                warn!("no audio output device, running silent");
                return None;
            }
        };
        let supported = match device.supported_output_configs() {
            Ok(mut configs) => configs.next()?.with_max_sample_rate(),
            Err(e) => {
                warn!("could not query audio configs, running silent: {e}");
                return None;
            }
        };
        let sample_format = supported.sample_format();
        let config = supported.into();

        let stream = match sample_format {
            cpal::SampleFormat::I8 => Self::build::<i8>(&device, &config),
            cpal::SampleFormat::I16 => Self::build::<i16>(&device, &config),
            cpal::SampleFormat::I32 => Self::build::<i32>(&device, &config),
            cpal::SampleFormat::I64 => Self::build::<i64>(&device, &config),
            cpal::SampleFormat::U8 => Self::build::<u8>(&device, &config),
            cpal::SampleFormat::U16 => Self::build::<u16>(&device, &config),
            cpal::SampleFormat::U32 => Self::build::<u32>(&device, &config),
            cpal::SampleFormat::U64 => Self::build::<u64>(&device, &config),
            cpal::SampleFormat::F32 => Self::build::<f32>(&device, &config),
            cpal::SampleFormat::F64 => Self::build::<f64>(&device, &config),
            other => {
                warn!("unsupported sample format '{other}', running silent");
                return None;
            }
        };

        match stream {
            Ok(stream) => {
                if let Err(e) = stream.pause() {
                    warn!("could not pause audio stream: {e}");
                }
                Some(Self {
                    stream,
                    playing: Cell::new(false),
                })
            }
            Err(e) => {
                warn!("could not build audio stream, running silent: {e}");
                None
            }
        }
    }

    fn build<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
    ) -> Result<cpal::Stream, cpal::BuildStreamError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;

        let mut sample_clock = 0f32;
        let mut next_value = move || {
            sample_clock = (sample_clock + 1.0) % sample_rate;
            (sample_clock * 440.0 * 2.0 * std::f32::consts::PI / sample_rate).sin()
        };

        device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let value: T = T::from_sample(next_value());
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }
            },
            |err| warn!("audio stream error: {err}"),
            None,
        )
    }

    /// Follow the sound timer: audible exactly while it is nonzero.
    pub fn set_active(&self, on: bool) {
        if on == self.playing.get() {
            return;
        }
        let result: Result<(), Box<dyn std::error::Error>> = if on {
            self.stream.play().map_err(Into::into)
        } else {
            self.stream.pause().map_err(Into::into)
        };
        match result {
            Ok(()) => self.playing.set(on),
            Err(e) => warn!("audio state change failed: {e}"),
        }
    }
}
