use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use log::{debug, warn};
use thiserror::Error;

use crate::peripherals::Audio;

const TONE_HZ: f32 = 440.0;
const AMPLITUDE: f32 = 0.2;

#[derive(Error, Debug)]
pub enum SoundError {
    #[error("no audio output device available")]
    NoDevice,
    #[error(transparent)]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error(transparent)]
    Build(#[from] cpal::BuildStreamError),
    #[error("unsupported sample format '{0}'")]
    UnsupportedFormat(cpal::SampleFormat),
}

/// Square-ish 440 Hz tone on the default output device, paused while
/// the sound timer is idle.
pub struct Beeper {
    stream: cpal::Stream,
    playing: bool,
}

impl Beeper {
    pub fn new() -> Result<Self, SoundError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(SoundError::NoDevice)?;
        let supported_config = device.default_output_config()?;
        let format = supported_config.sample_format();
        let config: cpal::StreamConfig = supported_config.into();
        debug!(
            "audio output at {} Hz, {} channel(s), {format}",
            config.sample_rate.0, config.channels
        );

        let stream = match format {
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
            sample_format => return Err(SoundError::UnsupportedFormat(sample_format)),
        }?;

        // streams may start playing as soon as they are built
        if let Err(err) = stream.pause() {
            warn!("unable to pause audio stream: {err}");
        }

        Ok(Self {
            stream,
            playing: false,
        })
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
            let phase = (sample_clock * TONE_HZ * 2.0 * std::f32::consts::PI / sample_rate).sin();
            AMPLITUDE * phase.signum()
        };

        let err_fn = |err| warn!("an error occurred on the audio stream: {err}");

        device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                write_data(data, channels, &mut next_value)
            },
            err_fn,
            None,
        )
    }
}

fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
where
    T: Sample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value: T = T::from_sample(next_sample());
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}

impl Audio for Beeper {
    fn set_active(&mut self, active: bool) {
        if active == self.playing {
            return;
        }
        let result = if active {
            self.stream.play().map_err(|err| err.to_string())
        } else {
            self.stream.pause().map_err(|err| err.to_string())
        };
        match result {
            Ok(()) => self.playing = active,
            Err(err) => warn!("unable to toggle buzzer: {err}"),
        }
    }
}
