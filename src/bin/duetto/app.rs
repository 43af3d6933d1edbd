//! Duetto - audio stream, control queue and the status line

use std::io::{stdout, Write};
use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, queue};
use rtrb::{Producer, RingBuffer};

use duetto_dsp::io::StepLights;
use duetto_dsp::sequencing::notes::NOTE_PITCHES;
use duetto_dsp::sequencing::sequencer::tempo_bpm;
use duetto_dsp::synth::{ControlMessage, ControlState};
use duetto_dsp::{Controls, DuettoVoice, RenderCtx, VoiceConfig, MAX_BLOCK_SIZE, NUM_STEPS};

use super::keys::{KeyAction, Knobs, HELP};

const CONTROL_QUEUE_SIZE: usize = 256;
const STATUS_QUEUE_SIZE: usize = 16;

const NOTE_LABELS: [&str; 10] = ["C3", "Eb3", "F3", "G3", "Bb3", "C4", "Eb4", "F4", "G4", "Bb4"];

/// What the audio thread reports back after each callback.
#[derive(Debug, Clone, Copy)]
struct PanelStatus {
    current_step: usize,
    pitches: [f32; NUM_STEPS],
    lights: StepLights,
}

/// Raw mode for as long as this lives.
struct RawMode;

impl RawMode {
    fn enable() -> EyreResult<Self> {
        terminal::enable_raw_mode().wrap_err("failed to enter raw mode")?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

pub struct Duetto {
    config: VoiceConfig,
    controls: Controls,
}

impl Duetto {
    pub fn new() -> Self {
        Self {
            config: VoiceConfig::default(),
            controls: Controls::default(),
        }
    }

    /// Run until the user quits.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        println!("=== Duetto ===");
        println!("Tempo: {} BPM", tempo_bpm(self.controls.tempo));
        println!("Sample rate: {} Hz", sample_rate);
        println!("Channels: {}", channels);
        println!();
        println!("{HELP}");
        println!();

        let mut voice = DuettoVoice::with_config(self.config).wrap_err("invalid voice config")?;
        let ctx = RenderCtx::new(sample_rate);

        let (mut control_tx, mut control_rx) = RingBuffer::<ControlMessage>::new(CONTROL_QUEUE_SIZE);
        let (mut status_tx, mut status_rx) = RingBuffer::<PanelStatus>::new(STATUS_QUEUE_SIZE);

        let mut state = ControlState::new(self.controls);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

                    if state.drain(&mut control_rx) {
                        voice.reset();
                    }

                    let block = &mut render_buf[..frames_to_render];
                    voice.render_block(&ctx, state.controls(), block);
                    // Presses last exactly one block.
                    state.release_triggers();

                    // Copy to output (mono to all channels)
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        // Output is in volts; scale back to full range for the device.
                        let s = s / voice.config().output_gain;
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames_to_render;
                }

                publish_status(&voice, &mut status_tx);
            },
            |err| log::error!("audio stream error: {err}"),
            None,
        )?;

        stream.play()?;

        let _raw = RawMode::enable()?;
        let mut knobs = Knobs::from_controls(&self.controls);
        let mut latest: Option<PanelStatus> = None;

        loop {
            while let Ok(status) = status_rx.pop() {
                latest = Some(status);
            }
            if let Some(status) = &latest {
                draw_status(status, &knobs)?;
            }

            if !event::poll(Duration::from_millis(16))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match knobs.handle(key) {
                KeyAction::Quit => break,
                KeyAction::Send(message) => {
                    if control_tx.push(message).is_err() {
                        log::warn!("control queue full, dropped {message:?}");
                    }
                }
                KeyAction::Ignore => {}
            }
        }

        print!("\r\n");
        Ok(())
    }
}

impl Default for Duetto {
    fn default() -> Self {
        Self::new()
    }
}

fn publish_status(voice: &DuettoVoice, status_tx: &mut Producer<PanelStatus>) {
    let sequencer = voice.sequencer();
    let mut pitches = [0.0; NUM_STEPS];
    for (pitch, step) in pitches.iter_mut().zip(sequencer.steps()) {
        *pitch = step.pitch;
    }
    // A full queue just means the terminal is behind; skip this frame.
    let _ = status_tx.push(PanelStatus {
        current_step: sequencer.current_step(),
        pitches,
        lights: voice.lights(),
    });
}

fn note_label(pitch: f32) -> &'static str {
    NOTE_PITCHES
        .iter()
        .position(|&p| (p - pitch).abs() < 1e-4)
        .map_or(" · ", |index| NOTE_LABELS[index])
}

fn draw_status(status: &PanelStatus, knobs: &Knobs) -> EyreResult<()> {
    let mut out = stdout();
    queue!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine)
    )?;

    for (step, (&pitch, light)) in status.pitches.iter().zip(&status.lights).enumerate() {
        let [r, g, b] = light.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8);
        let (open, close) = if step == status.current_step {
            ('[', ']')
        } else {
            (' ', ' ')
        };
        queue!(
            out,
            SetForegroundColor(Color::Rgb { r, g, b }),
            Print(format!("{open}{:^3}{close}", note_label(pitch))),
            ResetColor
        )?;
    }

    queue!(
        out,
        Print(format!(
            "  {:>5.1} bpm  cutoff {:+.2}V  res {:.2}  delay {:.2}",
            tempo_bpm(knobs.tempo),
            knobs.cutoff,
            knobs.resonance,
            knobs.delay
        ))
    )?;
    out.flush()?;
    Ok(())
}
