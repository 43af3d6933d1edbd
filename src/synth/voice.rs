use crate::dsp::delay::DelayLine;
use crate::dsp::{Envelope, LadderFilter, Oscillator};
use crate::io::{Controls, RenderCtx, StepLights, VoiceOutput};
use crate::sequencing::StepSequencer;
use crate::synth::config::{ConfigError, VoiceConfig};

/*
Signal Path
===========

Every sample runs the whole chain once, in this order:

    controls ──→ sequencer ──(pitch)──→ oscillator ──→ filter ──→ × ──→ delay ──→ × gain ──→ volts
                     │                                            ↑
                     └────(attack)────→ envelope ─────────────────┘

The sequencer goes first so a note pressed on this sample is already the
pitch the oscillator renders. The envelope is applied after the filter,
so the filter keeps ringing through its state while the voice is silent
and a new note does not start from a cold ladder.

The voice owns every piece of DSP state, including the 2^21-sample delay
buffer, which is allocated once here and never again.
*/

pub struct DuettoVoice {
    sequencer: StepSequencer,
    oscillator: Oscillator,
    envelope: Envelope,
    filter: LadderFilter,
    delay: DelayLine,
    config: VoiceConfig,
}

impl DuettoVoice {
    pub fn new() -> Self {
        Self::build(VoiceConfig::default())
    }

    pub fn with_config(config: VoiceConfig) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            log::warn!("rejected voice config: {err}");
            return Err(err);
        }
        Ok(Self::build(config))
    }

    fn build(config: VoiceConfig) -> Self {
        let delay = DelayLine::new().with_feedback_mix(config.feedback, config.mix);
        log::info!(
            "duetto voice: {:?} at {:.2} Hz reference, delay {}..{} s ({} samples max)",
            config.waveform,
            config.reference_hz,
            config.min_delay_seconds,
            config.max_delay_seconds,
            delay.capacity()
        );

        Self {
            sequencer: StepSequencer::new(),
            oscillator: Oscillator::with_reference(config.waveform, config.reference_hz),
            envelope: Envelope::with_time_range(
                config.attack,
                config.decay,
                config.min_time,
                config.max_time,
            ),
            filter: LadderFilter::with_limits(
                config.reference_hz,
                config.max_cutoff_hz,
                config.max_resonance,
            ),
            delay,
            config,
        }
    }

    /// Run the full chain for one sample.
    pub fn process(&mut self, ctx: &RenderCtx, controls: &Controls) -> VoiceOutput {
        let voltage = self.tick(ctx, controls);
        VoiceOutput {
            voltage,
            lights: self.sequencer.lights(),
        }
    }

    /// Render a block of output voltages with the controls held for the whole
    /// block. Lights reflect the last sample; read them with [`Self::lights`].
    pub fn render_block(&mut self, ctx: &RenderCtx, controls: &Controls, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.tick(ctx, controls);
        }
    }

    #[inline]
    fn tick(&mut self, ctx: &RenderCtx, controls: &Controls) -> f32 {
        let step = self.sequencer.advance(
            ctx.sample_time,
            controls.tempo,
            &controls.notes,
            &controls.steps,
        );

        let raw = self.oscillator.render(ctx.sample_time, step.active_pitch);

        if step.attack_requested {
            self.envelope.trigger();
        }
        let level = self.envelope.advance(ctx.sample_time);

        let filtered = self.filter.step(ctx, raw, controls.cutoff, controls.resonance);

        let delay_seconds = DelayLine::knob_to_seconds(
            controls.delay,
            self.config.min_delay_seconds,
            self.config.max_delay_seconds,
        );
        let echoed = self.delay.process(delay_seconds, ctx.sample_rate, filtered * level);

        self.config.output_gain * echoed
    }

    pub fn lights(&self) -> StepLights {
        self.sequencer.lights()
    }

    pub fn sequencer(&self) -> &StepSequencer {
        &self.sequencer
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn filter(&self) -> &LadderFilter {
        &self.filter
    }

    pub fn delay(&self) -> &DelayLine {
        &self.delay
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    /// Clear the pattern and silence every stage.
    pub fn reset(&mut self) {
        log::debug!("duetto voice reset");
        self.sequencer.reset();
        self.oscillator.reset();
        self.envelope.reset();
        self.filter.reset();
        self.delay.reset();
    }
}

impl Default for DuettoVoice {
    fn default() -> Self {
        Self::new()
    }
}
