//! Saturation / Soft Clipping
//!
//! The ladder filter feeds its own output back into its input. Without a
//! bounded nonlinearity in that loop, high resonance would let the stage
//! voltages grow without limit. Each stage therefore passes its signal through
//! a smooth, odd, bounded curve before it is fed forward.
//!
//! # Padé tanh
//!
//! `tanh` is the textbook transistor-ladder curve but costs a transcendental
//! call per evaluation, and the filter evaluates it 20 times per sample. A
//! [3/2] Padé approximant is used instead:
//!
//! ```text
//!   f(x) = x * (27 + x²) / (27 + 9x²),   x clamped to [-3, 3]
//! ```
//!
//! At x = ±3 the curve reaches exactly ±1 with zero slope, so clamping the
//! input there keeps the function continuous and monotonic:
//!
//! ```text
//!    1 ┤            ╭─────────
//!      │          ╭─╯
//!    0 ┤────────╭─╯
//!      │      ╭─╯
//!   -1 ┤──────╯
//!      └──┬─────┬─────┬─────┬──→ x
//!        -3    -1     1     3
//! ```

/// Clamp bound of [`pade_tanh`]; outputs reach ±1 here.
pub const PADE_LIMIT: f32 = 3.0;

/// Rational approximation of `tanh`, clamped so the output stays in `[-1, 1]`.
#[inline]
pub fn pade_tanh(x: f32) -> f32 {
    let x = x.clamp(-PADE_LIMIT, PADE_LIMIT);
    let x2 = x * x;
    x * (27.0 + x2) / (27.0 + 9.0 * x2)
}
