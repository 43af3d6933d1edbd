//! Fixed-step ODE integration.

/*
Runge-Kutta (RK4)
=================

Analog circuits are described by differential equations: "how fast does each
capacitor voltage change, given the voltages right now". To run such a model
in discrete time we need to step the state forward by one sample period `dt`.

Vocabulary
----------

  state       The vector `x` being integrated (e.g. four capacitor voltages).

  derivative  `dx/dt = f(t, x)`. Supplied by the caller as a closure that
              fills `dxdt` for a given time offset and state.

  step        Advance `x(t)` to `x(t + dt)`.


Euler vs RK4
------------

Euler takes one slope at the start of the step and walks along it:

    x += dt * f(t, x)

That is cheap but it only tracks the true curve to first order. A ladder filter
is four stacked one-poles with feedback; near the top of its cutoff range the
per-sample decay `omega0 * dt` is close to 1 and Euler rings or dulls the
sound.

RK4 probes the slope four times and blends them:

    k1 = f(t,        x)
    k2 = f(t + dt/2, x + dt/2 * k1)
    k3 = f(t + dt/2, x + dt/2 * k2)
    k4 = f(t + dt,   x + dt   * k3)

    x += dt/6 * (k1 + 2 k2 + 2 k3 + k4)

Error is fourth order in `dt`, and for a linear decay it stays stable up to
`omega0 * dt ≈ 2.78`.


Implementation Notes
--------------------

State is a const-generic array so every intermediate lives on the stack; the
step never allocates. The closure receives the time offset *within* the step,
so callers can interpolate inputs that only change once per sample.
*/

/// Advance `x` by one RK4 step of length `dt` starting at time `t`.
///
/// `f(t, x, dxdt)` must write the derivative of `x` at time `t` into `dxdt`.
pub fn rk4_step<const N: usize, F>(t: f32, dt: f32, x: &mut [f32; N], mut f: F)
where
    F: FnMut(f32, &[f32; N], &mut [f32; N]),
{
    let half = dt * 0.5;

    let mut k1 = [0.0; N];
    f(t, x, &mut k1);

    let mut probe = [0.0; N];
    for i in 0..N {
        probe[i] = x[i] + half * k1[i];
    }
    let mut k2 = [0.0; N];
    f(t + half, &probe, &mut k2);

    for i in 0..N {
        probe[i] = x[i] + half * k2[i];
    }
    let mut k3 = [0.0; N];
    f(t + half, &probe, &mut k3);

    for i in 0..N {
        probe[i] = x[i] + dt * k3[i];
    }
    let mut k4 = [0.0; N];
    f(t + dt, &probe, &mut k4);

    for i in 0..N {
        x[i] += dt / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
}
