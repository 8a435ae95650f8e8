//! Easing curves over `t` in `[0, 1]`. Inputs outside that range are clamped.
use std::f64::consts::PI;

fn clamp(t: f64) -> f64 {
    if t.is_nan() {
        0.0
    } else {
        t.clamp(0.0, 1.0)
    }
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = clamp(t);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - clamp(t)).powi(3)
}

/// Overshoots slightly past 1 before settling.
pub fn ease_out_back(t: f64) -> f64 {
    const C1: f64 = 1.70158;
    const C3: f64 = C1 + 1.0;
    let t = clamp(t);
    1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
}

pub fn ease_out_elastic(t: f64) -> f64 {
    let t = clamp(t);
    if t == 0.0 || t == 1.0 {
        return t;
    }
    let c4 = (2.0 * PI) / 3.0;
    2f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
}

/// Local progress of `t` within `[start, end]`.
pub fn phase(t: f64, start: f64, end: f64) -> f64 {
    if end <= start {
        return if t >= end { 1.0 } else { 0.0 };
    }
    clamp((t - start) / (end - start))
}
