use std::fmt;
use crate::analysis::ClassifierThresholds;
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeLabel {
    Flat,
    SineLike,
    SquareLike,
    TriangleLike,
    SawtoothLike,
    Complex,
    /// Channel had nothing to analyse; never produced by [`classify_shape`].
    NoSignal,
}
impl ShapeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeLabel::Flat => "flat",
            ShapeLabel::SineLike => "sine-like",
            ShapeLabel::SquareLike => "square-like",
            ShapeLabel::TriangleLike => "triangle-like",
            ShapeLabel::SawtoothLike => "sawtooth-like",
            ShapeLabel::Complex => "complex/unknown",
            ShapeLabel::NoSignal => "no-signal",
        }
    }
}
impl fmt::Display for ShapeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
/// Harmonic energy split by harmonic number (1st, 3rd, ... vs 2nd, 4th, ...).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HarmonicBalance {
    pub odd: f64,
    pub even: f64,
}
impl HarmonicBalance {
    pub fn of(harmonics: &[f64]) -> Self {
        Self {
            odd: harmonics.iter().step_by(2).sum(),
            even: harmonics.iter().skip(1).step_by(2).sum(),
        }
    }
    pub fn odd_dominant(&self, ratio: f64) -> bool {
        self.odd > ratio * self.even
    }
}
/// Labels a waveform from its harmonic magnitudes (fundamental first) and decay exponent.
///
/// Rules, first match wins:
/// 1. no harmonic energy: flat
/// 2. every upper harmonic below `sine_ratio` of the fundamental: sine-like
/// 3. odd-dominant: triangle-like if decay < `triangle_decay`, else square-like
/// 4. mixed: triangle-like, sawtooth-like (decay < `sawtooth_decay`) or complex
pub fn classify_shape(
    harmonics: &[f64],
    decay_exponent: f64,
    thresholds: &ClassifierThresholds,
    ratio_epsilon: f64,
) -> ShapeLabel {
    let Some(&fundamental) = harmonics.first() else {
        return ShapeLabel::Flat;
    };
    if harmonics.iter().all(|h| *h == 0.0) {
        return ShapeLabel::Flat;
    }
    let scale = fundamental + ratio_epsilon;
    if harmonics[1..]
        .iter()
        .all(|h| h / scale < thresholds.sine_ratio)
    {
        return ShapeLabel::SineLike;
    }
    let steep = decay_exponent < thresholds.triangle_decay;
    if HarmonicBalance::of(harmonics).odd_dominant(thresholds.odd_even_ratio) {
        if steep {
            ShapeLabel::TriangleLike
        } else {
            ShapeLabel::SquareLike
        }
    } else if steep {
        ShapeLabel::TriangleLike
    } else if decay_exponent < thresholds.sawtooth_decay {
        ShapeLabel::SawtoothLike
    } else {
        ShapeLabel::Complex
    }
}
