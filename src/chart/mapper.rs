//! Coordinate mapping from samples to pixel-space path commands
//!
//! Each axis is normalized against the current window's own min/max, so the
//! trace rescales continuously as old samples are evicted. A range floor of 1
//! keeps flat series (all equal `t` or `c`) finite.

use super::types::{PathProjection, StreamSample, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use std::fmt::Write;

/// Project a window of samples into a 280x80 path
pub fn project<'a, I>(samples: I) -> PathProjection
where
    I: IntoIterator<Item = &'a StreamSample>,
    I::IntoIter: Clone,
{
    project_into(samples, VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
}

/// Project a window of samples into a `w` x `h` path
pub fn project_into<'a, I>(samples: I, w: f64, h: f64) -> PathProjection
where
    I: IntoIterator<Item = &'a StreamSample>,
    I::IntoIter: Clone,
{
    let iter = samples.into_iter();

    let Some(bounds) = Bounds::of(iter.clone()) else {
        return PathProjection::empty();
    };
    if bounds.count < 2 {
        return PathProjection::empty();
    }

    let range_t = (bounds.max_t - bounds.min_t).max(1.0);
    let range_c = (bounds.max_c - bounds.min_c).max(1.0);

    let mut d = String::with_capacity(bounds.count * 14);
    for (i, sample) in iter.enumerate() {
        let x = (sample.t - bounds.min_t) / range_t * w;
        let y = h - (sample.c - bounds.min_c) / range_c * h;
        if i > 0 {
            d.push(' ');
        }
        let cmd = if i == 0 { 'M' } else { 'L' };
        // Writing to a String cannot fail
        let _ = write!(d, "{} {} {}", cmd, OneDecimal(x), OneDecimal(y));
    }

    PathProjection { d, w, h }
}

/// One-decimal formatting that rounds exact ties away from zero
///
/// `{:.1}` rounds ties to even. A double lies exactly halfway between two
/// tenths only when it is an odd multiple of 0.25, so those values are
/// rounded up in magnitude and everything else keeps `{:.1}`.
struct OneDecimal(f64);

impl std::fmt::Display for OneDecimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = self.0;
        let quarters = v.abs() * 4.0;
        if quarters.fract() == 0.0 && quarters % 2.0 == 1.0 {
            let tenths = (v.abs() * 10.0).ceil();
            write!(f, "{:.1}", (tenths / 10.0).copysign(v))
        } else {
            write!(f, "{:.1}", v)
        }
    }
}

struct Bounds {
    min_t: f64,
    max_t: f64,
    min_c: f64,
    max_c: f64,
    count: usize,
}

impl Bounds {
    fn of<'a>(mut samples: impl Iterator<Item = &'a StreamSample>) -> Option<Self> {
        let first = samples.next()?;
        let mut bounds = Bounds {
            min_t: first.t,
            max_t: first.t,
            min_c: first.c,
            max_c: first.c,
            count: 1,
        };
        for s in samples {
            bounds.min_t = bounds.min_t.min(s.t);
            bounds.max_t = bounds.max_t.max(s.t);
            bounds.min_c = bounds.min_c.min(s.c);
            bounds.max_c = bounds.max_c.max(s.c);
            bounds.count += 1;
        }
        Some(bounds)
    }
}
