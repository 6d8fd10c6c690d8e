//! Velocity-adaptive stroke smoothing.
//!
//! Raw pointer samples arrive at wildly different spatial densities
//! depending on how fast the hand moves. Each incoming sample updates a
//! rolling velocity window, the average picks a speed tier, and the tier's
//! parameters drive a three-stage pipeline over the whole raw buffer:
//!
//! 1. interpolate — fill gaps wider than the tier's max gap
//! 2. optimize — drop points closer together than the tier's min gap
//! 3. smooth — refit with the tier's curve family
//!
//! The pipeline always reprocesses the entire buffer rather than the new
//! tail; fitting curves to partial segments compounds error at the seams.
//! The first and last raw samples survive every stage exactly.

use std::collections::VecDeque;

use kurbo::{CubicBez, ParamCurve, Point, QuadBez};

/// Samples kept in the rolling velocity window.
pub const VELOCITY_WINDOW: usize = 8;

/// Discrete speed buckets controlling how aggressively a stroke is smoothed.
/// Faster strokes tolerate wider interpolation gaps but get more curve
/// samples to make up for the sparser raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedTier {
    Fast,
    Brisk,
    Moderate,
    Slow,
}

/// Curve family used by the smoothing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveFamily {
    CubicBezier,
    QuadraticBezier,
    CatmullRom,
}

/// Pipeline parameters attached to a speed tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierProfile {
    /// Interpolation inserts synthetic points above this raw gap.
    pub max_gap: f64,
    /// Optimization drops points closer together than this.
    pub min_gap: f64,
    pub curve: CurveFamily,
    /// Curve samples per refitted segment.
    pub steps: usize,
}

/// Classify an average velocity (distance units per millisecond) into a
/// tier. Kept as a standalone pure function so tier selection is testable
/// without a clock.
pub fn classify_velocity(avg_velocity: f64) -> SpeedTier {
    if avg_velocity > 1.2 {
        SpeedTier::Fast
    } else if avg_velocity > 0.6 {
        SpeedTier::Brisk
    } else if avg_velocity > 0.2 {
        SpeedTier::Moderate
    } else {
        SpeedTier::Slow
    }
}

impl SpeedTier {
    pub fn profile(self) -> TierProfile {
        match self {
            SpeedTier::Fast => TierProfile {
                max_gap: 6.0,
                min_gap: 0.8,
                curve: CurveFamily::CubicBezier,
                steps: 8,
            },
            SpeedTier::Brisk => TierProfile {
                max_gap: 8.0,
                min_gap: 1.0,
                curve: CurveFamily::QuadraticBezier,
                steps: 6,
            },
            SpeedTier::Moderate => TierProfile {
                max_gap: 10.0,
                min_gap: 1.2,
                curve: CurveFamily::CatmullRom,
                steps: 5,
            },
            SpeedTier::Slow => TierProfile {
                max_gap: 12.0,
                min_gap: 1.5,
                curve: CurveFamily::CatmullRom,
                steps: 5,
            },
        }
    }
}

/// Per-stroke smoothing state, created at pointer-down and dropped when the
/// stroke commits or the gesture is cancelled.
#[derive(Debug, Clone)]
pub struct StrokeSmoother {
    raw: Vec<Point>,
    last_timestamp_ms: f64,
    last_position: Point,
    velocities: VecDeque<f64>,
}

impl StrokeSmoother {
    /// Start a stroke at the pointer-down position.
    pub fn begin(origin: Point, timestamp_ms: f64) -> Self {
        Self {
            raw: vec![origin],
            last_timestamp_ms: timestamp_ms,
            last_position: origin,
            velocities: VecDeque::with_capacity(VELOCITY_WINDOW),
        }
    }

    /// Feed one pointer-move sample and get back the fully reprocessed
    /// polyline. Samples sharing a timestamp contribute no velocity reading.
    pub fn sample(&mut self, position: Point, timestamp_ms: f64) -> Vec<Point> {
        let dt = timestamp_ms - self.last_timestamp_ms;
        if dt > 0.0 {
            if self.velocities.len() == VELOCITY_WINDOW {
                self.velocities.pop_front();
            }
            self.velocities.push_back(self.last_position.distance(position) / dt);
        }
        self.last_timestamp_ms = timestamp_ms;
        self.last_position = position;
        self.raw.push(position);

        self.process()
    }

    /// Average of the rolling velocity window; zero until a timed sample
    /// has landed.
    pub fn average_velocity(&self) -> f64 {
        if self.velocities.is_empty() {
            0.0
        } else {
            self.velocities.iter().sum::<f64>() / self.velocities.len() as f64
        }
    }

    /// Tier the next pipeline run will use.
    pub fn tier(&self) -> SpeedTier {
        classify_velocity(self.average_velocity())
    }

    /// Raw samples accumulated so far.
    pub fn raw_points(&self) -> &[Point] {
        &self.raw
    }

    /// Run the full pipeline over the accumulated raw buffer.
    pub fn process(&self) -> Vec<Point> {
        let profile = self.tier().profile();
        let interpolated = interpolate(&self.raw, profile.max_gap);
        let optimized = optimize(&interpolated, profile.min_gap);
        smooth(&optimized, profile.curve, profile.steps)
    }
}

/// Insert evenly spaced synthetic points wherever consecutive samples are
/// farther apart than `max_gap`.
fn interpolate(points: &[Point], max_gap: f64) -> Vec<Point> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut out = vec![points[0]];
    let mut prev = points[0];
    for &curr in &points[1..] {
        let dist = prev.distance(curr);
        if dist > max_gap {
            let steps = (dist / max_gap).ceil() as usize;
            for step in 1..=steps {
                out.push(prev.lerp(curr, step as f64 / steps as f64));
            }
        } else {
            out.push(curr);
        }
        prev = curr;
    }
    out
}

/// Drop points closer to their predecessor than `min_gap`, bounding the
/// output size. The final raw point is always reinstated.
fn optimize(points: &[Point], min_gap: f64) -> Vec<Point> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut out = vec![points[0]];
    let mut kept = points[0];
    for &curr in &points[1..] {
        if kept.distance(curr) >= min_gap {
            out.push(curr);
            kept = curr;
        }
    }
    let last = points[points.len() - 1];
    if kept != last {
        out.push(last);
    }
    out
}

fn smooth(points: &[Point], curve: CurveFamily, steps: usize) -> Vec<Point> {
    match curve {
        CurveFamily::CubicBezier => smooth_cubic(points, steps),
        CurveFamily::QuadraticBezier => smooth_quadratic(points, steps),
        CurveFamily::CatmullRom => smooth_catmull_rom(points, steps),
    }
}

/// Refit with cubic Beziers whose control points lean on the two neighbors
/// on each side. The stroke's first and last two points pass through
/// untouched.
fn smooth_cubic(points: &[Point], steps: usize) -> Vec<Point> {
    let n = points.len();
    if n < 4 {
        return points.to_vec();
    }
    let mut out = vec![points[0], points[1]];
    for i in 2..n - 2 {
        let p0 = points[i - 2];
        let p1 = points[i - 1];
        let p2 = points[i];
        let p4 = points[i + 2];
        let cp1 = p1 + (p2 - p0) * 0.25;
        let cp2 = p2 - (p4 - p1) * 0.25;
        let bez = CubicBez::new(p1, cp1, cp2, p2);
        for t in 0..=steps {
            out.push(bez.eval(t as f64 / steps as f64));
        }
    }
    out.push(points[n - 2]);
    out.push(points[n - 1]);
    out
}

/// Refit with quadratic Beziers using the midpoint toward the next sample
/// as the control point.
fn smooth_quadratic(points: &[Point], steps: usize) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let mut out = vec![points[0]];
    for i in 1..n - 1 {
        let prev = points[i - 1];
        let curr = points[i];
        let control = curr.midpoint(points[i + 1]);
        let bez = QuadBez::new(prev, control, curr);
        for t in 0..=steps {
            out.push(bez.eval(t as f64 / steps as f64));
        }
    }
    out.push(points[n - 1]);
    out
}

/// Refit with a Catmull-Rom spline; the final segment reuses its endpoint
/// as the missing fourth control point.
fn smooth_catmull_rom(points: &[Point], steps: usize) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let mut out = vec![points[0]];
    for i in 1..n - 1 {
        let p0 = points[i - 1];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = if i + 2 < n { points[i + 2] } else { p2 };
        for t in 0..=steps {
            let u = t as f64 / steps as f64;
            let u2 = u * u;
            let u3 = u2 * u;
            let x = 0.5
                * (2.0 * p1.x
                    + (-p0.x + p2.x) * u
                    + (2.0 * p0.x - 5.0 * p1.x + 4.0 * p2.x - p3.x) * u2
                    + (-p0.x + 3.0 * p1.x - 3.0 * p2.x + p3.x) * u3);
            let y = 0.5
                * (2.0 * p1.y
                    + (-p0.y + p2.y) * u
                    + (2.0 * p0.y - 5.0 * p1.y + 4.0 * p2.y - p3.y) * u2
                    + (-p0.y + 3.0 * p1.y - 3.0 * p2.y + p3.y) * u3);
            out.push(Point::new(x, y));
        }
    }
    out.push(points[n - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_classification_thresholds() {
        assert_eq!(classify_velocity(2.0), SpeedTier::Fast);
        assert_eq!(classify_velocity(1.3), SpeedTier::Fast);
        // Thresholds are strict.
        assert_eq!(classify_velocity(1.2), SpeedTier::Brisk);
        assert_eq!(classify_velocity(0.7), SpeedTier::Brisk);
        assert_eq!(classify_velocity(0.6), SpeedTier::Moderate);
        assert_eq!(classify_velocity(0.3), SpeedTier::Moderate);
        assert_eq!(classify_velocity(0.2), SpeedTier::Slow);
        assert_eq!(classify_velocity(0.0), SpeedTier::Slow);
    }

    #[test]
    fn test_interpolation_bounds_gaps_at_slow_tier() {
        let raw = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(200.0, 0.0),
        ];
        let max_gap = SpeedTier::Slow.profile().max_gap;
        let filled = interpolate(&raw, max_gap);

        for pair in filled.windows(2) {
            assert!(
                pair[0].distance(pair[1]) <= max_gap + 1e-9,
                "gap {} exceeds {max_gap}",
                pair[0].distance(pair[1])
            );
        }
        assert_eq!(filled[0], raw[0]);
        assert_eq!(*filled.last().unwrap(), raw[2]);
    }

    #[test]
    fn test_optimize_drops_dense_points_but_keeps_endpoints() {
        let dense: Vec<Point> = (0..20).map(|i| Point::new(i as f64 * 0.5, 0.0)).collect();
        let thinned = optimize(&dense, 1.5);

        assert!(thinned.len() < dense.len());
        assert_eq!(thinned[0], dense[0]);
        assert_eq!(*thinned.last().unwrap(), *dense.last().unwrap());
        for pair in thinned.windows(2).take(thinned.len().saturating_sub(2)) {
            assert!(pair[0].distance(pair[1]) >= 1.5);
        }
    }

    /// Drive a smoother so its window average lands in the requested tier.
    fn smoother_in_tier(tier: SpeedTier) -> StrokeSmoother {
        let dt = match tier {
            SpeedTier::Fast => 5.0,      // 10 units / 5 ms  = 2.0
            SpeedTier::Brisk => 10.0,    // 10 units / 10 ms = 1.0
            SpeedTier::Moderate => 25.0, // 10 units / 25 ms = 0.4
            SpeedTier::Slow => 200.0,    // 10 units / 200 ms = 0.05
        };
        let mut smoother = StrokeSmoother::begin(Point::new(0.0, 0.0), 0.0);
        for i in 1..8 {
            let jitter = if i % 2 == 0 { 3.0 } else { -3.0 };
            smoother.sample(Point::new(i as f64 * 10.0, jitter), i as f64 * dt);
        }
        assert_eq!(smoother.tier(), tier);
        smoother
    }

    #[test]
    fn test_endpoints_preserved_in_every_tier() {
        for tier in [
            SpeedTier::Fast,
            SpeedTier::Brisk,
            SpeedTier::Moderate,
            SpeedTier::Slow,
        ] {
            let smoother = smoother_in_tier(tier);
            let raw = smoother.raw_points().to_vec();
            let processed = smoother.process();

            assert!(processed.len() >= 2);
            assert_eq!(processed[0], raw[0], "first sample must survive {tier:?}");
            assert_eq!(
                *processed.last().unwrap(),
                *raw.last().unwrap(),
                "last sample must survive {tier:?}"
            );
        }
    }

    #[test]
    fn test_velocity_window_is_bounded() {
        let mut smoother = StrokeSmoother::begin(Point::ZERO, 0.0);
        for i in 1..50 {
            smoother.sample(Point::new(i as f64, 0.0), i as f64 * 10.0);
        }
        assert_eq!(smoother.velocities.len(), VELOCITY_WINDOW);
    }

    #[test]
    fn test_zero_dt_sample_adds_no_velocity() {
        let mut smoother = StrokeSmoother::begin(Point::ZERO, 100.0);
        smoother.sample(Point::new(50.0, 0.0), 100.0);

        assert_eq!(smoother.average_velocity(), 0.0);
        assert_eq!(smoother.raw_points().len(), 2);
    }

    #[test]
    fn test_degenerate_buffers_pass_through() {
        let one = [Point::new(1.0, 1.0)];
        assert_eq!(interpolate(&one, 6.0), one.to_vec());
        assert_eq!(optimize(&one, 1.0), one.to_vec());
        assert_eq!(smooth(&one, CurveFamily::CubicBezier, 8), one.to_vec());

        let two = [Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        assert_eq!(smooth(&two, CurveFamily::CatmullRom, 5), two.to_vec());
        assert_eq!(smooth(&two, CurveFamily::QuadraticBezier, 6), two.to_vec());
    }

    #[test]
    fn test_fast_tier_produces_densified_output() {
        let smoother = smoother_in_tier(SpeedTier::Fast);
        let processed = smoother.process();
        // Cubic refitting at 8 steps per segment expands the buffer well
        // past the raw sample count.
        assert!(processed.len() > smoother.raw_points().len());
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let a = smoother_in_tier(SpeedTier::Moderate);
        let b = smoother_in_tier(SpeedTier::Moderate);
        assert_eq!(a.process(), b.process());
    }
}
