//! Gain automation lanes
//!
//! A lane is a gain value over time: a base value plus an ordered list of
//! scheduled breakpoints (set, linear ramp, exponential ramp). All
//! scheduling happens before rendering — the offline graph has no live
//! control stream — so evaluation is a cursor walk over a sorted list.

/// How a breakpoint is approached from the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Curve {
    /// Jump to the value at the breakpoint time
    Step,
    /// Linear interpolation from the previous breakpoint
    Linear,
    /// Exponential interpolation; values are floored at `EXP_FLOOR`
    Exponential,
}

/// Exponential ramps cannot pass through zero
const EXP_FLOOR: f32 = 1e-4;

#[derive(Debug, Clone, Copy)]
struct Breakpoint {
    time: f64,
    value: f32,
    curve: Curve,
}

/// A schedulable gain parameter
#[derive(Debug, Clone)]
pub struct AutomationLane {
    base: f32,
    points: Vec<Breakpoint>,
}

impl AutomationLane {
    /// A lane resting at a constant value
    pub fn constant(base: f32) -> Self {
        Self {
            base,
            points: Vec::new(),
        }
    }

    /// The resting value automation returns to
    pub fn base(&self) -> f32 {
        self.base
    }

    /// True when no automation was scheduled
    pub fn is_static(&self) -> bool {
        self.points.is_empty()
    }

    /// Set the value at a point in time (step change)
    pub fn set_value_at(&mut self, time: f64, value: f32) {
        self.insert(Breakpoint {
            time,
            value,
            curve: Curve::Step,
        });
    }

    /// Ramp linearly from the previous breakpoint to `value` at `time`
    pub fn linear_ramp_to(&mut self, time: f64, value: f32) {
        self.insert(Breakpoint {
            time,
            value,
            curve: Curve::Linear,
        });
    }

    /// Ramp exponentially from the previous breakpoint to `value` at `time`
    pub fn exponential_ramp_to(&mut self, time: f64, value: f32) {
        self.insert(Breakpoint {
            time,
            value: value.max(EXP_FLOOR),
            curve: Curve::Exponential,
        });
    }

    fn insert(&mut self, point: Breakpoint) {
        let idx = self
            .points
            .partition_point(|p| p.time <= point.time);
        self.points.insert(idx, point);
    }

    /// Cursor for monotonically increasing time queries
    pub fn sampler(&self) -> LaneSampler<'_> {
        LaneSampler {
            lane: self,
            index: 0,
        }
    }
}

/// Evaluates a lane frame-by-frame; times must not decrease between calls
#[derive(Debug)]
pub struct LaneSampler<'a> {
    lane: &'a AutomationLane,
    index: usize,
}

impl LaneSampler<'_> {
    /// The lane's value at `time`
    pub fn value_at(&mut self, time: f64) -> f32 {
        let points = &self.lane.points;
        while self.index < points.len() && points[self.index].time <= time {
            self.index += 1;
        }

        if self.index == 0 {
            // before any breakpoint
            return self.lane.base;
        }
        let prev = points[self.index - 1];
        let Some(next) = points.get(self.index) else {
            return prev.value;
        };

        match next.curve {
            Curve::Step => prev.value,
            Curve::Linear => {
                let span = next.time - prev.time;
                if span <= 0.0 {
                    return next.value;
                }
                let frac = ((time - prev.time) / span) as f32;
                prev.value + (next.value - prev.value) * frac
            }
            Curve::Exponential => {
                let span = next.time - prev.time;
                if span <= 0.0 {
                    return next.value;
                }
                let frac = ((time - prev.time) / span) as f32;
                let from = prev.value.max(EXP_FLOOR);
                let to = next.value.max(EXP_FLOOR);
                from * (to / from).powf(frac)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_lane_returns_base() {
        let lane = AutomationLane::constant(0.7);
        let mut sampler = lane.sampler();
        assert_eq!(sampler.value_at(0.0), 0.7);
        assert_eq!(sampler.value_at(100.0), 0.7);
    }

    #[test]
    fn step_changes_hold() {
        let mut lane = AutomationLane::constant(0.0);
        lane.set_value_at(1.0, 0.5);
        let mut sampler = lane.sampler();
        assert_eq!(sampler.value_at(0.5), 0.0);
        assert_eq!(sampler.value_at(1.0), 0.5);
        assert_eq!(sampler.value_at(2.0), 0.5);
    }

    #[test]
    fn linear_ramp_interpolates() {
        let mut lane = AutomationLane::constant(0.0);
        lane.set_value_at(1.0, 0.0);
        lane.linear_ramp_to(2.0, 1.0);
        let mut sampler = lane.sampler();
        assert!((sampler.value_at(1.5) - 0.5).abs() < 1e-6);
        assert!((sampler.value_at(2.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn exponential_ramp_decays() {
        let mut lane = AutomationLane::constant(1.0);
        lane.set_value_at(0.0, 1.0);
        lane.exponential_ramp_to(1.0, 0.0); // floored internally
        let mut sampler = lane.sampler();
        let mid = sampler.value_at(0.5);
        assert!(mid > 0.0 && mid < 0.5, "exponential midpoint was {mid}");
        assert!((sampler.value_at(1.0) - EXP_FLOOR).abs() < 1e-6);
    }

    #[test]
    fn out_of_order_insertion_sorts() {
        let mut lane = AutomationLane::constant(0.0);
        lane.set_value_at(2.0, 0.2);
        lane.set_value_at(1.0, 0.1);
        let mut sampler = lane.sampler();
        assert!((sampler.value_at(1.5) - 0.1).abs() < 1e-6);
        assert!((sampler.value_at(2.5) - 0.2).abs() < 1e-6);
    }
}
