use serde::Serialize;

use crate::dynamics::TrajectorySample;

use super::integrator::RotationCause;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Ground roll ended and the pitch-up schedule started.
    Rotation { forced: bool },
    /// Wheels left the runway.
    Liftoff,
    /// Passed the end of the declared runway.
    RunwayEnd { airborne: bool },
    Custom(String),
}

impl From<RotationCause> for EventKind {
    fn from(cause: RotationCause) -> Self {
        EventKind::Rotation {
            forced: cause == RotationCause::RunwayMark,
        }
    }
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub sample: TrajectorySample,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive samples and report events.
pub trait EventDetector: Send {
    fn check(&mut self, prev: &TrajectorySample, current: &TrajectorySample) -> Option<EventKind>;
}

/// Detects the first step with positive altitude.
#[derive(Debug, Default)]
pub struct LiftoffDetector {
    fired: bool,
}

impl EventDetector for LiftoffDetector {
    fn check(&mut self, prev: &TrajectorySample, current: &TrajectorySample) -> Option<EventKind> {
        if self.fired || prev.altitude > 0.0 || current.altitude <= 0.0 {
            return None;
        }
        self.fired = true;
        Some(EventKind::Liftoff)
    }
}

/// Detects crossing the runway end.
#[derive(Debug)]
pub struct RunwayEndDetector {
    pub runway_length: f64,
}

impl EventDetector for RunwayEndDetector {
    fn check(&mut self, prev: &TrajectorySample, current: &TrajectorySample) -> Option<EventKind> {
        if prev.position < self.runway_length && current.position >= self.runway_length {
            Some(EventKind::RunwayEnd {
                airborne: current.altitude > 0.0,
            })
        } else {
            None
        }
    }
}

/// Detects when altitude crosses a threshold (ascending or descending),
/// e.g. clearing an obstacle height.
#[derive(Debug)]
pub struct AltitudeDetector {
    pub altitude: f64,
    pub ascending: bool,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(altitude: f64, ascending: bool) -> Self {
        Self { altitude, ascending, fired: false }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &TrajectorySample, current: &TrajectorySample) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let crossed = if self.ascending {
            prev.altitude < self.altitude && current.altitude >= self.altitude
        } else {
            prev.altitude > self.altitude && current.altitude <= self.altitude
        };
        if crossed {
            self.fired = true;
            Some(EventKind::Custom(format!(
                "Altitude {:.0}ft ({})",
                self.altitude,
                if self.ascending { "ascending" } else { "descending" }
            )))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::Phase;

    fn make_sample(pos: f64, alt: f64) -> TrajectorySample {
        TrajectorySample {
            time: 0.0,
            position: pos,
            velocity: 30.0,
            altitude: alt,
            vertical_velocity: 0.0,
            alpha_deg: 0.0,
            lift: 0.0,
            drag: 0.0,
            thrust: 0.0,
            phase: Phase::GroundRoll,
        }
    }

    #[test]
    fn liftoff_fires_once() {
        let mut det = LiftoffDetector::default();
        let prev = make_sample(50.0, 0.0);
        let curr = make_sample(50.1, 0.01);
        assert_eq!(det.check(&prev, &curr), Some(EventKind::Liftoff));
        assert!(det.check(&prev, &curr).is_none());
    }

    #[test]
    fn runway_end_reports_ground_overrun() {
        let mut det = RunwayEndDetector { runway_length: 90.0 };
        let prev = make_sample(89.99, 0.0);
        let curr = make_sample(90.02, 0.0);
        assert_eq!(
            det.check(&prev, &curr),
            Some(EventKind::RunwayEnd { airborne: false })
        );
    }

    #[test]
    fn altitude_detector_ascending() {
        let mut det = AltitudeDetector::new(50.0, true);
        let prev = make_sample(200.0, 49.0);
        let curr = make_sample(201.0, 50.5);
        assert!(det.check(&prev, &curr).is_some());
        // Should not fire again
        assert!(det.check(&prev, &curr).is_none());
    }

    #[test]
    fn rotation_cause_maps_to_kind() {
        assert_eq!(
            EventKind::from(RotationCause::RunwayMark),
            EventKind::Rotation { forced: true }
        );
        assert_eq!(
            EventKind::from(RotationCause::LiftExceedsWeight),
            EventKind::Rotation { forced: false }
        );
    }
}
