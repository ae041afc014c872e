use serde::Serialize;

// ---------------------------------------------------------------------------
// Longitudinal point-mass state
// ---------------------------------------------------------------------------

/// Flight phase of the takeoff state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    GroundRoll,
    Climb,
    Terminated,
}

/// Mutable integration state. Owned by exactly one run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlightState {
    pub time: f64,              // s
    pub position: f64,          // ft, along the runway
    pub velocity: f64,          // ft/s, forward
    pub altitude: f64,          // ft
    pub vertical_velocity: f64, // ft/s, positive up
    pub alpha_deg: f64,         // deg
    pub phase: Phase,
}

impl FlightState {
    /// At rest at the runway threshold.
    pub fn at_rest() -> Self {
        Self::default()
    }

    pub fn on_ground(&self) -> bool {
        self.altitude <= 0.0
    }

    /// Flight-path angle (deg) from the velocity components.
    pub fn flight_path_deg(&self) -> f64 {
        if self.velocity.abs() < 1e-9 && self.vertical_velocity.abs() < 1e-9 {
            return 0.0;
        }
        self.vertical_velocity.atan2(self.velocity).to_degrees()
    }
}

// ---------------------------------------------------------------------------
// Forces acting during one step
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Forces {
    pub reynolds: f64,
    pub cl: f64,
    pub cd: f64,
    pub lift: f64,     // lbf
    pub drag: f64,     // lbf
    pub thrust: f64,   // lbf, along the thrust line
    pub thrust_x: f64, // lbf
    pub thrust_z: f64, // lbf
    pub rolling: f64,  // lbf, zero once airborne
    pub weight: f64,   // lbf
}

impl Forces {
    pub fn net_horizontal(&self) -> f64 {
        self.thrust_x - self.drag - self.rolling
    }

    pub fn net_vertical(&self) -> f64 {
        self.lift + self.thrust_z - self.weight
    }
}

// ---------------------------------------------------------------------------
// Trajectory sample (one row of the output artifact)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectorySample {
    pub time: f64,
    pub position: f64,
    pub velocity: f64,
    pub altitude: f64,
    pub vertical_velocity: f64,
    pub alpha_deg: f64,
    pub lift: f64,
    pub drag: f64,
    pub thrust: f64,
    pub phase: Phase,
}

impl TrajectorySample {
    pub fn new(state: &FlightState, forces: &Forces) -> Self {
        Self {
            time: state.time,
            position: state.position,
            velocity: state.velocity,
            altitude: state.altitude,
            vertical_velocity: state.vertical_velocity,
            alpha_deg: state.alpha_deg,
            lift: forces.lift,
            drag: forces.drag,
            thrust: forces.thrust,
            phase: state.phase,
        }
    }
}
