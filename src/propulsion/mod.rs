pub mod curve;
pub mod table;

pub use curve::FittedThrustCurve;
pub use table::{RpmThrust, ThrustSample, ThrustTable, VelocityUnit};

/// Thrust as a function of forward speed.
///
/// Implemented by the closed-form fitted curve and by a thrust table pinned
/// to one RPM, so the integrator does not care which one drives it.
/// Implementations are read-only and safe to share across parallel runs.
pub trait ThrustModel: Send + Sync {
    /// Thrust (lbf) at a forward speed (ft/s).
    fn thrust(&self, velocity_ft_s: f64) -> f64;

    /// Human-readable description for reports.
    fn describe(&self) -> String {
        "thrust model".into()
    }
}

impl<T: ThrustModel + ?Sized> ThrustModel for &T {
    fn thrust(&self, velocity_ft_s: f64) -> f64 {
        (**self).thrust(velocity_ft_s)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
