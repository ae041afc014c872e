use crate::aero::AeroCoefficients;

/// Aerodynamic lift, q * CL * S.
pub fn lift(q: f64, coeffs: &AeroCoefficients, wing_area: f64) -> f64 {
    q * coeffs.cl * wing_area
}

/// Aerodynamic drag, q * CD * S. Acts opposite the direction of travel.
pub fn drag(q: f64, coeffs: &AeroCoefficients, wing_area: f64) -> f64 {
    q * coeffs.cd * wing_area
}

/// Wheel friction while rolling: mu * (W - L), never negative.
pub fn rolling_resistance(mu: f64, weight: f64, lift: f64) -> f64 {
    (mu * (weight - lift)).max(0.0)
}

/// Split thrust into (horizontal, vertical) components along the body axis
/// pitched up by `alpha_deg`. Without resolution all thrust is horizontal.
pub fn thrust_components(thrust: f64, alpha_deg: f64, resolve: bool) -> (f64, f64) {
    if !resolve {
        return (thrust, 0.0);
    }
    let (sin, cos) = alpha_deg.to_radians().sin_cos();
    (thrust * cos, thrust * sin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lift_and_drag_scale_with_q() {
        let c = AeroCoefficients { cl: 0.8, cd: 0.05 };
        assert!((lift(2.0, &c, 10.0) - 16.0).abs() < 1e-12);
        assert!((drag(2.0, &c, 10.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rolling_resistance_clamps_when_airborne() {
        assert!((rolling_resistance(0.02, 45.0, 20.0) - 0.5).abs() < 1e-12);
        assert_eq!(rolling_resistance(0.02, 45.0, 60.0), 0.0);
    }

    #[test]
    fn thrust_resolution() {
        let (tx, tz) = thrust_components(10.0, 30.0, true);
        assert!((tx - 10.0 * 30f64.to_radians().cos()).abs() < 1e-12);
        assert!((tz - 5.0).abs() < 1e-12);
        assert_eq!(thrust_components(10.0, 30.0, false), (10.0, 0.0));
    }
}
