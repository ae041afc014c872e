use super::aircraft::{Aircraft, AircraftBuilder};

// ---------------------------------------------------------------------------
// Preset aircraft
// ---------------------------------------------------------------------------

/// 45 lb cargo plane on a 90 ft runway, 29 in chord.
pub fn plane_2025() -> Aircraft {
    AircraftBuilder::new("Plane 2025")
        .mass(45.0 / 32.2)
        .wing_area(31.467)
        .chord(29.0 / 12.0)
        .runway_length(90.0)
        .rolling_friction(0.02)
        .build()
}

/// 2.5 lb foam trainer on a 10 ft strip.
pub fn trainer() -> Aircraft {
    AircraftBuilder::new("Trainer")
        .mass(2.5 / 32.2)
        .wing_area(5.0)
        .chord(1.0)
        .runway_length(10.0)
        .rolling_friction(0.05)
        .build()
}
