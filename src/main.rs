use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use takeoff_sim::config::{load_scenario, LoadedScenario};
use takeoff_sim::io::{self, TakeoffSummary};
use takeoff_sim::propulsion::{ThrustModel, VelocityUnit};
use takeoff_sim::sim::{
    linspace, sweep_wing_area, AltitudeDetector, Cancellation, Deadline, EventDetector,
    EventKind, Never, Simulation, SweepOptions, SweepStatus, Trajectory,
};
use takeoff_sim::{FlightState, Phase};

#[derive(Parser)]
#[command(name = "takeoff-sim", version, about = "Takeoff ground roll and climb-out simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate one takeoff from a scenario file.
    Run {
        scenario: PathBuf,
        /// Write the trajectory as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the takeoff summary as JSON.
        #[arg(long)]
        json: Option<PathBuf>,
        /// Report when the climb-out clears this height (ft).
        #[arg(long)]
        obstacle: Option<f64>,
        /// Abandon the run after this many wall-clock seconds.
        #[arg(long)]
        timeout: Option<f64>,
    },
    /// Sweep wing area over a range, in parallel.
    Sweep {
        scenario: PathBuf,
        #[arg(long)]
        from: f64,
        #[arg(long)]
        to: f64,
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Skip wings whose 1.2 V_s exceeds this speed (ft/s).
        #[arg(long)]
        max_liftoff_speed: Option<f64>,
        /// Abandon any single configuration after this many wall-clock seconds.
        #[arg(long)]
        timeout: Option<f64>,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Query a propeller thrust table.
    Thrust {
        csv: PathBuf,
        #[arg(long)]
        rpm: u32,
        /// Velocity in the table's unit.
        #[arg(long)]
        velocity: Option<f64>,
        #[arg(long)]
        propeller: Option<String>,
        #[arg(long, value_enum, default_value_t = UnitArg::Mph)]
        unit: UnitArg,
        /// Fit a quadratic at the nearest stored RPM.
        #[arg(long)]
        fit: bool,
    },
    /// List airfoils in a polar CSV or query one.
    Polar {
        csv: PathBuf,
        #[arg(long)]
        airfoil: Option<String>,
        #[arg(long)]
        reynolds: Option<f64>,
        #[arg(long, default_value_t = 0.0)]
        alpha: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Mph,
    Fts,
}

impl From<UnitArg> for VelocityUnit {
    fn from(u: UnitArg) -> Self {
        match u {
            UnitArg::Mph => VelocityUnit::MilesPerHour,
            UnitArg::Fts => VelocityUnit::FeetPerSecond,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run { scenario, csv, json, obstacle, timeout } => {
            run(scenario, csv, json, obstacle, timeout)
        }
        Command::Sweep { scenario, from, to, count, max_liftoff_speed, timeout, csv } => {
            let options = SweepOptions {
                max_liftoff_speed,
                timeout: parse_timeout(timeout)?,
            };
            sweep(scenario, from, to, count, options, csv)
        }
        Command::Thrust { csv, rpm, velocity, propeller, unit, fit } => {
            thrust(csv, rpm, velocity, propeller, unit.into(), fit)
        }
        Command::Polar { csv, airfoil, reynolds, alpha } => polar(csv, airfoil, reynolds, alpha),
    }
}

fn parse_timeout(secs: Option<f64>) -> Result<Option<Duration>> {
    secs.map(|s| {
        Duration::try_from_secs_f64(s).with_context(|| format!("invalid --timeout {s}"))
    })
    .transpose()
}

fn load(path: &Path) -> Result<LoadedScenario> {
    load_scenario(path).with_context(|| format!("loading scenario {}", path.display()))
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

fn run(
    scenario: PathBuf,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
    obstacle: Option<f64>,
    timeout: Option<f64>,
) -> Result<()> {
    let loaded = load(&scenario)?;
    let LoadedScenario { scenario: sc, polar, propulsion } = &loaded;
    let thrust = propulsion.model()?;
    let sim = Simulation::new(&sc.aircraft, polar, thrust.as_ref(), &sc.environment, sc.simulation)?;

    let mut detectors: Vec<Box<dyn EventDetector>> = Vec::new();
    if let Some(h) = obstacle {
        detectors.push(Box::new(AltitudeDetector::new(h, true)));
    }
    let deadline = parse_timeout(timeout)?.map(Deadline::after);
    let cancel: &dyn Cancellation = match &deadline {
        Some(d) => d,
        None => &Never,
    };

    let traj = sim.run_with(FlightState::at_rest(), cancel, detectors);
    let summary =
        TakeoffSummary::from_trajectory(&traj, &sc.aircraft, polar, thrust.as_ref(), &sc.environment);

    print_report(&loaded, thrust.as_ref(), &traj, &summary);
    for w in &traj.warnings {
        eprintln!("[warn] {w}");
    }

    if let Some(path) = csv {
        io::csv::write_trajectory_file(&path, &traj.samples)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("  Trajectory written to {}", path.display());
    }
    if let Some(path) = json {
        io::json::write_summary_file(&path, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("  Summary written to {}", path.display());
    }
    Ok(())
}

fn print_report(
    loaded: &LoadedScenario,
    thrust: &dyn ThrustModel,
    traj: &Trajectory,
    summary: &TakeoffSummary,
) {
    let sc = &loaded.scenario;
    let a = &sc.aircraft;
    let cfg = &sc.simulation;

    println!();
    println!("====================================================================");
    println!("  TAKEOFF SIMULATION: {}", a.name);
    println!("====================================================================");
    println!();
    println!("  Aircraft");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Weight:        {:>8.2} lbf   Wing area:    {:>8.3} ft^2",
        summary.weight, a.wing_area
    );
    println!(
        "  Chord:         {:>8.3} ft    Runway:       {:>8.1} ft",
        a.chord, a.runway_length
    );
    println!("  Airfoil:       {} ({} rows)", loaded.polar.name(), loaded.polar.len());
    println!("  Thrust:        {}", thrust.describe());
    println!();

    println!("  Takeoff Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    for e in &traj.events {
        let label = match &e.kind {
            EventKind::Rotation { forced: true } => "ROTATE (runway mark)".to_string(),
            EventKind::Rotation { forced: false } => "ROTATE (L >= W)".to_string(),
            EventKind::Liftoff => "LIFTOFF".to_string(),
            EventKind::RunwayEnd { airborne } => {
                format!("RUNWAY END ({})", if *airborne { "airborne" } else { "on ground" })
            }
            EventKind::Custom(s) => s.clone(),
        };
        println!(
            "  {:<22} t={:>6.3}s   x={:>7.1}ft   v={:>6.1}ft/s   h={:>6.2}ft",
            label, e.time, e.sample.position, e.sample.velocity, e.sample.altitude
        );
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    match summary.liftoff {
        Some(m) => println!(
            "  Ground roll:   {:>8.1} ft    ({})",
            m.position,
            if summary.lifted_off_within_runway { "within runway" } else { "PAST RUNWAY END" }
        ),
        None => println!("  Ground roll:   no liftoff"),
    }
    if let Some(vs) = summary.stall_speed {
        println!("  Stall speed:   {:>8.1} ft/s  (1.2 Vs = {:.1} ft/s)", vs, 1.2 * vs);
    }
    println!("  Max speed:     {:>8.1} ft/s", summary.max_speed);
    println!("  Max altitude:  {:>8.2} ft", summary.max_altitude);
    println!("  Outcome:       {:?}", summary.outcome);
    println!();

    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>7}  {:>6}  {:>7}  {:>7}  {:>6}",
        "t (s)", "x (ft)", "v (ft/s)", "h (ft)", "alpha", "L (lbf)", "T (lbf)", "phase"
    );
    println!("  {}", "─".repeat(66));

    let n = traj.samples.len();
    let interval = (n / 30).max(1);
    for (i, s) in traj.samples.iter().enumerate() {
        if i % interval != 0 && i + 1 != n {
            continue;
        }
        let phase = match s.phase {
            Phase::GroundRoll => "ROLL",
            Phase::Climb => "CLIMB",
            Phase::Terminated => "END",
        };
        println!(
            "  {:>7.3}  {:>8.1}  {:>8.2}  {:>7.2}  {:>6.2}  {:>7.2}  {:>7.2}  {:>6}",
            s.time, s.position, s.velocity, s.altitude, s.alpha_deg, s.lift, s.thrust, phase
        );
    }

    println!();
    println!("  Simulation: {} steps, dt={} s", n, cfg.dt);
    println!("====================================================================");
    println!();
}

// ---------------------------------------------------------------------------
// sweep
// ---------------------------------------------------------------------------

fn sweep(
    scenario: PathBuf,
    from: f64,
    to: f64,
    count: usize,
    options: SweepOptions,
    csv: Option<PathBuf>,
) -> Result<()> {
    if count == 0 {
        bail!("sweep needs at least one wing area");
    }
    let loaded = load(&scenario)?;
    let LoadedScenario { scenario: sc, polar, propulsion } = &loaded;
    let thrust = propulsion.model()?;

    let areas = linspace(from, to, count);
    let entries = sweep_wing_area(
        &sc.aircraft,
        &areas,
        polar,
        thrust.as_ref(),
        &sc.environment,
        sc.simulation,
        options,
    );

    println!();
    println!("  Wing-area sweep: {} ({} configurations)", sc.aircraft.name, entries.len());
    println!("  {}", "─".repeat(66));
    println!(
        "  {:>9}  {:>11}  {:>10}  {:>10}  {:>8}",
        "S (ft^2)", "status", "x_lo (ft)", "v_lo (ft/s)", "runway"
    );
    for e in &entries {
        match &e.status {
            SweepStatus::Completed(s) => {
                let (x, v) = s
                    .liftoff
                    .map(|m| (format!("{:.1}", m.position), format!("{:.1}", m.velocity)))
                    .unwrap_or_else(|| ("-".into(), "-".into()));
                println!(
                    "  {:>9.3}  {:>11}  {:>10}  {:>10}  {:>8}",
                    e.wing_area,
                    e.status.label(),
                    x,
                    v,
                    if s.lifted_off_within_runway { "ok" } else { "over" }
                );
                for w in &s.warnings {
                    eprintln!("[warn] S={:.3}: {w}", e.wing_area);
                }
            }
            SweepStatus::Infeasible(reason) => {
                println!("  {:>9.3}  {:>11}", e.wing_area, e.status.label());
                eprintln!("[warn] S={:.3} skipped: {reason}", e.wing_area);
            }
            SweepStatus::Failed(err) => {
                println!("  {:>9.3}  {:>11}", e.wing_area, e.status.label());
                eprintln!("[warn] S={:.3} failed: {err}", e.wing_area);
            }
        }
    }
    println!();

    if let Some(path) = csv {
        io::csv::write_sweep_file(&path, &entries)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("  Sweep written to {}", path.display());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// thrust / polar queries
// ---------------------------------------------------------------------------

fn thrust(
    csv: PathBuf,
    rpm: u32,
    velocity: Option<f64>,
    propeller: Option<String>,
    unit: VelocityUnit,
    fit: bool,
) -> Result<()> {
    let table = io::load_thrust_table(&csv, unit, propeller.as_deref())
        .with_context(|| format!("loading {}", csv.display()))?;
    println!("  Stored RPMs: {:?}", table.rpms());

    if let Some(v) = velocity {
        let t = table.thrust_at(rpm, v)?;
        println!("  Thrust at {rpm} RPM and {v} {unit:?}: {t:.3} lbf");
    }
    if fit {
        let Some(nearest) = table.nearest_rpm(rpm) else {
            bail!("thrust table is empty");
        };
        let curve = table.fit_curve(nearest)?;
        println!(
            "  Fitted curve at {nearest} RPM (table units): a={:.6e} b={:.6e} c={:.4}",
            curve.a, curve.b, curve.c
        );
    }
    Ok(())
}

fn polar(csv: PathBuf, airfoil: Option<String>, reynolds: Option<f64>, alpha: f64) -> Result<()> {
    let Some(name) = airfoil else {
        let file = std::fs::File::open(&csv).with_context(|| format!("opening {}", csv.display()))?;
        for n in io::list_airfoils(file)? {
            println!("{n}");
        }
        return Ok(());
    };

    let table = io::load_polar(&csv, &name)?;
    let (lo, hi) = table.alpha_range();
    println!("  {} : {} rows, alpha {lo}..{hi} deg", table.name(), table.len());
    println!("  Reynolds buckets: {:?}", table.reynolds_numbers());
    if let Some(re) = reynolds {
        let c = table.coefficients(re, alpha);
        println!(
            "  Re={re:.0} alpha={alpha}: CL={:.4} CD={:.5} CLmax={:.4}",
            c.cl,
            c.cd,
            table.cl_max(re)
        );
    }
    Ok(())
}
