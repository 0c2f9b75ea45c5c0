use std::{path::Path, sync::Arc, time::{Duration, Instant}};

use nalgebra::Vector3;
use sky_dome::{
    catalog::{BodyKind, Catalog, generator::XorShift64Star},
    log_utils,
    options::Options,
    orientation::sensors::{HeadingReference, HeadingSample, ScriptedSensors},
    sky::{Placement, SkyDome, SystemClock},
    sky_math::coords::{HorizCoord, ViewMode},
    utils::{io_utils::*, sexagesimal::value_to_sexagesimal},
};

const RUN_TIME: Duration = Duration::from_secs(3);
const FRAME_PERIOD: Duration = Duration::from_millis(33);

fn panic_handler(
    panic_info:        &std::panic::PanicHookInfo,
    logs_dir:          &Path,
    def_panic_handler: &(dyn Fn(&std::panic::PanicHookInfo<'_>) + 'static + Sync + Send),
) {
    let payload_str =
        if let Some(msg) = panic_info.payload().downcast_ref::<&'static str>() {
            Some(*msg)
        } else if let Some(msg) = panic_info.payload().downcast_ref::<String>() {
            Some(msg.as_str())
        } else {
            None
        };

    log::error!("PANIC OCCURRED");

    if let Some(payload) = &payload_str {
        log::error!("Panic payload: {}", payload);
    }

    if let Some(loc) = panic_info.location() {
        log::error!("Panic location: {}", loc);
    }

    log::error!(
        "Panic stacktrace: {}",
        std::backtrace::Backtrace::force_capture()
    );

    eprintln!(
        "{} ver {} crashed, look logs at {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        logs_dir.display()
    );

    def_panic_handler(panic_info);
}

/// Hand-held device facing roughly south-east: heading jitter of a few
/// degrees and a slightly raised top edge
fn simulated_sensors(seed: u64, samples: usize) -> ScriptedSensors {
    let mut rng = XorShift64Star::new(seed);
    let mut sensors = ScriptedSensors::new();
    for _ in 0..samples {
        let degrees = 135.0 + rng.range(-3.0, 3.0);
        sensors.push_heading(Ok(HeadingSample { degrees, reference: HeadingReference::Magnetic }));
    }
    let g = 9.81;
    let pitch = 15f64.to_radians();
    sensors.set_acceleration(Ok(Vector3::new(0.0, g * pitch.sin(), g * pitch.cos())));
    sensors
}

fn describe(horiz: &HorizCoord) -> String {
    format!(
        "alt {} az {}",
        value_to_sexagesimal(horiz.alt, true),
        value_to_sexagesimal(horiz.az, true)
    )
}

fn run(options: &Options) -> anyhow::Result<()> {
    let catalog = Arc::new(Catalog::new(&options.catalog));
    for star in catalog.brightest(3) {
        log::info!("Bright star {} ({}) mag {:.2}", star.name, star.constellation, star.magnitude);
    }

    let frames = (RUN_TIME.as_millis() / FRAME_PERIOD.as_millis()) as usize;
    let sensors = simulated_sensors(catalog.seed(), frames);
    let mut dome = SkyDome::new(
        options.clone(),
        Arc::clone(&catalog),
        Box::new(SystemClock),
        Box::new(sensors),
    )?;
    dome.initialize();
    if let Err(err) = dome.recalibrate() {
        log::warn!("Starting without compass baseline: {}", err);
    }

    let started = Instant::now();
    let mut last_frame = Instant::now();
    while started.elapsed() < RUN_TIME {
        std::thread::sleep(FRAME_PERIOD);
        let elapsed = last_frame.elapsed();
        last_frame = Instant::now();
        dome.tick(elapsed);
    }

    dome.set_view_mode(ViewMode::Horizon);
    let snapshot = dome.snapshot();
    let orientation = dome.orientation();
    log::info!(
        "JD {:.5}, LST {}, moon phase {:.3}, illuminated {:.3}",
        snapshot.jd,
        value_to_sexagesimal(snapshot.lst / 15.0, true),
        snapshot.moon_phase,
        snapshot.moon_illumination,
    );
    log::info!(
        "Orientation {:?}/{:?}, heading {:?}, relative {:?}, tilt {:?}",
        orientation.state,
        orientation.mode,
        orientation.smoothed_heading,
        orientation.relative_heading(),
        orientation.tilt,
    );

    let mut visible = 0;
    for pos in &snapshot.bodies {
        let Placement::Horizontal(horiz) = &pos.placement else { continue; };
        if horiz.is_above_horizon() {
            visible += 1;
        }
        let body = &catalog.bodies()[pos.index];
        if body.kind != BodyKind::Star {
            println!("{:<8} {}", body.name, describe(horiz));
        }
    }
    println!("{} of {} bodies above the horizon", visible, snapshot.bodies.len());
    log::info!("{} of {} bodies above the horizon", visible, snapshot.bodies.len());

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut logs_dir = get_app_dir()?;
    logs_dir.push("logs");
    let _logger = log_utils::start_logger(&logs_dir, "info", 14/*days*/)?;

    log::info!(
        "{} {} ver. {} is started",
        env!("CARGO_PKG_NAME"),
        std::env::consts::ARCH,
        env!("CARGO_PKG_VERSION")
    );

    std::panic::set_hook({
        let logs_dir = logs_dir.clone();
        let default_panic_handler = std::panic::take_hook();
        Box::new(move |panic_info| {
            panic_handler(panic_info, &logs_dir, default_panic_handler.as_ref())
        })
    });

    let mut options = Options::default();
    if let Err(err) = load_json_from_config_file(&mut options, "options") {
        log::error!("Can't load options: {}", err);
    }
    if let Err(err) = options.check() {
        log::error!("Invalid options, using defaults: {}", err);
        options = Options::default();
    }

    let result = run(&options);
    if let Err(err) = &result {
        log::error!("{}", err);
    }

    _ = save_json_to_config::<Options>(&options, "options");
    log::info!("Options saved");

    result
}
