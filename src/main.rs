//! Lane Hopper headless runner
//!
//! Drives the simulation on its own thread with a simple autopilot feeding
//! the input queue, logging a line per second. Useful for smoke runs and
//! for watching generation with `RUST_LOG=debug`.
//!
//! Usage: `lane-hopper [seconds]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Lane Hopper (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser front ends embed the library directly
}

#[cfg(not(target_arch = "wasm32"))]
const SETTINGS_PATH: &str = "lane_hopper.json";

#[cfg(not(target_arch = "wasm32"))]
fn run() -> lane_hopper::Result<()> {
    use std::thread;
    use std::time::{Duration, Instant};

    use lane_hopper::Settings;
    use lane_hopper::sim::{Direction, GameManager, channel};
    use rand::Rng;

    let seconds: u64 = std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(10);
    let settings = Settings::load(SETTINGS_PATH)?;

    let mut manager = GameManager::new(settings.clone())?;
    manager.reset()?;
    log::info!("Seed {} on {}", manager.seed(), settings.difficulty.as_str());

    let (driver, handle) = channel(manager, &settings);
    let join = driver.spawn()?;

    // Mostly forward, with the odd sidestep
    let mut rng = rand::rng();
    let started = Instant::now();
    let mut last_report = Instant::now();
    while started.elapsed() < Duration::from_secs(seconds) {
        thread::sleep(Duration::from_millis(250));
        let snapshot = handle.snapshot();
        if snapshot.game_over {
            log::info!("Crashed at score {}, starting over", snapshot.score);
            handle.request_reset();
            continue;
        }
        let direction = match rng.random_range(0..10) {
            0 => Direction::Left,
            1 => Direction::Right,
            _ => Direction::Up,
        };
        handle.send(direction);

        if last_report.elapsed() >= Duration::from_secs(1) {
            last_report = Instant::now();
            log::info!(
                "tick {} | score {} | coins {} | power-ups {:?}",
                snapshot.tick,
                snapshot.score,
                snapshot.coins,
                snapshot.power_ups
            );
        }
    }

    handle.end_game();
    let manager = match join.join() {
        Ok(result) => result?,
        Err(_) => {
            log::error!("Simulation thread panicked");
            return Ok(());
        }
    };
    log::info!(
        "Finished after {} ticks: score {}, coins {}",
        manager.ticks(),
        manager.params().score(),
        manager.params().coin_count()
    );
    Ok(())
}
