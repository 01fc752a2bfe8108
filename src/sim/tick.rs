//! Fixed-interval simulation loop
//!
//! The simulation runs on its own thread. Each tick it sleeps a constant
//! interval, measures the wall-clock time since the previous tick and feeds
//! it to [`GameManager::update`] as Δt. The presentation side talks to it
//! through a [`TickHandle`]: a bounded command queue, pause/reset/end flags
//! and the last published [`Snapshot`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, SyncSender, TryRecvError, TrySendError, sync_channel};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::entity::Direction;
use super::manager::GameManager;
use super::state::{GamePhase, Snapshot};
use crate::error::Result;
use crate::settings::Settings;

/// What a single step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Advanced,
    Paused,
    /// End signal observed; the loop should exit
    Stopped,
    GameOver,
}

#[derive(Debug, Default)]
struct Control {
    paused: AtomicBool,
    stop: AtomicBool,
    reset: AtomicBool,
}

type Published = Arc<RwLock<Arc<Snapshot>>>;

/// Owns the manager on the simulation side
pub struct TickDriver {
    manager: GameManager,
    commands: Receiver<Direction>,
    control: Arc<Control>,
    published: Published,
    interval: Duration,
}

/// Presentation-side handle
#[derive(Clone)]
pub struct TickHandle {
    commands: SyncSender<Direction>,
    control: Arc<Control>,
    published: Published,
}

/// Wire a manager to a new driver/handle pair
pub fn channel(manager: GameManager, settings: &Settings) -> (TickDriver, TickHandle) {
    let (tx, rx) = sync_channel(settings.input_queue_capacity.max(1));
    let control = Arc::new(Control::default());
    let published = Arc::new(RwLock::new(Arc::new(manager.snapshot())));
    let driver = TickDriver {
        manager,
        commands: rx,
        control: control.clone(),
        published: published.clone(),
        interval: settings.tick_interval(),
    };
    let handle = TickHandle {
        commands: tx,
        control,
        published,
    };
    (driver, handle)
}

impl TickDriver {
    pub fn manager(&self) -> &GameManager {
        &self.manager
    }

    /// Run one tick with an explicit Δt
    pub fn step(&mut self, dt_ms: f32) -> Result<TickOutcome> {
        if self.control.stop.load(Ordering::Acquire) {
            self.manager.end_game();
            self.publish();
            return Ok(TickOutcome::Stopped);
        }
        // Paused ticks leave queued commands where they are
        if self.control.paused.load(Ordering::Acquire) {
            return Ok(TickOutcome::Paused);
        }
        if self.control.reset.swap(false, Ordering::AcqRel) {
            self.manager.reset()?;
        }

        // Commands wait in the queue until a run is in progress
        if self.manager.phase() == GamePhase::Running {
            match self.commands.try_recv() {
                Ok(direction) => {
                    self.manager.move_player(direction)?;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {}
            }
        }
        self.manager.update(dt_ms)?;
        self.publish();

        if self.manager.is_game_over() {
            Ok(TickOutcome::GameOver)
        } else {
            Ok(TickOutcome::Advanced)
        }
    }

    /// Loop until the end signal; hands the manager back for inspection
    pub fn run(mut self) -> Result<GameManager> {
        log::info!("Simulation loop started ({:?} per tick)", self.interval);
        let mut last = Instant::now();
        loop {
            thread::sleep(self.interval);
            let now = Instant::now();
            let dt_ms = now.duration_since(last).as_secs_f32() * 1000.0;
            // Time is re-based every tick, paused or not, so resume never bursts
            last = now;
            if self.step(dt_ms)? == TickOutcome::Stopped {
                break;
            }
        }
        log::info!("Simulation loop stopped after {} ticks", self.manager.ticks());
        Ok(self.manager)
    }

    /// Run the loop on a dedicated thread
    pub fn spawn(self) -> Result<JoinHandle<Result<GameManager>>> {
        let handle = thread::Builder::new().name("simulation".to_string()).spawn(move || {
            let result = self.run();
            if let Err(e) = &result {
                log::error!("Simulation loop failed: {}", e);
            }
            result
        })?;
        Ok(handle)
    }

    fn publish(&self) {
        let snapshot = Arc::new(self.manager.snapshot());
        match self.published.write() {
            Ok(mut slot) => *slot = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }
}

impl TickHandle {
    /// Queue a direction; `false` when the queue is full or the loop is gone
    pub fn send(&self, direction: Direction) -> bool {
        match self.commands.try_send(direction) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                log::debug!("Input queue full, dropped {}", direction.as_str());
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    pub fn set_paused(&self, paused: bool) {
        self.control.paused.store(paused, Ordering::Release);
    }

    /// Flip pause; returns the new state
    pub fn toggle_pause(&self) -> bool {
        !self.control.paused.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn is_paused(&self) -> bool {
        self.control.paused.load(Ordering::Acquire)
    }

    /// Start a new run at the next unpaused tick
    pub fn request_reset(&self) {
        self.control.reset.store(true, Ordering::Release);
    }

    /// One-way stop signal, observed at the top of the next tick
    pub fn end_game(&self) {
        self.control.stop.store(true, Ordering::Release);
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        match self.published.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
