use crate::display::Display;
use crate::life_state::LifeState;
use anyhow::{Context, Result};
use life_common::{Density, LifeConfig, Snapshot};
use log::{debug, error, info, trace, warn};
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

/// What the simulation loop is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Blocked, waiting for an intent.
    Idle,
    Populating,
    Stepping,
    /// Advancing one generation per run interval until stopped.
    Running,
}

/// Requests sent from the interaction thread to the simulation loop.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Intent {
    Populate,
    Step,
    SetRunning(bool),
    SetDensity(Density),
    Shutdown,
}

/// Fixed parameters of a coordinator, established once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorSettings {
    pub width: usize,
    pub height: usize,
    /// Density of the initial population and of later populates until changed.
    pub density: Density,
    /// Pause between generations while running.
    pub run_interval: Duration,
}

impl CoordinatorSettings {
    pub fn from_config(config: &LifeConfig) -> Self {
        Self {
            width: config.grid.width,
            height: config.grid.height,
            density: config.default_density(),
            run_interval: config.run_interval(),
        }
    }
}

/// State shared between the handle and the loop, guarded by one lock.
#[derive(Debug)]
struct Published {
    snapshot: Arc<Snapshot>,
    mode: Mode,
}

fn lock(shared: &Mutex<Published>) -> MutexGuard<'_, Published> {
    // A panic elsewhere cannot leave `Published` half-written; keep going.
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a simulation loop running on its own thread.
///
/// Every request method only enqueues an intent and returns immediately; none of
/// them wait for the loop. Requests of the same kind that pile up before the loop
/// looks at them collapse into one. Dropping the handle stops and joins the loop.
pub struct Coordinator {
    tx: mpsc::Sender<Intent>,
    shared: Arc<Mutex<Published>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Coordinator {
    /// Populates the grid at `settings.density`, then starts the simulation thread.
    /// The generation-0 snapshot is the first thing `display` receives.
    pub fn spawn<D>(settings: CoordinatorSettings, display: D) -> Result<Self>
    where
        D: Display + 'static,
    {
        let mut state = LifeState::new(settings.width, settings.height);
        state.populate(settings.density);
        let initial = Arc::new(state.snapshot());
        info!(
            "Initial population: {} live cells on a {}x{} grid (density {:.2}).",
            initial.live_cells,
            settings.width,
            settings.height,
            settings.density.get()
        );

        let shared = Arc::new(Mutex::new(Published {
            snapshot: Arc::clone(&initial),
            mode: Mode::Idle,
        }));
        let (tx, rx) = mpsc::channel::<Intent>();
        let worker = SimulationLoop {
            state,
            density: settings.density,
            running: false,
            run_interval: settings.run_interval,
            rx,
            display: Box::new(display),
            shared: Arc::clone(&shared),
        };
        let handle = thread::Builder::new()
            .name("life-simulation".into())
            .spawn(move || worker.run(initial))
            .context("failed to spawn simulation thread")?;

        Ok(Self {
            tx,
            shared,
            handle: Some(handle),
        })
    }

    /// Asks for a fresh random population at the current density.
    pub fn request_populate(&self) {
        self.send(Intent::Populate);
    }

    /// Asks for exactly one generation to be computed. Ignored while running.
    pub fn request_step(&self) {
        self.send(Intent::Step);
    }

    /// Starts or stops continuous running. Stopping takes effect before the next
    /// generation would be computed; a generation already in progress completes.
    pub fn set_running(&self, running: bool) {
        self.send(Intent::SetRunning(running));
    }

    /// Sets the density used by subsequent populates.
    pub fn set_density(&self, density: Density) {
        self.send(Intent::SetDensity(density));
    }

    /// The most recently published grid.
    pub fn current_snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&lock(&self.shared).snapshot)
    }

    pub fn mode(&self) -> Mode {
        lock(&self.shared).mode
    }

    fn send(&self, intent: Intent) {
        if self.tx.send(intent).is_err() {
            warn!("Simulation loop has exited; {:?} dropped.", intent);
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        let _ = self.tx.send(Intent::Shutdown);
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.join() {
                error!("Simulation thread panicked: {:?}", err);
            }
        }
    }
}

/// Intents observed since the loop last acted, coalesced to flags.
#[derive(Debug, Default)]
struct Pending {
    populate: bool,
    step: bool,
    shutdown: bool,
}

/// The simulation side: sole owner of the grid buffers.
struct SimulationLoop {
    state: LifeState,
    density: Density,
    running: bool,
    run_interval: Duration,
    rx: mpsc::Receiver<Intent>,
    display: Box<dyn Display>,
    shared: Arc<Mutex<Published>>,
}

impl SimulationLoop {
    fn run(mut self, initial: Arc<Snapshot>) {
        info!(
            "Simulation loop started (run interval {} ms).",
            self.run_interval.as_millis()
        );
        self.display.set_field(initial);

        // Deadline of the next generation while running.
        let mut next_tick: Option<Instant> = None;
        loop {
            let mut pending = Pending::default();
            if !self.running {
                next_tick = None;
                self.set_mode(Mode::Idle);
                self.wait_for_intent(&mut pending);
            } else if let Some(deadline) = next_tick {
                self.pace(deadline, &mut pending);
            }
            self.drain(&mut pending);
            if pending.shutdown {
                break;
            }

            if self.running {
                next_tick = Some(Instant::now() + self.run_interval);
                self.set_mode(Mode::Running);
                // A populate raised mid-run replaces this tick's step.
                if pending.populate {
                    self.populate();
                } else {
                    self.advance();
                }
            } else {
                if pending.populate {
                    self.set_mode(Mode::Populating);
                    self.populate();
                }
                if pending.step {
                    self.set_mode(Mode::Stepping);
                    self.advance();
                }
            }
        }

        self.set_mode(Mode::Idle);
        info!(
            "Simulation loop stopped at generation {}.",
            self.state.generation()
        );
    }

    /// Blocks until one intent arrives.
    fn wait_for_intent(&mut self, pending: &mut Pending) {
        match self.rx.recv() {
            Ok(intent) => self.absorb(intent, pending),
            Err(_) => pending.shutdown = true,
        }
    }

    /// Sleeps until `deadline`, absorbing intents as they come. Returns early if
    /// running is switched off or the coordinator shuts down.
    fn pace(&mut self, deadline: Instant, pending: &mut Pending) {
        while self.running && !pending.shutdown {
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            match self.rx.recv_timeout(deadline - now) {
                Ok(intent) => self.absorb(intent, pending),
                Err(RecvTimeoutError::Timeout) => return,
                Err(RecvTimeoutError::Disconnected) => pending.shutdown = true,
            }
        }
    }

    /// Takes every intent already queued without blocking.
    fn drain(&mut self, pending: &mut Pending) {
        loop {
            match self.rx.try_recv() {
                Ok(intent) => self.absorb(intent, pending),
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    pending.shutdown = true;
                    return;
                }
            }
        }
    }

    fn absorb(&mut self, intent: Intent, pending: &mut Pending) {
        debug!("Observed {:?}.", intent);
        match intent {
            Intent::Populate => pending.populate = true,
            Intent::Step if self.running => debug!("Step ignored while running."),
            Intent::Step => pending.step = true,
            Intent::SetRunning(running) => {
                if running != self.running {
                    info!("{} continuous run.", if running { "Starting" } else { "Stopping" });
                }
                self.running = running;
            }
            Intent::SetDensity(density) => self.density = density,
            Intent::Shutdown => pending.shutdown = true,
        }
    }

    fn populate(&mut self) {
        self.state.populate(self.density);
        debug!(
            "Populated at density {:.2}: {} live cells.",
            self.density.get(),
            self.state.current().live_count()
        );
        self.publish();
    }

    fn advance(&mut self) {
        let started = Instant::now();
        self.state.step();
        trace!(
            "Generation {} computed in {:.2} ms.",
            self.state.generation(),
            started.elapsed().as_secs_f64() * 1000.0
        );
        self.publish();
    }

    /// Hands a copy of the current generation to the shared slot and the display.
    fn publish(&mut self) {
        let snapshot = Arc::new(self.state.snapshot());
        lock(&self.shared).snapshot = Arc::clone(&snapshot);
        self.display.set_field(snapshot);
    }

    fn set_mode(&self, mode: Mode) {
        lock(&self.shared).mode = mode;
    }
}
