use life_common::{Density, Snapshot};
use life_engine::{ChannelDisplay, Coordinator, CoordinatorSettings, Display, Grid, Mode};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

const INTERVAL: Duration = Duration::from_millis(50);
const PATIENCE: Duration = Duration::from_secs(3);

fn settings(density: Density) -> CoordinatorSettings {
    CoordinatorSettings {
        width: 24,
        height: 18,
        density,
        run_interval: INTERVAL,
    }
}

fn grid_of(snapshot: &Snapshot) -> Grid {
    let live: Vec<_> = snapshot.live_positions().collect();
    Grid::with_live_cells(snapshot.width, snapshot.height, &live)
}

/// Records each snapshot with its arrival time and holds the simulation thread
/// inside the first `set_field` call until released.
struct GatedDisplay {
    tx: mpsc::Sender<(Instant, Arc<Snapshot>)>,
    release: Option<Receiver<()>>,
}

impl Display for GatedDisplay {
    fn set_field(&mut self, snapshot: Arc<Snapshot>) {
        let _ = self.tx.send((Instant::now(), snapshot));
        if let Some(release) = self.release.take() {
            let _ = release.recv();
        }
    }
}

fn gated(density: Density) -> (Coordinator, Receiver<(Instant, Arc<Snapshot>)>, mpsc::Sender<()>) {
    let (tx, rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let display = GatedDisplay {
        tx,
        release: Some(release_rx),
    };
    let coordinator = Coordinator::spawn(settings(density), display).unwrap();
    (coordinator, rx, release_tx)
}

#[test]
fn repeated_step_requests_coalesce() {
    let (coordinator, rx, release) = gated(Density::new(0.35));
    let (_, initial) = rx.recv_timeout(PATIENCE).unwrap();

    // The loop is parked inside the first publish, so both requests queue up.
    coordinator.request_step();
    coordinator.request_step();
    release.send(()).unwrap();

    let (_, stepped) = rx.recv_timeout(PATIENCE).unwrap();
    assert_eq!(stepped.generation, 1);
    assert_eq!(grid_of(&stepped), grid_of(&initial).step());
    assert_eq!(
        rx.recv_timeout(INTERVAL * 4).unwrap_err(),
        RecvTimeoutError::Timeout
    );
    assert_eq!(coordinator.current_snapshot().generation, 1);
}

#[test]
fn repeated_populate_requests_coalesce() {
    let (coordinator, rx, release) = gated(Density::new(0.5));
    rx.recv_timeout(PATIENCE).unwrap();

    coordinator.request_populate();
    coordinator.request_populate();
    coordinator.request_populate();
    release.send(()).unwrap();

    let (_, populated) = rx.recv_timeout(PATIENCE).unwrap();
    assert_eq!(populated.generation, 0);
    assert_eq!(
        rx.recv_timeout(INTERVAL * 4).unwrap_err(),
        RecvTimeoutError::Timeout
    );
}

#[test]
fn running_advances_one_generation_per_interval() {
    let (display, rx) = ChannelDisplay::new();
    let coordinator = Coordinator::spawn(settings(Density::new(0.35)), display).unwrap();
    let mut previous = rx.recv_timeout(PATIENCE).unwrap();

    coordinator.set_running(true);
    let mut arrivals = Vec::new();
    for _ in 0..5 {
        let next = rx.recv_timeout(PATIENCE).unwrap();
        arrivals.push(Instant::now());
        assert_eq!(next.generation, previous.generation + 1);
        assert_eq!(grid_of(&next), grid_of(&previous).step());
        previous = next;
    }
    assert_eq!(coordinator.mode(), Mode::Running);

    for pair in arrivals.windows(2) {
        let gap = pair[1] - pair[0];
        // Allow for scheduler jitter on the receiving side.
        assert!(gap >= INTERVAL - Duration::from_millis(15), "gap {:?} too short", gap);
        assert!(gap < INTERVAL * 10, "gap {:?} too long", gap);
    }
}

#[test]
fn stopping_halts_generations_after_in_flight_cycle() {
    let (display, rx) = ChannelDisplay::new();
    let coordinator = Coordinator::spawn(settings(Density::new(0.35)), display).unwrap();
    rx.recv_timeout(PATIENCE).unwrap();

    coordinator.set_running(true);
    rx.recv_timeout(PATIENCE).unwrap();
    rx.recv_timeout(PATIENCE).unwrap();
    coordinator.set_running(false);

    // At most one generation may still land: the one being computed when the stop arrived.
    let stopped_at = Instant::now();
    let mut late = 0;
    while rx.recv_timeout(INTERVAL * 2).is_ok() {
        late += 1;
        assert!(stopped_at.elapsed() < PATIENCE);
    }
    assert!(late <= 1, "{} generations after stop", late);

    let generation = coordinator.current_snapshot().generation;
    assert_eq!(
        rx.recv_timeout(INTERVAL * 4).unwrap_err(),
        RecvTimeoutError::Timeout
    );
    assert_eq!(coordinator.current_snapshot().generation, generation);
    assert_eq!(coordinator.mode(), Mode::Idle);
}

#[test]
fn step_requests_are_ignored_while_running() {
    let (display, rx) = ChannelDisplay::new();
    let coordinator = Coordinator::spawn(settings(Density::new(0.35)), display).unwrap();
    rx.recv_timeout(PATIENCE).unwrap();

    coordinator.set_running(true);
    let first = rx.recv_timeout(PATIENCE).unwrap();
    coordinator.request_step();
    coordinator.request_step();
    let second = rx.recv_timeout(PATIENCE).unwrap();
    assert_eq!(second.generation, first.generation + 1);
    coordinator.set_running(false);

    while rx.recv_timeout(INTERVAL * 2).is_ok() {}
    // No deferred step fires once the run is over.
    assert_eq!(
        rx.recv_timeout(INTERVAL * 4).unwrap_err(),
        RecvTimeoutError::Timeout
    );
}

#[test]
fn populate_while_running_restarts_from_fresh_grid() {
    let (display, rx) = ChannelDisplay::new();
    let coordinator = Coordinator::spawn(settings(Density::new(0.35)), display).unwrap();
    rx.recv_timeout(PATIENCE).unwrap();

    coordinator.set_running(true);
    rx.recv_timeout(PATIENCE).unwrap();
    coordinator.set_density(Density::FULL);
    coordinator.request_populate();

    let deadline = Instant::now() + PATIENCE;
    let populated = loop {
        let snapshot = rx.recv_timeout(PATIENCE).unwrap();
        if snapshot.generation == 0 {
            break snapshot;
        }
        assert!(Instant::now() < deadline, "populate never published");
    };
    assert_eq!(populated.live_cells, 24 * 18);

    // Running continues from the new population: a full grid dies in one step.
    let next = rx.recv_timeout(PATIENCE).unwrap();
    assert_eq!(next.generation, 1);
    assert_eq!(next.live_cells, 0);
    coordinator.set_running(false);
}

#[test]
fn requests_never_block_the_caller() {
    let (coordinator, rx, release) = gated(Density::new(0.2));
    rx.recv_timeout(PATIENCE).unwrap();

    // The loop is stuck in the display; the interaction side must still return at once.
    let started = Instant::now();
    for _ in 0..1_000 {
        coordinator.request_step();
        coordinator.set_density(Density::new(0.3));
        coordinator.request_populate();
    }
    coordinator.set_running(false);
    let _ = coordinator.current_snapshot();
    let _ = coordinator.mode();
    assert!(started.elapsed() < Duration::from_millis(500));
    release.send(()).unwrap();
}
