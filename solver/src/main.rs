use std::num::NonZero;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use flowwalk::{Location, PuzzleBuilder};
use tracing::{info, warn};

const DEADLINE: Duration = Duration::from_secs(10);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // flow free classic pack level 1
    let puzzle = PuzzleBuilder::with_dims((NonZero::new(5).unwrap(), NonZero::new(5).unwrap()))
        .named("Classic Pack")
        .subtitled("Level 1")
        .add_termini('A', (Location(0, 0), Location(1, 4)))
        .add_termini('B', (Location(2, 0), Location(1, 3)))
        .add_termini('C', (Location(2, 1), Location(2, 4)))
        .add_termini('D', (Location(4, 0), Location(3, 3)))
        .add_termini('E', (Location(4, 1), Location(3, 4)))
        .build()
        .unwrap();

    info!(name = puzzle.name(), subtitle = puzzle.subtitle(), "solving\n{}", puzzle);

    let cancel = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();
    let worker = {
        let cancel = Arc::clone(&cancel);
        let puzzle = puzzle.clone();
        thread::spawn(move || {
            let _ = tx.send(puzzle.solve(&cancel));
        })
    };

    let outcome = match rx.recv_timeout(DEADLINE) {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(deadline = ?DEADLINE, "deadline passed, cancelling");
            cancel.store(true, Ordering::Relaxed);
            rx.recv().unwrap()
        }
    };
    worker.join().unwrap();

    match outcome {
        Ok(solution) => {
            solution.validate(&puzzle).unwrap();
            println!("{}", puzzle.render(Some(&solution)));
        }
        Err(failure) => println!("{failure}"),
    }
}
