use std::{
    sync::{Arc, mpsc},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use log::{debug, info, warn};
use parking_lot::{Condvar, Mutex};

use crate::models::Line;

use super::{
    cancel::CancellationToken, live::LivePaginator, page::PaginationResult,
    settings::ExportSettings, style::Stylesheet,
};

enum Job {
    Paginate {
        generation: u64,
        lines: Arc<[Line]>,
        settings: ExportSettings,
        cancel: CancellationToken,
    },
    Shutdown,
}

/// A finished run and the snapshot generation it belongs to.
#[derive(Debug, Clone)]
pub struct Finished {
    pub generation: u64,
    pub result: PaginationResult,
}

#[derive(Default)]
struct Shared {
    latest: Mutex<Option<Finished>>,
    ready: Condvar,
    running: Mutex<CancellationToken>,
}

/// Paginates line snapshots on a background thread.
///
/// Submitting a snapshot cancels the run in flight; only the newest
/// snapshot waiting in the queue is laid out. Results are published with
/// the generation number `submit` returned.
pub struct PaginationWorker {
    sender: mpsc::Sender<Job>,
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl PaginationWorker {
    pub fn spawn(stylesheet: Arc<dyn Stylesheet + Send + Sync>) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let shared = Arc::new(Shared::default());
        let handle = thread::Builder::new()
            .name("pagination".to_string())
            .spawn({
                let shared = Arc::clone(&shared);
                move || work(receiver, shared, stylesheet)
            })?;
        Ok(Self {
            sender,
            shared,
            handle: Some(handle),
            generation: 0,
        })
    }

    /// Queues a snapshot, canceling the current run. Returns its generation.
    pub fn submit(&mut self, lines: Arc<[Line]>, settings: ExportSettings) -> u64 {
        self.generation += 1;
        let cancel = CancellationToken::new();
        {
            let mut running = self.shared.running.lock();
            running.cancel();
            *running = cancel.clone();
        }
        let job = Job::Paginate {
            generation: self.generation,
            lines,
            settings,
            cancel,
        };
        if self.sender.send(job).is_err() {
            warn!("pagination worker is gone; generation {} dropped", self.generation);
        }
        self.generation
    }

    /// The newest published result.
    pub fn latest(&self) -> Option<Finished> {
        self.shared.latest.lock().clone()
    }

    /// Blocks until generation `generation` or a newer one is published.
    pub fn wait_for(&self, generation: u64, timeout: Duration) -> Option<Finished> {
        let deadline = Instant::now() + timeout;
        let mut latest = self.shared.latest.lock();
        loop {
            if let Some(finished) = latest.as_ref().filter(|f| f.generation >= generation) {
                return Some(finished.clone());
            }
            if self.shared.ready.wait_until(&mut latest, deadline).timed_out() {
                return None;
            }
        }
    }
}

impl Drop for PaginationWorker {
    fn drop(&mut self) {
        self.shared.running.lock().cancel();
        let _ = self.sender.send(Job::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("pagination worker panicked");
            }
        }
    }
}

fn work(receiver: mpsc::Receiver<Job>, shared: Arc<Shared>, stylesheet: Arc<dyn Stylesheet + Send + Sync>) {
    info!("pagination worker started");
    let mut live = LivePaginator::new();
    while let Ok(mut job) = receiver.recv() {
        while let Ok(newer) = receiver.try_recv() {
            job = newer;
        }
        let Job::Paginate {
            generation,
            lines,
            settings,
            cancel,
        } = job
        else {
            break;
        };

        let result = live.paginate(&lines, &settings, stylesheet.as_ref(), &cancel);
        if result.canceled {
            debug!("pagination of generation {generation} superseded");
            continue;
        }
        let finished = Finished {
            generation,
            result: result.clone(),
        };
        *shared.latest.lock() = Some(finished);
        shared.ready.notify_all();
    }
    info!("pagination worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{editing::Screenplay, pagination::style::MonospaceStylesheet};

    #[test]
    fn publishes_newest_generation() {
        let mut worker = PaginationWorker::spawn(Arc::new(MonospaceStylesheet::new())).unwrap();
        let mut doc = Screenplay::parse_full("INT. A\n\nOne.\n");
        worker.submit(doc.snapshot(), ExportSettings::default());
        doc.apply(crate::editing::Cmd::InsertText {
            at: 0,
            text: "EXT. B\n\n".into(),
        });
        let generation = worker.submit(doc.snapshot(), ExportSettings::default());
        assert_eq!(generation, 2);

        let finished = worker.wait_for(generation, Duration::from_secs(10)).unwrap();
        assert_eq!(finished.generation, 2);
        assert_eq!(finished.result.pages.len(), 1);
        assert_eq!(finished.result.pages[0].blocks.len(), 3);
        assert_eq!(worker.latest().map(|f| f.generation), Some(2));
    }

    #[test]
    fn wait_times_out_without_results() {
        let worker = PaginationWorker::spawn(Arc::new(MonospaceStylesheet::new())).unwrap();
        assert!(worker.wait_for(1, Duration::from_millis(20)).is_none());
    }
}
