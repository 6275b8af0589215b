//! Debounced background search
//!
//! Keystrokes feed a [`SearchDebouncer`]; once it goes quiet the query runs
//! on a [`SearchWorker`] thread. Every request is numbered and only the
//! answer to the newest one is ever handed back, so a slow early search
//! cannot overwrite a later one.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::gateway::{DirectoryEntry, FsGateway};

/// Fires once `delay` has passed since the last keystroke.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn input(&mut self, query: &str, now: Instant) {
        self.pending = Some((query.to_string(), now + self.delay));
    }

    /// The query, if it has become due. Consumes it.
    pub fn take_due(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, at)) if *at <= now => self.pending.take().map(|(q, _)| q),
            _ => None,
        }
    }

    /// How long until the pending query is due.
    pub fn time_left(&self, now: Instant) -> Option<Duration> {
        self.pending.as_ref().map(|(_, at)| at.saturating_duration_since(now))
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

struct Response {
    seq: u64,
    results: Vec<DirectoryEntry>,
}

pub struct SearchWorker {
    gateway: Arc<dyn FsGateway>,
    tx: Sender<Response>,
    rx: Receiver<Response>,
    latest: u64,
    answered: u64,
}

impl SearchWorker {
    pub fn new(gateway: Arc<dyn FsGateway>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { gateway, tx, rx, latest: 0, answered: 0 }
    }

    /// Start a search. Any earlier request still running is superseded.
    pub fn request(&mut self, root: PathBuf, query: String, max_depth: usize) -> u64 {
        self.latest += 1;
        let seq = self.latest;
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        tracing::debug!(seq, query = %query, root = %root.display(), "search issued");
        std::thread::spawn(move || {
            let results = gateway.search_entries(&root, &query, max_depth);
            let _ = tx.send(Response { seq, results });
        });
        seq
    }

    /// Forget every request issued so far.
    pub fn cancel(&mut self) {
        self.latest += 1;
        self.answered = self.latest;
    }

    /// True while the newest request has not been answered.
    pub fn is_busy(&self) -> bool {
        self.answered < self.latest
    }

    /// Results of the newest request, once. Stale answers are dropped.
    pub fn poll(&mut self) -> Option<Vec<DirectoryEntry>> {
        let mut fresh = None;
        while let Ok(response) = self.rx.try_recv() {
            if response.seq == self.latest {
                self.answered = response.seq;
                fresh = Some(response.results);
            } else {
                tracing::debug!(seq = response.seq, latest = self.latest, "stale search result dropped");
            }
        }
        fresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::memory::MemoryGateway;

    fn wait_for(worker: &mut SearchWorker) -> Option<Vec<DirectoryEntry>> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(results) = worker.poll() {
                return Some(results);
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        None
    }

    #[test]
    fn debounce_waits_for_quiet() {
        let start = Instant::now();
        let mut d = SearchDebouncer::new(Duration::from_millis(300));
        d.input("re", start);
        d.input("rep", start + Duration::from_millis(200));
        assert_eq!(d.take_due(start + Duration::from_millis(400)), None);
        assert_eq!(d.take_due(start + Duration::from_millis(500)), Some("rep".into()));
        assert_eq!(d.take_due(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn only_newest_request_is_applied() {
        let fs = MemoryGateway::new()
            .with_file("/d/alpha.txt")
            .with_file("/d/beta.txt");
        let mut worker = SearchWorker::new(Arc::new(fs));

        worker.request("/d".into(), "alpha".into(), 5);
        worker.request("/d".into(), "beta".into(), 5);
        let results = wait_for(&mut worker).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "beta.txt");
        assert!(!worker.is_busy());
    }

    #[test]
    fn cancelled_requests_never_arrive() {
        let fs = MemoryGateway::new().with_file("/d/alpha.txt");
        let mut worker = SearchWorker::new(Arc::new(fs));
        worker.request("/d".into(), "alpha".into(), 5);
        worker.cancel();
        std::thread::sleep(Duration::from_millis(50));
        assert!(worker.poll().is_none());
        assert!(!worker.is_busy());
    }
}
