use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use chrono::Utc;

use crate::io::remote::RemoteClient;
use crate::io::store::retention_filter;
use crate::model::Task;

/// Work for the background sync thread
pub enum SyncJob {
    /// Read the mirrored document
    Fetch,
    /// Replace the mirrored document with this snapshot
    Push(Vec<Task>),
}

/// Completed work, delivered back to the UI thread
#[derive(Debug)]
pub enum SyncEvent {
    FetchDone(Vec<Task>),
    FetchFailed(String),
    PushDone,
    PushFailed(String),
}

/// Owns the thread that talks to the remote store so the UI never blocks
/// on the network. Jobs go in over a channel; events come back the same
/// way and are drained with `poll`. Dropping the worker retires the
/// thread once its queue runs dry.
pub struct SyncWorker {
    jobs: Sender<SyncJob>,
    events: Receiver<SyncEvent>,
}

impl SyncWorker {
    pub fn start(client: RemoteClient) -> SyncWorker {
        let (job_tx, job_rx) = mpsc::channel::<SyncJob>();
        let (event_tx, event_rx) = mpsc::channel::<SyncEvent>();

        thread::spawn(move || {
            for job in job_rx {
                let event = match job {
                    SyncJob::Fetch => match client.fetch_document() {
                        Ok(tasks) => SyncEvent::FetchDone(tasks),
                        Err(e) => SyncEvent::FetchFailed(e.to_string()),
                    },
                    SyncJob::Push(tasks) => {
                        let payload = retention_filter(&tasks, Utc::now());
                        match client.put_document(&payload) {
                            Ok(()) => SyncEvent::PushDone,
                            Err(e) => SyncEvent::PushFailed(e.to_string()),
                        }
                    }
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        SyncWorker {
            jobs: job_tx,
            events: event_rx,
        }
    }

    /// Queue work; silently dropped if the thread has exited
    pub fn submit(&self, job: SyncJob) {
        let _ = self.jobs.send(job);
    }

    /// Drain completed work without blocking
    pub fn poll(&self) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::local::seed_tasks;
    use std::time::{Duration, Instant};

    fn unreachable_client() -> RemoteClient {
        RemoteClient::new(
            "http://127.0.0.1:9/v1/json",
            "doc-key",
            "",
            Duration::from_millis(300),
        )
    }

    fn wait_for_events(worker: &SyncWorker, want: usize) -> Vec<SyncEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut events = Vec::new();
        while events.len() < want && Instant::now() < deadline {
            events.extend(worker.poll());
            thread::sleep(Duration::from_millis(20));
        }
        events
    }

    #[test]
    fn fetch_failure_comes_back_as_event() {
        let worker = SyncWorker::start(unreachable_client());
        worker.submit(SyncJob::Fetch);

        let events = wait_for_events(&worker, 1);
        assert_eq!(events.len(), 1);
        match &events[0] {
            SyncEvent::FetchFailed(msg) => assert!(msg.contains("unreachable")),
            other => panic!("expected FetchFailed, got {:?}", other),
        }
    }

    #[test]
    fn jobs_run_in_order() {
        let worker = SyncWorker::start(unreachable_client());
        worker.submit(SyncJob::Fetch);
        worker.submit(SyncJob::Push(seed_tasks()));

        let events = wait_for_events(&worker, 2);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SyncEvent::FetchFailed(_)));
        assert!(matches!(events[1], SyncEvent::PushFailed(_)));
    }
}
