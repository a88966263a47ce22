use crate::governance::client::FetchError;
use std::sync::mpsc;
use std::thread;

/// Lifecycle of one logical user action. Exactly one instance exists
/// per action per screen; re-invocation overwrites rather than queues.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> RequestState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestState::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

/// Orchestrates one logical action across overlapping invocations.
///
/// Each `dispatch` bumps a monotonic sequence number and runs the job
/// on a worker thread; `poll` applies only results tagged with the
/// current sequence. Last-issued wins: a stale resolution arriving
/// after a newer call has resolved is dropped on the floor. Dropping
/// the tracker (navigating away) closes the channel, so in-flight
/// responses become no-ops.
pub struct Tracker<T> {
    seq: u64,
    state: RequestState<T>,
    tx: mpsc::Sender<(u64, Result<T, FetchError>)>,
    rx: mpsc::Receiver<(u64, Result<T, FetchError>)>,
}

impl<T: Send + 'static> Tracker<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            seq: 0,
            state: RequestState::Idle,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> &RequestState<T> {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Issue (or supersede) the action. The triggering control should
    /// disable itself while `is_pending`.
    pub fn dispatch<F>(&mut self, job: F)
    where
        F: FnOnce() -> Result<T, FetchError> + Send + 'static,
    {
        self.seq += 1;
        let seq = self.seq;
        let tx = self.tx.clone();
        self.state = RequestState::Pending;
        thread::spawn(move || {
            // The receiver may be gone if the screen was torn down.
            let _ = tx.send((seq, job()));
        });
    }

    /// Drain completed work. Returns the newly applied outcome, if any,
    /// so the owning screen can derive placeholder content from it.
    pub fn poll(&mut self) -> Option<Result<T, FetchError>>
    where
        T: Clone,
    {
        let mut applied = None;
        while let Ok((seq, result)) = self.rx.try_recv() {
            if seq != self.seq {
                tracing::debug!(stale = seq, current = self.seq, "dropping stale response");
                continue;
            }
            self.state = match &result {
                Ok(value) => RequestState::Succeeded(value.clone()),
                Err(err) => RequestState::Failed(err.humanize()),
            };
            applied = Some(result);
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::{RequestState, Tracker};
    use crate::governance::client::FetchError;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn poll_until<T: Clone + Send + 'static>(
        tracker: &mut Tracker<T>,
        deadline: Duration,
        mut done: impl FnMut(&RequestState<T>) -> bool,
    ) {
        let start = Instant::now();
        while start.elapsed() < deadline {
            tracker.poll();
            if done(tracker.state()) {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("tracker did not reach expected state in {deadline:?}");
    }

    #[test]
    fn resolves_success_and_failure() {
        let mut tracker: Tracker<u32> = Tracker::new();
        assert_eq!(tracker.state(), &RequestState::Idle);

        tracker.dispatch(|| Ok(7));
        poll_until(&mut tracker, Duration::from_secs(2), |s| {
            matches!(s, RequestState::Succeeded(_))
        });
        assert_eq!(tracker.state(), &RequestState::Succeeded(7));

        tracker.dispatch(|| Err(FetchError::Timeout));
        poll_until(&mut tracker, Duration::from_secs(2), |s| {
            matches!(s, RequestState::Failed(_))
        });
        assert!(tracker.state().error().is_some());
    }

    #[test]
    fn late_response_from_superseded_request_is_dropped() {
        let mut tracker: Tracker<&'static str> = Tracker::new();

        // Request A blocks until released; request B resolves first.
        let (release_a, gate_a) = mpsc::channel::<()>();
        tracker.dispatch(move || {
            let _ = gate_a.recv();
            Ok("A")
        });
        tracker.dispatch(|| Ok("B"));

        poll_until(&mut tracker, Duration::from_secs(2), |s| {
            matches!(s, RequestState::Succeeded(_))
        });
        assert_eq!(tracker.state(), &RequestState::Succeeded("B"));

        // Now let A finish late; its result must not overwrite B's.
        release_a.send(()).expect("release");
        std::thread::sleep(Duration::from_millis(50));
        tracker.poll();
        assert_eq!(tracker.state(), &RequestState::Succeeded("B"));
    }

    #[test]
    fn reinvocation_while_pending_supersedes() {
        let mut tracker: Tracker<u32> = Tracker::new();
        let (release, gate) = mpsc::channel::<()>();
        tracker.dispatch(move || {
            let _ = gate.recv();
            Ok(1)
        });
        assert!(tracker.is_pending());

        tracker.dispatch(|| Ok(2));
        drop(release);
        poll_until(&mut tracker, Duration::from_secs(2), |s| {
            matches!(s, RequestState::Succeeded(_))
        });
        assert_eq!(tracker.state(), &RequestState::Succeeded(2));
    }
}
