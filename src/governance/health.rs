use crate::governance::client::ApiClient;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

const PROBE_INTERVAL: Duration = Duration::from_millis(3000);
const PROBE_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Unknown,
    Online,
    Offline,
}

/// Polls `GET /health` on a fixed interval and keeps a binary
/// online/offline flag. Purely cosmetic: nothing gates on this state.
/// Each probe runs on its own short-lived thread with a hard timeout,
/// so a hung backend resolves to `Offline` instead of wedging the
/// indicator in its checking state. Dropping the monitor closes the
/// channel and makes any in-flight probe a no-op.
pub struct HealthMonitor {
    client: ApiClient,
    link: Link,
    seq: u64,
    last_probe: Option<Instant>,
    tx: mpsc::Sender<(u64, bool)>,
    rx: mpsc::Receiver<(u64, bool)>,
}

impl HealthMonitor {
    pub fn new(client: ApiClient) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            client,
            link: Link::Unknown,
            seq: 0,
            last_probe: None,
            tx,
            rx,
        }
    }

    pub fn is_online(&self) -> bool {
        self.link == Link::Online
    }

    /// Status string shown next to the indicator dot.
    pub fn label(&self) -> &'static str {
        match self.link {
            Link::Unknown => "checking...",
            Link::Online => "online",
            Link::Offline => "offline",
        }
    }

    /// Drive the monitor from the event loop: apply finished probes,
    /// then start a new one if the interval has elapsed.
    pub fn poll(&mut self) {
        while let Ok((seq, online)) = self.rx.try_recv() {
            if seq != self.seq {
                continue;
            }
            let link = if online { Link::Online } else { Link::Offline };
            if link != self.link {
                tracing::info!(status = self.label_for(link), "backend status changed");
            }
            self.link = link;
        }

        let due = match self.last_probe {
            None => true,
            Some(at) => at.elapsed() >= PROBE_INTERVAL,
        };
        if due {
            self.last_probe = Some(Instant::now());
            self.spawn_probe();
        }
    }

    fn label_for(&self, link: Link) -> &'static str {
        match link {
            Link::Unknown => "checking...",
            Link::Online => "online",
            Link::Offline => "offline",
        }
    }

    fn spawn_probe(&mut self) {
        self.seq += 1;
        let seq = self.seq;
        let tx = self.tx.clone();
        let client = self.client.clone();
        thread::spawn(move || {
            // Any fetch error (timeout included) means offline; a 2xx
            // with a well-formed JSON body means online.
            let online = client.get("/health", PROBE_TIMEOUT).is_ok();
            let _ = tx.send((seq, online));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{HealthMonitor, Link};
    use crate::governance::client::ApiClient;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::{Duration, Instant};

    fn wait_for(monitor: &mut HealthMonitor, deadline: Duration) -> Link {
        let start = Instant::now();
        while start.elapsed() < deadline {
            monitor.poll();
            if monitor.link != Link::Unknown {
                return monitor.link;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        monitor.link
    }

    #[test]
    fn healthy_backend_reads_online() {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        std::thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let mut stream = stream;
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Length: 20\r\nConnection: close\r\n\r\n{\"status\":\"healthy\"}",
                );
            }
        });

        let client = ApiClient::new(&format!("http://{addr}")).expect("client");
        let mut monitor = HealthMonitor::new(client);
        assert_eq!(monitor.label(), "checking...");
        let link = wait_for(&mut monitor, Duration::from_secs(3));
        assert_eq!(link, Link::Online);
        assert_eq!(monitor.label(), "online");
    }

    #[test]
    fn unresponsive_backend_times_out_to_offline() {
        // Accept the connection but never answer: the 2s probe timeout
        // must resolve the indicator to offline, not leave it checking.
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        std::thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming().flatten() {
                held.push(stream);
            }
        });

        let client = ApiClient::new(&format!("http://{addr}")).expect("client");
        let mut monitor = HealthMonitor::new(client);
        let link = wait_for(&mut monitor, Duration::from_secs(4));
        assert_eq!(link, Link::Offline);
        assert_eq!(monitor.label(), "offline");
    }
}
