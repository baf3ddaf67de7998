use crate::config::ReceiverConfig;
use crate::net::feed::FeedSender;
use crate::prelude::{FeedEvent, ReceiverState, ScopeError, ScopeResult};
use crate::telemetry::FeedMetrics;
use crate::wire::FrameCodec;
use log::{debug, error, info, warn};
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Listens for sample datagrams and forwards decoded frames to a feed.
///
/// Blocking reads happen on a dedicated thread so the render loop never
/// waits on the socket. The read timeout from [`ReceiverConfig`] bounds how
/// long [`UdpReceiver::stop`] can take.
pub struct UdpReceiver {
    config: ReceiverConfig,
    codec: FrameCodec,
    socket: Option<UdpSocket>,
    state: Arc<Mutex<ReceiverState>>,
    running: Arc<AtomicBool>,
    metrics: Arc<FeedMetrics>,
    worker: Option<JoinHandle<()>>,
}

impl UdpReceiver {
    pub fn new(config: ReceiverConfig) -> Self {
        let codec = FrameCodec::new(config.channels);
        Self {
            config,
            codec,
            socket: None,
            state: Arc::new(Mutex::new(ReceiverState::Idle)),
            running: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(FeedMetrics::new()),
            worker: None,
        }
    }

    pub fn state(&self) -> ReceiverState {
        read_state(&self.state)
    }

    pub fn metrics(&self) -> Arc<FeedMetrics> {
        self.metrics.clone()
    }

    /// Binds the configured listen address. Returns the address actually bound,
    /// which differs from the configured one when port 0 is requested.
    pub fn bind(&mut self) -> ScopeResult<SocketAddr> {
        let current = self.state();
        if current != ReceiverState::Idle {
            return Err(ScopeError::InvalidState(current));
        }
        self.config.validate()?;

        let addr = self.config.bind_address();
        let socket = UdpSocket::bind(&addr).map_err(|source| ScopeError::Bind {
            addr: addr.clone(),
            source,
        })?;
        socket.set_read_timeout(Some(self.config.read_timeout()))?;
        let local = socket.local_addr()?;

        info!("listening on UDP {}", local);
        self.socket = Some(socket);
        write_state(&self.state, ReceiverState::Bound);
        Ok(local)
    }

    /// Spawns the receive loop, which pushes every decoded frame into `feed`.
    pub fn start(&mut self, feed: FeedSender) -> ScopeResult<()> {
        let current = self.state();
        if current != ReceiverState::Bound {
            return Err(ScopeError::InvalidState(current));
        }
        let socket = self.socket.take().ok_or(ScopeError::InvalidState(current))?;

        let context = LoopContext {
            socket,
            codec: self.codec,
            max_datagram: self.config.max_datagram,
            running: self.running.clone(),
            state: self.state.clone(),
            metrics: self.metrics.clone(),
            feed,
        };

        self.running.store(true, Ordering::Release);
        self.metrics.mark_live();
        write_state(&self.state, ReceiverState::Receiving);
        let worker = thread::Builder::new()
            .name("udp-receiver".into())
            .spawn(move || receive_loop(context))
            .map_err(|err| {
                self.running.store(false, Ordering::Release);
                self.metrics.mark_stopped();
                write_state(&self.state, ReceiverState::Stopped);
                ScopeError::Io(err)
            })?;
        self.worker = Some(worker);
        Ok(())
    }

    /// Asks the loop to exit and waits for it. The loop notices the request
    /// once its current read returns, at most one read timeout later.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("receive loop panicked");
            }
        }
        self.socket = None;
        if self.state() != ReceiverState::Idle {
            write_state(&self.state, ReceiverState::Stopped);
        }
    }
}

impl Drop for UdpReceiver {
    fn drop(&mut self) {
        self.stop();
    }
}

struct LoopContext {
    socket: UdpSocket,
    codec: FrameCodec,
    max_datagram: usize,
    running: Arc<AtomicBool>,
    state: Arc<Mutex<ReceiverState>>,
    metrics: Arc<FeedMetrics>,
    feed: FeedSender,
}

fn receive_loop(context: LoopContext) {
    let LoopContext {
        socket,
        codec,
        max_datagram,
        running,
        state,
        metrics,
        feed,
    } = context;

    // Never read into a buffer that could truncate an oversized datagram
    // down to exactly one frame.
    let mut buffer = vec![0u8; max_datagram.max(codec.frame_len() + 1)];
    let mut reason = None;

    while running.load(Ordering::Acquire) {
        let (len, peer) = match socket.recv_from(&mut buffer) {
            Ok(received) => received,
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) =>
            {
                continue
            }
            Err(err) => {
                error!("receive loop terminated: {}", err);
                reason = Some(err.to_string());
                break;
            }
        };

        match codec.decode(&buffer[..len]) {
            Ok(frame) => {
                metrics.record_frame();
                if feed.send(FeedEvent::Frame(frame)).is_err() {
                    debug!("feed consumer dropped, leaving receive loop");
                    break;
                }
            }
            Err(err) => {
                metrics.record_decode_error();
                warn!("skipping datagram from {}: {}", peer, err);
            }
        }
    }

    running.store(false, Ordering::Release);
    metrics.mark_stopped();
    write_state(&state, ReceiverState::Stopped);
    // Consumer may already be gone.
    let _ = feed.send(FeedEvent::Stopped { reason });
    info!("receive loop stopped");
}

fn read_state(state: &Mutex<ReceiverState>) -> ReceiverState {
    match state.lock() {
        Ok(guard) => *guard,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

fn write_state(state: &Mutex<ReceiverState>, next: ReceiverState) {
    match state.lock() {
        Ok(mut guard) => *guard = next,
        Err(poisoned) => *poisoned.into_inner() = next,
    }
}
