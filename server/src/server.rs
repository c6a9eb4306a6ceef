use std::future::Future;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use futures::{SinkExt, StreamExt};
use log::{debug, error, info};
use snafu::{OptionExt, ResultExt, Snafu};
use tokio::sync::{mpsc, watch};
use warp::filters::ws::{Message, WebSocket, Ws};
use warp::http::StatusCode;
use warp::{Filter, Reply};

use tablecast_table::protocol::{CodecError, Event, Publication};
use tablecast_table::Snapshot;

use crate::settings;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("invalid bind address `{}`: {}", addr, source))]
    InvalidBindAddr {
        addr: String,
        source: std::io::Error,
    },
    #[snafu(display("bind address `{}` resolves to nothing", addr))]
    NoBindAddr { addr: String },
    #[snafu(display("could not bind {}: {}", addr, source))]
    Bind {
        addr: SocketAddr,
        source: warp::Error,
    },
    #[snafu(display("could not encode the initial table event: {}", source))]
    Encode { source: CodecError },
}

/// Execute the entire life-cycle of the tablecast server.
///
/// The server runs until `shutdown` completes, then waits for every viewer
/// and publisher session to end before returning.
pub async fn run<S>(server: settings::Server, shutdown: S) -> Result<Stats, Error>
where
    S: Future<Output = ()>,
{
    let bind_addr = resolve(&server.bind_addr)?;
    let state = Arc::new(State::new()?);

    // Channel to indicate that all sessions have terminated.
    let (terminated_tx, mut terminated_rx) = mpsc::channel::<()>(1);
    // Shutdown notification, observed by the web server and every session.
    let (stop_tx, stop_rx) = watch::channel(false);

    let (guard, weak_guard) = make_guard(state.clone(), stop_rx.clone(), terminated_tx);
    let routes = routes(&server, weak_guard);

    let mut web_stop = stop_rx;
    let (addr, web) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(bind_addr, async move {
            web_stop.changed().await.ok();
        })
        .context(BindSnafu { addr: bind_addr })?;
    info!("running on {}", addr);
    let web = tokio::spawn(web);

    shutdown.await;
    info!("received shutdown notice");
    stop_tx.send_replace(true);
    drop(guard);

    // Resolves once every session has dropped its sender.
    info!("waiting for sessions to terminate");
    terminated_rx.recv().await;
    if let Err(e) = web.await {
        error!("web server task: {}", e);
    }
    info!("web server stopped");

    Ok(state.stats())
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Stats {
    pub total_accepted_connections: usize,
    pub total_publications: usize,
}

fn resolve(bind_addr: &str) -> Result<SocketAddr, Error> {
    bind_addr
        .to_socket_addrs()
        .context(InvalidBindAddrSnafu { addr: bind_addr })?
        .next()
        .context(NoBindAddrSnafu { addr: bind_addr })
}

fn routes(
    server: &settings::Server,
    weak_guard: Weak<Guard>,
) -> impl Filter<Extract = impl Reply, Error = warp::Rejection> + Clone + Send + Sync + 'static {
    // * Push table events to viewers
    let viewer_guard = weak_guard.clone();
    let table = warp::path("table")
        .and(warp::path::end())
        .and(warp::ws())
        .and(warp::addr::remote())
        .map(move |ws: Ws, addr: Option<SocketAddr>| match viewer_guard.upgrade() {
            Some(guard) => {
                let handle = guard.new_client();
                ws.on_upgrade(move |stream| handle_viewer(handle, stream, addr))
                    .into_response()
            }
            None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        });

    // * Accept snapshots from producers
    let publish = warp::path("publish")
        .and(warp::path::end())
        .and(warp::ws())
        .and(warp::addr::remote())
        .map(move |ws: Ws, addr: Option<SocketAddr>| match weak_guard.upgrade() {
            Some(guard) => {
                let handle = guard.new_client();
                ws.on_upgrade(move |stream| handle_publisher(handle, stream, addr))
                    .into_response()
            }
            None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        });

    // * Serve the page and the compiled client
    let client_files = warp::get().and(warp::fs::dir(server.client_files_path.clone()));

    table.or(publish).or(client_files)
}

async fn handle_viewer(handle: ClientHandle, mut stream: WebSocket, addr: Option<SocketAddr>) {
    let (state, mut stop_rx, terminated_tx) = handle.split();
    let addr = match addr {
        Some(addr) if !state.stopping() => addr,
        Some(_) => return,
        None => {
            error!("no address for incoming viewer");
            return;
        }
    };
    state.total_accepted_connections.fetch_add(1, Ordering::AcqRel);
    info!("accepted viewer from {}", addr);

    // A new viewer first sees whatever is on the table right now.
    let mut table_rx = state.subscribe();
    let latest = table_rx.borrow_and_update().clone();
    let mut open = send_event(&latest, &mut stream, &addr).await;

    debug!("starting viewer loop for {}", addr);
    while open {
        tokio::select! {
            // Server shutting down
            _ = stop_rx.changed() => break,
            // New table state published
            changed = table_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let event = table_rx.borrow_and_update().clone();
                open = send_event(&event, &mut stream, &addr).await;
            },
            // Viewers have nothing to say; just watch for them leaving
            msg = stream.next() => open = viewer_still_open(msg, &addr),
        }
    }

    stream.close().await.ok();
    info!("finished handling viewer {}", addr);
    // notify main task that we're done.
    drop(terminated_tx);
}

async fn send_event(event: &Arc<String>, stream: &mut WebSocket, addr: &SocketAddr) -> bool {
    match stream.send(Message::text(event.as_str())).await {
        Ok(()) => true,
        Err(e) => {
            error!("while sending table event to {}: {}", addr, e);
            false
        }
    }
}

fn viewer_still_open(msg: Option<Result<Message, warp::Error>>, addr: &SocketAddr) -> bool {
    match msg {
        None => false,
        Some(Ok(msg)) if msg.is_close() => false,
        Some(Ok(_)) => true,
        Some(Err(e)) => {
            error!("reading from viewer {}: {}", addr, e);
            false
        }
    }
}

async fn handle_publisher(handle: ClientHandle, mut stream: WebSocket, addr: Option<SocketAddr>) {
    let (state, mut stop_rx, terminated_tx) = handle.split();
    let addr = match addr {
        Some(addr) if !state.stopping() => addr,
        Some(_) => return,
        None => {
            error!("no address for incoming publisher");
            return;
        }
    };
    state.total_accepted_connections.fetch_add(1, Ordering::AcqRel);
    info!("accepted publisher from {}", addr);

    debug!("starting publisher loop for {}", addr);
    loop {
        tokio::select! {
            _ = stop_rx.changed() => break,
            msg = stream.next() => match read_publication(msg, &addr) {
                Incoming::Publication(Publication::Snapshot(snapshot)) => state.publish(snapshot),
                Incoming::Publication(Publication::Close) | Incoming::Closed => break,
                Incoming::Skip => {}
            },
        }
    }

    stream.close().await.ok();
    info!("finished handling publisher {}", addr);
    drop(terminated_tx);
}

enum Incoming {
    Publication(Publication),
    Skip,
    Closed,
}

fn read_publication(msg: Option<Result<Message, warp::Error>>, addr: &SocketAddr) -> Incoming {
    let msg = match msg {
        None => return Incoming::Closed,
        Some(Err(e)) => {
            error!("reading from publisher {}: {}", addr, e);
            return Incoming::Closed;
        }
        Some(Ok(msg)) => msg,
    };
    if msg.is_close() {
        return Incoming::Closed;
    }
    let decoded = if msg.is_binary() {
        Publication::from_bytes(msg.as_bytes())
    } else if let Ok(text) = msg.to_str() {
        Publication::from_json(text)
    } else {
        // ping or pong
        return Incoming::Skip;
    };
    match decoded {
        Ok(publication) => Incoming::Publication(publication),
        Err(e) => {
            error!("from publisher {}: {}", addr, e);
            Incoming::Skip
        }
    }
}

/// The global state of the whole server.
pub struct State {
    stopping: AtomicBool,
    // The encoded event for the latest table state.
    table: watch::Sender<Arc<String>>,
    total_accepted_connections: AtomicUsize,
    total_publications: AtomicUsize,
}

impl State {
    /// Create a new server state, showing an empty table.
    fn new() -> Result<Self, Error> {
        let cleared = Event::from(Snapshot::default())
            .to_json()
            .context(EncodeSnafu)?;
        let (table, _) = watch::channel(Arc::new(cleared));
        Ok(State {
            stopping: AtomicBool::new(false),
            table,
            total_accepted_connections: AtomicUsize::new(0),
            total_publications: AtomicUsize::new(0),
        })
    }

    fn subscribe(&self) -> watch::Receiver<Arc<String>> {
        self.table.subscribe()
    }

    /// Replace the table state and push it to every viewer.
    fn publish(&self, snapshot: Snapshot) {
        let painted = snapshot.hole_cards.is_some();
        match Event::from(snapshot).to_json() {
            Ok(text) => {
                self.table.send_replace(Arc::new(text));
                self.total_publications.fetch_add(1, Ordering::AcqRel);
                debug!("published snapshot (hand data: {})", painted);
            }
            Err(e) => error!("while encoding snapshot: {}", e),
        }
    }

    /// Inquire whether the server is in the process of shutting down.
    pub fn stopping(&self) -> bool {
        self.stopping.load(Ordering::Acquire)
    }

    fn stats(&self) -> Stats {
        Stats {
            total_accepted_connections: self.total_accepted_connections.load(Ordering::Acquire),
            total_publications: self.total_publications.load(Ordering::Acquire),
        }
    }
}

/// Create a guard over the server state.
fn make_guard(
    state: Arc<State>,
    stop_rx: watch::Receiver<bool>,
    terminated_tx: mpsc::Sender<()>,
) -> (Arc<Guard>, Weak<Guard>) {
    let guard = Guard {
        state,
        stop_rx,
        terminated_tx,
    };
    let guard = Arc::new(guard);
    let weak_guard = Arc::downgrade(&guard);
    (guard, weak_guard)
}

/// Ensures that sessions receive notification of server shutdown.
///
/// The routes only hold a weak reference, so once the guard is dropped no
/// new session can start, and on drop it marks the state as stopping. The
/// main server loop should be arranged so that no matter how it exits, this
/// guard gets dropped.
pub struct Guard {
    state: Arc<State>,
    stop_rx: watch::Receiver<bool>,
    terminated_tx: mpsc::Sender<()>,
}

impl Guard {
    /// Create a handle for a new incoming connection.
    pub fn new_client(&self) -> ClientHandle {
        ClientHandle {
            state: self.state.clone(),
            stop_rx: self.stop_rx.clone(),
            terminated_tx: self.terminated_tx.clone(),
        }
    }
}

impl Drop for Guard {
    fn drop(&mut self) {
        debug!("dropping guard");
        self.state.stopping.store(true, Ordering::Release);
    }
}

/// A handle to the state and shutdown notifications for new connections.
#[derive(Clone)]
pub struct ClientHandle {
    state: Arc<State>,
    stop_rx: watch::Receiver<bool>,
    terminated_tx: mpsc::Sender<()>,
}

impl ClientHandle {
    /// Consume the handle to acquire its members.
    pub fn split(self) -> (Arc<State>, watch::Receiver<bool>, mpsc::Sender<()>) {
        (self.state, self.stop_rx, self.terminated_tx)
    }
}
