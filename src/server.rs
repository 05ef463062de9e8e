//! HTTP server and graceful shutdown.
//!
//! On SIGTERM or Ctrl-C the server:
//! 1. Stops calling `listener.accept()`, so no new connections are made.
//! 2. Tells every open connection to close once its current request is
//!    answered; idle keep-alive connections close straight away.
//! 3. Returns from [`Server::serve`], which lets `main` exit cleanly.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::service::UsersService;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    pub fn bind(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Binds, then serves `dispatcher` until SIGTERM or Ctrl-C.
    ///
    /// Returns only after every in-flight request has completed.
    pub async fn serve<S: UsersService>(self, dispatcher: Dispatcher<S>) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;
        serve_with_shutdown(listener, dispatcher, shutdown_signal()).await
    }
}

/// Serves `dispatcher` on an already-bound listener until `shutdown`
/// resolves, then drains in-flight connections.
pub async fn serve_with_shutdown<S, F>(
    listener: TcpListener,
    dispatcher: Dispatcher<S>,
    shutdown: F,
) -> Result<(), Error>
where
    S: UsersService,
    F: Future<Output = ()>,
{
    // One shared dispatcher for every connection task; cloning the `Arc`
    // is one atomic increment, the service itself is never copied.
    let dispatcher = Arc::new(dispatcher);

    info!(addr = %listener.local_addr()?, "userd listening");

    // `auto::Builder` transparently handles both HTTP/1.1 and HTTP/2. Built
    // once; each connection borrows a clone through `into_owned`.
    let builder = ConnBuilder::new(TokioExecutor::new());

    // Every connection is registered with `graceful`. On shutdown it tells
    // hyper to finish the request in flight and then close, so an idle
    // keep-alive socket cannot hold the process open.
    let graceful = GracefulShutdown::new();

    // JoinSet tracks every spawned connection task so none is detached
    // when `serve_with_shutdown` returns.
    let mut tasks = tokio::task::JoinSet::new();

    // Futures must not move in memory after the first poll; `tokio::pin!`
    // pins the caller's shutdown future on the stack so the loop can poll
    // it by reference.
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            // `biased` checks arms top-to-bottom: a shutdown signal stops
            // accepting at once, even with connections queued.
            biased;

            () = &mut shutdown => {
                info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let dispatcher = Arc::clone(&dispatcher);
                // TokioIo adapts tokio's AsyncRead/AsyncWrite to hyper's IO traits.
                let io = TokioIo::new(stream);

                // `service_fn` is called once per request on the connection,
                // not once per connection.
                let svc = service_fn(move |req| {
                    let dispatcher = Arc::clone(&dispatcher);
                    async move { respond(&dispatcher, req).await }
                });

                let conn = graceful.watch(builder.serve_connection(io, svc).into_owned());

                tasks.spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer = %remote_addr, "connection error: {e}");
                    }
                });
            }

            // Reap finished tasks so the set does not grow on long runs.
            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    // Ask every open connection to close after its current request, then
    // wait for all of them.
    graceful.shutdown().await;
    while tasks.join_next().await.is_some() {}

    info!("userd stopped");
    Ok(())
}

/// Every failure is already a JSON response, so hyper never sees an error.
async fn respond<S: UsersService>(
    dispatcher: &Dispatcher<S>,
    req: hyper::Request<Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    Ok(dispatcher.handle(req).await.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGTERM or SIGINT. If a handler cannot be
/// installed, that arm never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
