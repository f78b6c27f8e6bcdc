/*
 * This file is a part of respd
 *
 * respd is a free and open-source RESP-compatible in-memory key-value
 * server.
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! The accept loop: bind with `SO_REUSEADDR`/`SO_REUSEPORT` set ahead of
//! `tokio::net::TcpListener::from_std`, bound the number of live connections
//! with a semaphore, and back off exponentially on repeated `accept()`
//! failures instead of spinning a CPU core.

use super::connection::ConnectionHandler;
use super::shutdown::Shutdown;
use crate::client::ClientRegistry;
use crate::error::{RespdError, RespdResult};
use crate::store::Store;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};

const LISTEN_BACKLOG: i32 = 128;
const MAX_BACKOFF_SECS: u64 = 64;

/// Binds `addr` with `SO_REUSEADDR`/`SO_REUSEPORT` set before tokio ever sees
/// the socket, since `TcpListener::bind` doesn't expose either option.
fn bind(addr: SocketAddr) -> RespdResult<TcpListener> {
    let domain = if addr.is_ipv6() { Domain::IPV6 } else { Domain::IPV4 };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;
    TcpListener::from_std(socket.into()).map_err(RespdError::from)
}

/// Tracks consecutive `accept()` failures and sleeps an exponentially
/// growing amount of time between retries, capped at [`MAX_BACKOFF_SECS`]
struct AcceptBackoff {
    secs: u64,
}

impl AcceptBackoff {
    fn new() -> Self {
        Self { secs: 1 }
    }

    async fn spin(&mut self) {
        tokio::time::sleep(Duration::from_secs(self.secs)).await;
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
    }

    fn reset(&mut self) {
        self.secs = 1;
    }
}

pub struct Listener {
    listener: TcpListener,
    store: Arc<Store>,
    clients: Arc<ClientRegistry>,
    climit: Arc<Semaphore>,
    shutdown_tx: broadcast::Sender<()>,
}

impl Listener {
    pub fn bind(
        addr: SocketAddr,
        store: Arc<Store>,
        clients: Arc<ClientRegistry>,
        max_connections: usize,
    ) -> RespdResult<Self> {
        let listener = bind(addr)?;
        log::info!("server started on {addr}");
        let (shutdown_tx, _) = broadcast::channel(1);
        Ok(Self {
            listener,
            store,
            clients,
            climit: Arc::new(Semaphore::new(max_connections)),
            shutdown_tx,
        })
    }

    /// A sender that, when `send(())` is called, signals every live
    /// connection and the accept loop itself to stop
    pub fn shutdown_handle(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    pub async fn run(&mut self) -> RespdResult<()> {
        let mut backoff = AcceptBackoff::new();
        let mut shutdown = Shutdown::new(self.shutdown_tx.subscribe());
        loop {
            let permit = tokio::select! {
                permit = Arc::clone(&self.climit).acquire_owned() => permit.expect("semaphore never closed"),
                _ = shutdown.recv() => return Ok(()),
            };
            let (stream, peer) = tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok(pair) => pair,
                    Err(e) => {
                        drop(permit);
                        log::error!("accept() failed: {e}");
                        backoff.spin().await;
                        continue;
                    }
                },
                _ = shutdown.recv() => { drop(permit); return Ok(()); }
            };
            backoff.reset();
            permit.forget();
            log::debug!("accepted connection from {peer}");

            let store = Arc::clone(&self.store);
            let clients = Arc::clone(&self.clients);
            let climit = Arc::clone(&self.climit);
            let conn_shutdown = Shutdown::new(self.shutdown_tx.subscribe());
            tokio::spawn(async move {
                let mut handler = ConnectionHandler::new(stream, store, clients, climit, conn_shutdown);
                if let Err(e) = handler.run().await {
                    log::error!("connection from {peer} ended with an error: {e}");
                }
            });
        }
    }
}
