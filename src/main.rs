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

mod client;
mod commands;
mod config;
mod dispatch;
mod error;
mod net;
mod resp;
mod store;
mod util;

#[cfg(all(not(target_env = "msvc"), not(miri)))]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

use client::ClientRegistry;
use config::Config;
use error::RespdResult;
use net::Listener;
use std::net::SocketAddr;
use std::sync::Arc;
use store::Store;

fn init_logger() {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RESPD_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.parse_filters("info"),
    };
    builder.init();
}

fn main() -> RespdResult<()> {
    init_logger();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run(config))
}

async fn run(config: Config) -> RespdResult<()> {
    let addr = SocketAddr::new(config.host, config.port);
    let store = Arc::new(Store::new(config.segments));
    let clients = Arc::new(ClientRegistry::new());

    let mut listener = Listener::bind(addr, store, clients, config.max_connections)?;
    let shutdown_tx = listener.shutdown_handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("shutdown signal received");
            let _ = shutdown_tx.send(());
        }
    });

    listener.run().await
}
