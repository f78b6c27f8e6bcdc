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

//! One accepted connection: read one command fully, execute it, write the
//! full reply, repeat. Commands are never pipelined ahead of their reply.

use super::shutdown::Shutdown;
use crate::client::{Client, ClientRegistry};
use crate::dispatch::{self, Outcome};
use crate::error::RespdResult;
use crate::resp::{RespReader, RespWriter};
use crate::store::Store;
use std::sync::Arc;
use tokio::io::{split, AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio::sync::Semaphore;

pub struct ConnectionHandler<Strm> {
    store: Arc<Store>,
    clients: Arc<ClientRegistry>,
    client: Arc<Client>,
    reader: RespReader<ReadHalf<Strm>>,
    writer: RespWriter<WriteHalf<Strm>>,
    climit: Arc<Semaphore>,
    shutdown: Shutdown,
}

impl<Strm> ConnectionHandler<Strm>
where
    Strm: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(
        stream: Strm,
        store: Arc<Store>,
        clients: Arc<ClientRegistry>,
        climit: Arc<Semaphore>,
        shutdown: Shutdown,
    ) -> Self {
        let client = clients.register_connection();
        let (read_half, write_half) = split(stream);
        Self {
            store,
            clients,
            client,
            reader: RespReader::new(read_half),
            writer: RespWriter::new(write_half),
            climit,
            shutdown,
        }
    }

    /// Runs the connection to completion: `QUIT`, a peer disconnect, an
    /// unframing protocol error, or a shutdown signal all end the loop
    /// without treating it as a failure.
    pub async fn run(&mut self) -> RespdResult<()> {
        log::debug!("client {} connected", self.client.id);
        while !self.shutdown.is_shutdown() {
            tokio::select! {
                result = dispatch::execute(&mut self.reader, &mut self.writer, &self.store, &self.client) => {
                    match result {
                        Ok(Outcome::Continue) => {
                            self.writer.flush().await?;
                        }
                        Ok(Outcome::Quit) => break,
                        Err(e) if e.is_peer_gone() => break,
                        Err(e) if e.is_unframing() => {
                            log::debug!("client {}: unframing error: {}", self.client.id, e);
                            let _ = self.writer.write_error(&e.reply_message()).await;
                            let _ = self.writer.flush().await;
                            break;
                        }
                        Err(e) => {
                            self.writer.write_error(&e.reply_message()).await?;
                            self.writer.flush().await?;
                        }
                    }
                }
                _ = self.shutdown.recv() => break,
            }
        }
        log::debug!("client {} disconnected", self.client.id);
        Ok(())
    }
}

impl<Strm> Drop for ConnectionHandler<Strm> {
    fn drop(&mut self) {
        self.clients.drop_connection(self.client.id);
        self.climit.add_permits(1);
    }
}

#[cfg(test)]
mod tests;
