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

//! Connected-client bookkeeping for `CLIENT ID`/`CLIENT SETNAME`/`CLIENT
//! GETNAME`. Each accepted connection registers itself and deregisters on
//! drop; nothing here touches the keyspace.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

pub struct Client {
    pub id: i64,
    pub created_at_millis: i64,
    name: Mutex<Option<Vec<u8>>>,
}

impl Client {
    pub fn name(&self) -> Option<Vec<u8>> {
        self.name.lock().clone()
    }

    pub fn set_name(&self, name: Vec<u8>) {
        *self.name.lock() = Some(name);
    }
}

pub struct ClientRegistry {
    next_id: AtomicI64,
    clients: RwLock<HashMap<i64, Arc<Client>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self { next_id: AtomicI64::new(1), clients: RwLock::new(HashMap::new()) }
    }

    /// Registers a newly accepted connection and returns its handle. The
    /// caller is responsible for calling [`ClientRegistry::drop_connection`]
    /// when the connection ends (the connection handler does this in its
    /// `Drop` impl, alongside returning its semaphore permit).
    pub fn register_connection(&self) -> Arc<Client> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let client = Arc::new(Client {
            id,
            created_at_millis: crate::util::now_millis(),
            name: Mutex::new(None),
        });
        self.clients.write().insert(id, Arc::clone(&client));
        client
    }

    pub fn drop_connection(&self, id: i64) {
        self.clients.write().remove(&id);
    }

    pub fn count(&self) -> usize {
        self.clients.read().len()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}
