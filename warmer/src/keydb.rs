//! Cache store access.
//!
//! The writer and the benchmark only need `SET`, `GET` and `PING`, expressed
//! by [`KeyValueStore`]. A [`CacheClient`] is the long-lived handle that hands
//! out short-lived connections; `redis::Client` is the production one.

use crate::error::{Backend, Result, WarmError};
use redis::Commands;

/// One open connection to a key-value store.
pub trait KeyValueStore {
    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// The value under `key`, or `None` if there is none.
    fn get(&mut self, key: &str) -> Result<Option<String>>;

    fn ping(&mut self) -> Result<()>;
}

/// Process-wide cache handle.
pub trait CacheClient {
    type Connection: KeyValueStore;

    fn connect(&self) -> Result<Self::Connection>;
}

/// Create the client and check that the server answers.
pub fn open_client(url: &str) -> Result<redis::Client> {
    let client = redis::Client::open(url)
        .map_err(|err| WarmError::connectivity(Backend::Cache, format!("{url}: {err}")))?;
    let mut con = CacheClient::connect(&client)?;
    KeyValueStore::ping(&mut con)?;
    log::info!("Connected to cache at {url}");
    Ok(client)
}

impl CacheClient for redis::Client {
    type Connection = redis::Connection;

    fn connect(&self) -> Result<redis::Connection> {
        self.get_connection()
            .map_err(|err| WarmError::connectivity(Backend::Cache, err))
    }
}

impl KeyValueStore for redis::Connection {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        Commands::set::<_, _, ()>(self, key, value)?;
        Ok(())
    }

    fn get(&mut self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = Commands::get(self, key)?;
        Ok(value)
    }

    fn ping(&mut self) -> Result<()> {
        redis::cmd("PING")
            .query::<String>(self)
            .map_err(|err| WarmError::connectivity(Backend::Cache, err))?;
        Ok(())
    }
}

pub mod memory {
    //! In-process key-value store, shared between connections. Used in tests
    //! wherever a cache server is not available.

    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    pub struct MemoryCache {
        pub entries: Rc<RefCell<HashMap<String, String>>>,
        pub connections: Rc<RefCell<usize>>,
    }

    pub struct MemoryConnection {
        entries: Rc<RefCell<HashMap<String, String>>>,
    }

    impl MemoryCache {
        pub fn insert(&self, key: &str, value: &str) {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
        }

        pub fn remove(&self, key: &str) -> Option<String> {
            self.entries.borrow_mut().remove(key)
        }

        pub fn value(&self, key: &str) -> Option<String> {
            self.entries.borrow().get(key).cloned()
        }

        pub fn len(&self) -> usize {
            self.entries.borrow().len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.borrow().is_empty()
        }
    }

    impl CacheClient for MemoryCache {
        type Connection = MemoryConnection;

        fn connect(&self) -> Result<MemoryConnection> {
            *self.connections.borrow_mut() += 1;
            Ok(MemoryConnection {
                entries: Rc::clone(&self.entries),
            })
        }
    }

    impl KeyValueStore for MemoryConnection {
        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn get(&mut self, key: &str) -> Result<Option<String>> {
            Ok(self.entries.borrow().get(key).cloned())
        }

        fn ping(&mut self) -> Result<()> {
            Ok(())
        }
    }
}
