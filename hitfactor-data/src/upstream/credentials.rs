use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::EmptyCredentialPool;

/// Round-robin pool of API credentials.
///
/// Every outbound request takes the next credential, retries included. The
/// cursor is the only state shared between concurrent requests.
pub struct CredentialPool {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl CredentialPool {
    /// Build a pool from `keys`, ignoring blank entries.
    ///
    /// # Errors
    /// Returns [`EmptyCredentialPool`] when no usable key remains.
    pub fn new<I, S>(keys: I) -> Result<Self, EmptyCredentialPool>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys
            .into_iter()
            .map(Into::into)
            .filter(|key| !key.trim().is_empty())
            .collect();
        if keys.is_empty() {
            return Err(EmptyCredentialPool);
        }
        Ok(Self {
            keys,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Take the next credential.
    pub fn next_key(&self) -> &str {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        self.keys.get(index).map_or("", String::as_str)
    }

    /// Number of credentials in rotation.
    pub fn credential_count(&self) -> usize {
        self.keys.len()
    }
}

impl fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPool")
            .field("credentials", &self.keys.len())
            .field("cursor", &self.cursor.load(Ordering::Relaxed))
            .finish()
    }
}
