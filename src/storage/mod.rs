pub mod file;
pub mod memory;

use std::io;

/// Key-value storage scoped per visitor, in the shape of browser local/session storage.
/// Visitors never clear keys, so there is no `remove`; session entries expire instead.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, visitor: &str, key: &str) -> Option<String>;
    fn set(&self, visitor: &str, key: &str, value: &str) -> io::Result<()>;
}
