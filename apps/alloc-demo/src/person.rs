//! Demo payload

use std::fmt;

const NAME_CAPACITY: usize = 1024;

/// Fixed-size record whose lifecycle is printed to stdout
///
/// Larger than 1 KiB on purpose, so contiguous containers grow one slot at
/// a time.
pub struct Person {
    first_name: [u8; NAME_CAPACITY],
    last_name: [u8; NAME_CAPACITY],
    age: u32,
}

impl Person {
    pub fn new() -> Self {
        println!("Person created");
        Self {
            first_name: [0; NAME_CAPACITY],
            last_name: [0; NAME_CAPACITY],
            age: 0,
        }
    }
}

impl Default for Person {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Person {
    fn drop(&mut self) {
        println!("Person destroyed");
    }
}

impl fmt::Debug for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Person")
            .field("first_name", &read_name(&self.first_name))
            .field("last_name", &read_name(&self.last_name))
            .field("age", &self.age)
            .finish()
    }
}

/// NUL-terminated prefix of `buffer`
fn read_name(buffer: &[u8; NAME_CAPACITY]) -> &str {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(NAME_CAPACITY);
    std::str::from_utf8(&buffer[..end]).unwrap_or_default()
}
