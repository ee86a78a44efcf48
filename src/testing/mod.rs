//! Test support: an in-memory backend with scripted failures.

mod mock;

pub use mock::{MockBackend, MockCall};
