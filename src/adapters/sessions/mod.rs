//! Session storage adapters that need no external service.

mod in_memory;

pub use in_memory::InMemorySessionRepository;
