// Library root for the bidbot binary: configuration and the driver loop,
// exposed so integration tests can run whole sessions.

pub mod config;
pub mod session;
