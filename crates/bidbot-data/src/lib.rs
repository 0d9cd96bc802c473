// Player data: CSV-backed implementation of the player repository.

pub mod tables;

pub use tables::{load_role_table, read_role_table, PlayerTables, TableError, TablePaths};
