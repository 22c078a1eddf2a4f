//! SQLite database module for the storefront admin engine.

mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
