//! Session files on disk.

pub mod companion;

pub use companion::{companion_path, Recording};
