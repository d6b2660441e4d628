//! Process exit codes returned by [`crate::run`].

pub const SUCCESS: i32 = 0;

/// Any failure: bad arguments, invalid configuration, I/O or rule errors.
pub const ERROR: i32 = 2;

/// The player quit or input ended before the game finished.
pub const INTERRUPTED: i32 = 130;
