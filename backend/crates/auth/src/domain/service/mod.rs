//! Domain Services
//!
//! Pure functions with no I/O.

pub mod proof;
