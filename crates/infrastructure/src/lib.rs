//! Ferrous Lookup Infrastructure Layer
pub mod dns;
pub mod system;
