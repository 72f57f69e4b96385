//! Interactive night sky: a star catalog projected onto a dome around the
//! observer for a given place and time, with click-to-focus and a JSON-RPC
//! bridge for embedding in a host page.
//!
//! [`sky`] holds the pure astronomy and buffer building. [`engine`] wires it
//! into Bevy, [`tools`] adds interaction and [`rpc`] the host bridge.

pub mod engine;
pub mod rpc;
pub mod sky;
pub mod tools;
