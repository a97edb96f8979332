#![forbid(unsafe_code)]
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]
#![cfg_attr(feature = "clippy", warn(missing_docs_in_private_items))]
#![cfg_attr(feature = "clippy", warn(mut_mut))]
#![cfg_attr(feature = "clippy", warn(print_stdout))]
#![cfg_attr(all(not(test), feature = "clippy"), warn(result_unwrap_used))]

//! # loopback-listener
//!
//! An in-memory stand-in for a listening socket. Code that normally binds a
//! port can be handed a [`listener::LoopbackListener`] instead, and tests can
//! then pump bytes between the accepted server protocol and a client protocol
//! with [`loopback::LoopbackPair`].

/// Contains the errors
pub mod error;
/// Contains the loopback queue, transport and connected pair
pub mod loopback;
/// Contains the listener that creates loopback ports
pub mod listener;
mod policies;
/// Contains the address and listening port capabilities and their loopback versions
pub mod port;
/// Contains the protocol and protocol factory traits
pub mod protocol;
/// Contains the pump policies
pub mod pump_policy;
