//! Wire-format types for the atombus messaging client.
//!
//! This crate provides the types shared by any consumer of the service's
//! REST/Atom management API:
//!
//! - [`atom`]: Atom `entry`/`feed`/`content` envelope reading and writing
//! - [`codec`]: XML descriptor serialization and deserialization
//! - [`descriptions`]: queue, topic, subscription and rule descriptors
//! - [`message`]: brokered messages and broker properties
//! - [`error`]: codec error types
//!
//! No HTTP types and no I/O live here; the client crate owns those.

mod atom;
mod codec;
mod descriptions;
mod error;
mod message;

pub use atom::*;
pub use codec::*;
pub use descriptions::*;
pub use error::*;
pub use message::*;
