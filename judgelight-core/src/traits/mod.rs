//! Collaborator traits
//!
//! These traits define the interface between the protocol logic and the
//! radio link, the buttons, and the lights.

pub mod io;
pub mod link;

pub use io::{ButtonInput, Edge, Indicator};
pub use link::{LinkError, Transport};
