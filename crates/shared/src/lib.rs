//! Types shared between the portal's client core and its front ends.

pub mod domain;
pub mod protocol;
pub mod stats;
