//! Patrimap library modules.
//!
//! A small multi-user web application recording geolocated heritage points
//! and rendering them onto an interactive map document.

pub mod domain;
pub mod inbound;
pub mod map;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;
