//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Per-domain session aggregate (`DomainSession`)
//! - `sink`: Append path for out-of-band message sources (`SessionSink`)

mod model;
mod sink;

// Re-export public API
pub use model::DomainSession;
pub use sink::SessionSink;
