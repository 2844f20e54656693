/*!
 * Core Module
 * Synchronization primitives, error handling and tracing setup
 */

pub mod errors;
pub mod sync;
pub mod tracer;

// Re-export for convenience
pub use errors::*;
pub use tracer::init_tracing;
