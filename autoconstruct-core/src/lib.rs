// Core library for autoconstruct
// Builds objects under test from their constructor descriptors, filling
// every parameter the test does not inject with a strict substitute.

pub mod context;
pub mod descriptor;
pub mod error;
pub mod logging;
pub mod mock;
pub mod registry;
pub mod resolver;
pub mod traits;

// Re-export commonly used types
pub use context::*;
pub use descriptor::*;
pub use error::*;
pub use mock::{MockFallbackProvider, SubstituteRegistration, is_registered, registered_substitute};
pub use registry::*;
pub use resolver::*;
pub use traits::*;

// Used by `register_substitute!` and `#[mockable]` expansions
#[doc(hidden)]
pub use inventory;
