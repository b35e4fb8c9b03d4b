// autoconstruct - build objects under test from their constructors
//
// A `ConstructorContext` resolves one constructor of the type under test,
// records the values a test injects, and fills every other parameter with a
// strict substitute. Tests only mention the collaborators they exercise, and
// adding a constructor dependency does not break the tests that ignore it.
//
// The attribute macros expand to `::autoconstruct_core` paths, so crates
// using them depend on `autoconstruct-core` alongside this facade.

// Re-export core functionality
pub use autoconstruct_core::*;

// Re-export procedural macros
#[cfg(feature = "macros")]
pub use autoconstruct_macro::{auto_construct, mockable};
