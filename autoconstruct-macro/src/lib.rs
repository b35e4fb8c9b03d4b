// Procedural macros for autoconstruct
// These macros generate the constructor metadata and strict substitutes
// that construction contexts work from.

use proc_macro::TokenStream;

mod auto_construct;
mod mockable;

/// Describes the public constructors of a type for `ConstructorContext`.
///
/// Place on an inherent `impl` block. Every `pub fn` without a receiver
/// returning `Self` (or `Result<Self, E>`) becomes a constructor, in source
/// order; everything else in the block is left alone.
///
/// ```ignore
/// #[auto_construct]
/// impl ReportService {
///     pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, page_size: usize) -> Self {
///         Self { store, clock, page_size }
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn auto_construct(attr: TokenStream, item: TokenStream) -> TokenStream {
    auto_construct::auto_construct_impl(attr, item)
}

/// Generates `Strict<Trait>` and registers it as the fallback substitute
/// for `Arc<dyn Trait>` and `Box<dyn Trait>`.
///
/// The trait must be dyn-compatible and may not be generic or declare
/// associated types or constants.
#[proc_macro_attribute]
pub fn mockable(attr: TokenStream, item: TokenStream) -> TokenStream {
    mockable::mockable_impl(attr, item)
}
