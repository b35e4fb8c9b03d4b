// Core traits for autoconstruct

use crate::{ConstructorDescriptor, TypeDescriptor};
use std::any::Any;

/// Types whose public constructors can be enumerated.
///
/// Implemented by `#[auto_construct]` or by hand with
/// [`ConstructorDescriptor::builder`]. Only public constructors are
/// returned, in declaration order.
pub trait Constructible: Sized + 'static {
    fn constructors() -> Vec<ConstructorDescriptor<Self>>;
}

/// Source of strict substitutes for capability types.
pub trait MockFactory {
    /// Returns a fresh substitute whose concrete type is exactly `ty`, or
    /// `None` if `ty` cannot be substituted.
    fn substitute_for(&self, ty: &TypeDescriptor) -> Option<Box<dyn Any>>;
}

impl<F: MockFactory + ?Sized> MockFactory for Box<F> {
    fn substitute_for(&self, ty: &TypeDescriptor) -> Option<Box<dyn Any>> {
        (**self).substitute_for(ty)
    }
}
