//! Mock fallback for constructor parameters nobody injected.
//!
//! Substitutes come from two places: factories registered on a
//! [`MockFallbackProvider`] instance, and the process-wide catalogue of
//! [`SubstituteRegistration`]s collected with `inventory`. `#[mockable]`
//! fills the catalogue for `Arc<dyn Trait>` and `Box<dyn Trait>`; other
//! capability handles can be added with [`register_substitute!`].
//!
//! Only capability types are ever registered. A parameter whose type has no
//! factory (a value, a concrete struct, a primitive) is unmockable.

use crate::logging::{debug, trace, warn};
use crate::{Error, FormalParameter, MockFactory, TypeDescriptor};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// A catalogue entry producing strict substitutes of one capability type.
pub struct SubstituteRegistration {
    pub type_id: fn() -> TypeId,
    pub type_name: fn() -> &'static str,
    pub create: fn() -> Box<dyn Any>,
}

inventory::collect!(SubstituteRegistration);

impl SubstituteRegistration {
    /// `create` must return a box holding exactly a `T`.
    pub const fn new<T: Any>(create: fn() -> Box<dyn Any>) -> Self {
        Self {
            type_id: TypeId::of::<T>,
            type_name: std::any::type_name::<T>,
            create,
        }
    }

    pub fn describes(&self, ty: &TypeDescriptor) -> bool {
        (self.type_id)() == ty.id()
    }
}

impl fmt::Debug for SubstituteRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstituteRegistration")
            .field("type_name", &(self.type_name)())
            .finish()
    }
}

/// Find the catalogue entry for `ty`.
pub fn registered_substitute(ty: &TypeDescriptor) -> Option<&'static SubstituteRegistration> {
    inventory::iter::<SubstituteRegistration>
        .into_iter()
        .find(|entry| entry.describes(ty))
}

/// Whether the catalogue can substitute `T`.
pub fn is_registered<T: Any>() -> bool {
    registered_substitute(&TypeDescriptor::of::<T>()).is_some()
}

/// Add a capability type to the substitute catalogue.
///
/// ```ignore
/// register_substitute!(Rc<dyn Clock>, || Rc::new(StrictClock) as Rc<dyn Clock>);
/// ```
#[macro_export]
macro_rules! register_substitute {
    ($ty:ty, $factory:expr) => {
        $crate::inventory::submit! {
            $crate::SubstituteRegistration::new::<$ty>(|| {
                let substitute: $ty = ($factory)();
                ::std::boxed::Box::new(substitute) as ::std::boxed::Box<dyn ::std::any::Any>
            })
        }
    };
}

type SubstituteFn = Box<dyn Fn() -> Box<dyn Any>>;

/// Default [`MockFactory`]: local factories first, then the catalogue.
pub struct MockFallbackProvider {
    local: HashMap<TypeId, SubstituteFn>,
    use_catalogue: bool,
}

impl MockFallbackProvider {
    pub fn new() -> Self {
        Self {
            local: HashMap::new(),
            use_catalogue: true,
        }
    }

    /// A provider that ignores the process-wide catalogue.
    pub fn isolated() -> Self {
        Self {
            local: HashMap::new(),
            use_catalogue: false,
        }
    }

    /// Register a factory for `T` on this provider only.
    pub fn with_substitute<T: Any>(mut self, factory: impl Fn() -> T + 'static) -> Self {
        let ty = TypeDescriptor::of::<T>();
        trace!(substitute = ty.name(), "Registering local substitute factory");
        self.local
            .insert(ty.id(), Box::new(move || Box::new(factory()) as Box<dyn Any>));
        self
    }

    pub fn can_substitute(&self, ty: &TypeDescriptor) -> bool {
        self.local.contains_key(&ty.id())
            || (self.use_catalogue && registered_substitute(ty).is_some())
    }
}

impl Default for MockFallbackProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MockFallbackProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockFallbackProvider")
            .field("local_factories", &self.local.len())
            .field("use_catalogue", &self.use_catalogue)
            .finish()
    }
}

impl MockFactory for MockFallbackProvider {
    fn substitute_for(&self, ty: &TypeDescriptor) -> Option<Box<dyn Any>> {
        let value = if let Some(factory) = self.local.get(&ty.id()) {
            factory()
        } else if self.use_catalogue {
            (registered_substitute(ty)?.create)()
        } else {
            return None;
        };

        if (*value).type_id() != ty.id() {
            warn!(
                substitute = ty.name(),
                "Substitute factory produced a value of the wrong type"
            );
            return None;
        }

        Some(value)
    }
}

/// Obtain a strict substitute for `parameter` from `factory`.
pub fn substitute(
    factory: &dyn MockFactory,
    parameter: &FormalParameter,
) -> Result<Box<dyn Any>, Error> {
    let ty = parameter.ty();
    match factory.substitute_for(&ty) {
        Some(value) => {
            debug!(
                parameter = parameter.name(),
                substitute = ty.name(),
                "Created strict substitute"
            );
            Ok(value)
        }
        None => {
            debug!(
                parameter = parameter.name(),
                ty = ty.name(),
                "No substitute available for parameter"
            );
            Err(Error::UnmockableType {
                parameter: parameter.name().to_string(),
                ty,
            })
        }
    }
}
