// Signature resolution: picks the constructor a context will call

use crate::logging::{debug, trace};
use crate::{Constructible, ConstructorDescriptor, Error, TypeDescriptor};

/// Selects one public constructor of a [`Constructible`] type.
pub struct SignatureResolver;

impl SignatureResolver {
    /// Succeeds only when `T` has exactly one public constructor.
    pub fn resolve_single<T: Constructible>() -> Result<ConstructorDescriptor<T>, Error> {
        let target = TypeDescriptor::of::<T>();
        let mut constructors = T::constructors();

        trace!(
            target_type = target.name(),
            candidates = constructors.len(),
            "Resolving single constructor"
        );

        match constructors.len() {
            0 => Err(Error::NoPublicConstructor { target }),
            1 => {
                let constructor = constructors.remove(0);
                debug!(
                    target_type = target.name(),
                    constructor = constructor.name(),
                    arity = constructor.signature().arity(),
                    "Constructor resolved"
                );
                Ok(constructor)
            }
            _ => Err(Error::AmbiguousConstructor { target }),
        }
    }

    /// Selects the first public constructor whose declared parameter types
    /// equal `types` position by position.
    pub fn resolve_by_parameter_types<T: Constructible>(
        types: &[TypeDescriptor],
    ) -> Result<ConstructorDescriptor<T>, Error> {
        let target = TypeDescriptor::of::<T>();

        trace!(
            target_type = target.name(),
            requested = ?types,
            "Resolving constructor by parameter types"
        );

        let constructor = T::constructors()
            .into_iter()
            .find(|constructor| constructor.signature().matches_types(types))
            .ok_or_else(|| Error::NoMatchingConstructor {
                target,
                requested: types.to_vec(),
            })?;

        debug!(
            target_type = target.name(),
            constructor = constructor.name(),
            arity = constructor.signature().arity(),
            "Constructor resolved by parameter types"
        );

        Ok(constructor)
    }
}
