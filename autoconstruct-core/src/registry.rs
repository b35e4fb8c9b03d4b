// Injection registry: caller-supplied constructor arguments

use crate::logging::{debug, trace};
use crate::{ConstructorSignature, Error, FormalParameter, TypeDescriptor};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// How an injected value is matched to a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectionKey {
    Named(String),
    Unnamed(TypeDescriptor),
}

type Producer = Box<dyn Fn() -> Box<dyn Any>>;

enum Payload {
    /// Cloned for every parameter it fills
    Shared(Producer),
    /// Moved into the first parameter it fills
    Owned(Option<Box<dyn Any>>),
}

/// One recorded injection.
///
/// A shared entry keeps the caller's value and hands out clones, so a single
/// unnamed value can fill every parameter declared with its type. An owned
/// entry holds a value that is not `Clone` and can be taken exactly once.
pub struct InjectionEntry {
    key: InjectionKey,
    ty: TypeDescriptor,
    payload: Payload,
}

impl InjectionEntry {
    fn shared<V: Clone + 'static>(key: InjectionKey, value: V) -> Self {
        Self {
            key,
            ty: TypeDescriptor::of::<V>(),
            payload: Payload::Shared(Box::new(move || Box::new(value.clone()) as Box<dyn Any>)),
        }
    }

    fn owned<V: 'static>(key: InjectionKey, value: V) -> Self {
        Self {
            key,
            ty: TypeDescriptor::of::<V>(),
            payload: Payload::Owned(Some(Box::new(value))),
        }
    }

    pub fn key(&self) -> &InjectionKey {
        &self.key
    }

    pub fn ty(&self) -> TypeDescriptor {
        self.ty
    }

    /// Whether the value is cloned for each use.
    pub fn is_shared(&self) -> bool {
        matches!(self.payload, Payload::Shared(_))
    }

    /// The value for one parameter: a fresh clone, or the owned value itself.
    pub(crate) fn take(&mut self) -> Result<Box<dyn Any>, Error> {
        match &mut self.payload {
            Payload::Shared(produce) => Ok((*produce)()),
            Payload::Owned(value) => value
                .take()
                .ok_or(Error::InjectionConsumed { ty: self.ty }),
        }
    }
}

impl fmt::Debug for InjectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectionEntry")
            .field("key", &self.key)
            .field("ty", &self.ty)
            .field("shared", &self.is_shared())
            .finish()
    }
}

/// Named and unnamed injections for one target type.
///
/// Holds at most one named entry per parameter name and at most one unnamed
/// entry per declared type. Every entry is validated against the signature
/// it is recorded for.
#[derive(Debug)]
pub struct InjectionRegistry {
    target: TypeDescriptor,
    named: HashMap<String, InjectionEntry>,
    unnamed: HashMap<TypeDescriptor, InjectionEntry>,
}

impl InjectionRegistry {
    pub fn new(target: TypeDescriptor) -> Self {
        Self {
            target,
            named: HashMap::new(),
            unnamed: HashMap::new(),
        }
    }

    pub fn target(&self) -> TypeDescriptor {
        self.target
    }

    /// Validate and store `value`, returning it to the caller.
    pub fn record<V: Clone + 'static>(
        &mut self,
        signature: &ConstructorSignature,
        value: V,
        parameter_name: Option<&str>,
    ) -> Result<V, Error> {
        let key = self.check(signature, TypeDescriptor::of::<V>(), parameter_name)?;
        self.insert(InjectionEntry::shared(key, value.clone()));
        Ok(value)
    }

    /// Validate and store a value that is moved into the object at build time.
    pub fn record_owned<V: 'static>(
        &mut self,
        signature: &ConstructorSignature,
        value: V,
        parameter_name: Option<&str>,
    ) -> Result<(), Error> {
        let key = self.check(signature, TypeDescriptor::of::<V>(), parameter_name)?;
        self.insert(InjectionEntry::owned(key, value));
        Ok(())
    }

    fn insert(&mut self, entry: InjectionEntry) {
        trace!(
            target_type = self.target.name(),
            key = ?entry.key,
            shared = entry.is_shared(),
            "Recording injection"
        );

        match entry.key.clone() {
            InjectionKey::Named(name) => {
                debug!(parameter = %name, ty = entry.ty.name(), "Named injection recorded");
                self.named.insert(name, entry);
            }
            InjectionKey::Unnamed(ty) => {
                debug!(ty = ty.name(), "Unnamed injection recorded");
                self.unnamed.insert(ty, entry);
            }
        }
    }

    fn check(
        &self,
        signature: &ConstructorSignature,
        ty: TypeDescriptor,
        parameter_name: Option<&str>,
    ) -> Result<InjectionKey, Error> {
        match parameter_name {
            None => {
                if !signature.uses_type(&ty) {
                    return Err(Error::UnusedParameterType {
                        ty,
                        target: self.target,
                    });
                }
                if self.unnamed.contains_key(&ty) {
                    return Err(Error::DuplicateUnnamedInjection { ty });
                }
                Ok(InjectionKey::Unnamed(ty))
            }
            Some(name) => {
                let parameter =
                    signature
                        .parameter(name)
                        .ok_or_else(|| Error::UnknownParameterName {
                            name: name.to_string(),
                        })?;
                if parameter.ty() != ty {
                    return Err(Error::ParameterTypeMismatch {
                        name: name.to_string(),
                        expected: parameter.ty(),
                        actual: ty,
                    });
                }
                if self.named.contains_key(name) {
                    return Err(Error::DuplicateNamedInjection {
                        name: name.to_string(),
                    });
                }
                Ok(InjectionKey::Named(name.to_string()))
            }
        }
    }

    /// The explicit value for `parameter`, named entries first.
    pub fn lookup(&self, parameter: &FormalParameter) -> Option<&InjectionEntry> {
        self.named
            .get(parameter.name())
            .or_else(|| self.unnamed.get(&parameter.ty()))
    }

    /// Take the value for `parameter`, or `None` when nothing was injected for it.
    pub(crate) fn take(&mut self, parameter: &FormalParameter) -> Option<Result<Box<dyn Any>, Error>> {
        let entry = match self.named.get_mut(parameter.name()) {
            Some(entry) => entry,
            None => self.unnamed.get_mut(&parameter.ty())?,
        };
        Some(entry.take())
    }

    pub fn named(&self, name: &str) -> Option<&InjectionEntry> {
        self.named.get(name)
    }

    pub fn unnamed(&self, ty: &TypeDescriptor) -> Option<&InjectionEntry> {
        self.unnamed.get(ty)
    }

    pub fn len(&self) -> usize {
        self.named.len() + self.unnamed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.unnamed.is_empty()
    }
}
