//! Constructor metadata: type descriptors, formal parameters, signatures
//! and the positional invokers that stand in for runtime reflection.

use crate::Error;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity and printable name of a Rust type.
///
/// Two descriptors are equal only when they describe the exact same type,
/// so `Arc<dyn Repo>` never matches `Arc<dyn Repo + Send + Sync>` or a
/// concrete implementation of `Repo`.
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl TypeDescriptor {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name as reported by the compiler.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with every module path removed, e.g. `Arc<dyn Repo>`.
    pub fn short_name(&self) -> String {
        strip_module_paths(self.name)
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

fn strip_module_paths(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
            continue;
        }
        out.push(c);
        if !(c.is_alphanumeric() || c == '_') {
            segment_start = out.len();
        }
    }

    out
}

/// Builds a `Vec<TypeDescriptor>` from a list of types.
///
/// ```
/// use autoconstruct_core::{param_types, TypeDescriptor};
///
/// let types = param_types![String, i32];
/// assert_eq!(types, vec![TypeDescriptor::of::<String>(), TypeDescriptor::of::<i32>()]);
/// ```
#[macro_export]
macro_rules! param_types {
    ($($ty:ty),* $(,)?) => {
        vec![$($crate::TypeDescriptor::of::<$ty>()),*]
    };
}

/// One declared parameter of a constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormalParameter {
    name: String,
    ty: TypeDescriptor,
    position: usize,
}

impl FormalParameter {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor, position: usize) -> Self {
        Self {
            name: name.into(),
            ty,
            position,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> TypeDescriptor {
        self.ty
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// Ordered parameter list of exactly one constructor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstructorSignature {
    parameters: Vec<FormalParameter>,
}

impl ConstructorSignature {
    pub fn new(parameters: Vec<FormalParameter>) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &[FormalParameter] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn parameter(&self, name: &str) -> Option<&FormalParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Whether any parameter is declared with exactly this type.
    pub fn uses_type(&self, ty: &TypeDescriptor) -> bool {
        self.parameters.iter().any(|p| p.ty == *ty)
    }

    /// Whether the declared types equal `types` position by position.
    pub fn matches_types(&self, types: &[TypeDescriptor]) -> bool {
        self.parameters.len() == types.len()
            && self.parameters.iter().zip(types).all(|(p, ty)| p.ty == *ty)
    }

    pub fn types(&self) -> Vec<TypeDescriptor> {
        self.parameters.iter().map(|p| p.ty).collect()
    }
}

/// Positional argument list handed to a constructor invoker.
pub struct Arguments {
    target: TypeDescriptor,
    values: Vec<Option<Box<dyn Any>>>,
}

impl Arguments {
    pub(crate) fn new(target: TypeDescriptor, values: Vec<Box<dyn Any>>) -> Self {
        Self {
            target,
            values: values.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Move the argument at `position` out of the list.
    pub fn take<V: Any>(&mut self, position: usize) -> Result<V, Error> {
        let target = self.target;
        let mismatch = || Error::Instantiation {
            target,
            position,
            expected: TypeDescriptor::of::<V>(),
        };

        let slot = match self.values.get_mut(position) {
            Some(slot) => slot,
            None => return Err(mismatch()),
        };
        let value = slot.take().ok_or_else(mismatch)?;

        match value.downcast::<V>() {
            Ok(value) => Ok(*value),
            Err(value) => {
                // leave the slot as it was
                *slot = Some(value);
                Err(mismatch())
            }
        }
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("target", &self.target)
            .field("len", &self.values.len())
            .finish()
    }
}

/// Invokes one constructor with a positional argument list.
pub type Invoker<T> = fn(Arguments) -> Result<T, Error>;

/// A public constructor of `T`: its name, signature and invoker.
pub struct ConstructorDescriptor<T> {
    name: &'static str,
    signature: ConstructorSignature,
    invoker: Invoker<T>,
}

impl<T: 'static> ConstructorDescriptor<T> {
    /// Start describing the constructor called `name`.
    pub fn builder(name: &'static str) -> ConstructorDescriptorBuilder<T> {
        ConstructorDescriptorBuilder {
            name,
            parameters: Vec::new(),
            _target: std::marker::PhantomData,
        }
    }

    pub fn new(name: &'static str, signature: ConstructorSignature, invoker: Invoker<T>) -> Self {
        Self {
            name,
            signature,
            invoker,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn signature(&self) -> &ConstructorSignature {
        &self.signature
    }

    /// Instantiate `T` from positional arguments.
    pub fn invoke(&self, args: Vec<Box<dyn Any>>) -> Result<T, Error> {
        (self.invoker)(Arguments::new(TypeDescriptor::of::<T>(), args))
    }
}

impl<T> fmt::Debug for ConstructorDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDescriptor")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

pub struct ConstructorDescriptorBuilder<T> {
    name: &'static str,
    parameters: Vec<FormalParameter>,
    _target: std::marker::PhantomData<fn() -> T>,
}

impl<T: 'static> ConstructorDescriptorBuilder<T> {
    /// Declare the next positional parameter.
    pub fn param<P: ?Sized + 'static>(mut self, name: &str) -> Self {
        let position = self.parameters.len();
        self.parameters
            .push(FormalParameter::new(name, TypeDescriptor::of::<P>(), position));
        self
    }

    pub fn build(self, invoker: Invoker<T>) -> ConstructorDescriptor<T> {
        ConstructorDescriptor::new(self.name, ConstructorSignature::new(self.parameters), invoker)
    }
}
