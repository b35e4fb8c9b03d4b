//! Construction context: builds one object under test.
//!
//! A [`ConstructorContext`] is bound to one target type and one resolved
//! constructor. Tests inject the collaborators they care about and let
//! everything else fall back to strict substitutes:
//!
//! ```ignore
//! let mut context = ConstructorContext::<ReportService>::new()?;
//! let store = context.inject(Arc::new(InMemoryStore::default()) as Arc<dyn Store>)?;
//! context.inject_named("page_size", 20_usize)?;
//!
//! // `Arc<dyn Clock>` and `Arc<dyn Mailer>` are substituted automatically
//! let service = context.build()?;
//! ```
//!
//! A context builds at most once. It holds boxed `dyn Any` values and is
//! neither `Send` nor `Sync`; it is meant to live inside a single test.

use crate::logging::{debug, trace};
use crate::mock::{self, MockFallbackProvider};
use crate::{
    Constructible, ConstructorDescriptor, ConstructorSignature, Error, InjectionRegistry,
    MockFactory, SignatureResolver, TypeDescriptor,
};

/// Lifecycle of a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// Accepts injections and one build
    Open,
    /// The build succeeded
    Consumed,
    /// The build failed; a context never retries
    Failed,
}

pub struct ConstructorContext<T: Constructible> {
    constructor: ConstructorDescriptor<T>,
    registry: InjectionRegistry,
    mocks: Box<dyn MockFactory>,
    state: ContextState,
}

impl<T: Constructible> ConstructorContext<T> {
    /// Bind to the only public constructor of `T`.
    pub fn new() -> Result<Self, Error> {
        Ok(Self::from_constructor(SignatureResolver::resolve_single::<T>()?))
    }

    /// Bind to the constructor of `T` whose parameter types are exactly `types`.
    pub fn with_parameter_types(types: &[TypeDescriptor]) -> Result<Self, Error> {
        Ok(Self::from_constructor(
            SignatureResolver::resolve_by_parameter_types::<T>(types)?,
        ))
    }

    fn from_constructor(constructor: ConstructorDescriptor<T>) -> Self {
        let target = TypeDescriptor::of::<T>();
        debug!(
            target_type = target.name(),
            constructor = constructor.name(),
            "Creating construction context"
        );
        Self {
            constructor,
            registry: InjectionRegistry::new(target),
            mocks: Box::new(MockFallbackProvider::new()),
            state: ContextState::Open,
        }
    }

    /// Replace the source of fallback substitutes.
    pub fn with_mock_factory(mut self, factory: impl MockFactory + 'static) -> Self {
        self.mocks = Box::new(factory);
        self
    }

    /// Inject `value` for every parameter declared with exactly type `V`.
    ///
    /// Returns the value so the test keeps a handle to it.
    pub fn inject<V: Clone + 'static>(&mut self, value: V) -> Result<V, Error> {
        self.registry
            .record(self.constructor.signature(), value, None)
    }

    /// Inject `value` for the parameter called `name`.
    ///
    /// Use this when the constructor takes several parameters of one type.
    pub fn inject_named<V: Clone + 'static>(&mut self, name: &str, value: V) -> Result<V, Error> {
        self.registry
            .record(self.constructor.signature(), value, Some(name))
    }

    /// Inject a value that is moved into the object at build time.
    ///
    /// For types that are not `Clone`, such as `Box<dyn Trait>` or plain
    /// settings structs. The value fills one parameter only.
    pub fn inject_owned<V: 'static>(&mut self, value: V) -> Result<(), Error> {
        self.registry
            .record_owned(self.constructor.signature(), value, None)
    }

    /// Named form of [`inject_owned`](Self::inject_owned).
    pub fn inject_named_owned<V: 'static>(&mut self, name: &str, value: V) -> Result<(), Error> {
        self.registry
            .record_owned(self.constructor.signature(), value, Some(name))
    }

    pub fn signature(&self) -> &ConstructorSignature {
        self.constructor.signature()
    }

    pub fn constructor_name(&self) -> &'static str {
        self.constructor.name()
    }

    pub fn registry(&self) -> &InjectionRegistry {
        &self.registry
    }

    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Whether a build has succeeded.
    pub fn is_consumed(&self) -> bool {
        self.state == ContextState::Consumed
    }

    /// Construct `T`.
    ///
    /// Each parameter, in declared order, takes its named injection, else its
    /// unnamed injection, else a strict substitute. Owned injections are
    /// moved out of the context. Only the first call may
    /// succeed; every later call fails with [`Error::AlreadyConstructed`],
    /// whatever the outcome of the first.
    pub fn build(&mut self) -> Result<T, Error> {
        if self.state != ContextState::Open {
            return Err(Error::AlreadyConstructed);
        }

        match self.construct() {
            Ok(instance) => {
                self.state = ContextState::Consumed;
                debug!(
                    target_type = std::any::type_name::<T>(),
                    "Object under test constructed"
                );
                Ok(instance)
            }
            Err(err) => {
                self.state = ContextState::Failed;
                debug!(
                    target_type = std::any::type_name::<T>(),
                    error = %err,
                    "Construction failed"
                );
                Err(err)
            }
        }
    }

    fn construct(&mut self) -> Result<T, Error> {
        let parameters = self.constructor.signature().parameters();
        let mut args = Vec::with_capacity(parameters.len());

        for parameter in parameters {
            let value = match self.registry.take(parameter) {
                Some(value) => {
                    trace!(parameter = parameter.name(), "Using injected value");
                    value?
                }
                None => mock::substitute(&*self.mocks, parameter)?,
            };
            args.push(value);
        }

        self.constructor.invoke(args)
    }
}

impl<T: Constructible> std::fmt::Debug for ConstructorContext<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructorContext")
            .field("target", &TypeDescriptor::of::<T>())
            .field("constructor", &self.constructor)
            .field("injections", &self.registry.len())
            .field("state", &self.state)
            .finish()
    }
}
