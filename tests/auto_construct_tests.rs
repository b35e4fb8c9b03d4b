//! End-to-end tests for `#[auto_construct]` and `#[mockable]`.

use autoconstruct::*;
use std::sync::Arc;

// =============================================================================
// Fixtures
// =============================================================================

#[mockable]
pub trait Dependency1 {
    fn operation(&self) -> u32;
}

#[mockable]
pub trait Dependency2 {
    fn describe(&self, verbose: bool) -> String;

    fn name(&self) -> String {
        "default".to_string()
    }
}

#[mockable]
pub trait Dependency3 {}

struct Fake1(u32);

impl Dependency1 for Fake1 {
    fn operation(&self) -> u32 {
        self.0
    }
}

struct Fake2;

impl Dependency2 for Fake2 {
    fn describe(&self, verbose: bool) -> String {
        if verbose { "fake two".into() } else { "two".into() }
    }
}

pub struct SingleConstructorClass {
    dep1: Arc<dyn Dependency1>,
    dep2: Arc<dyn Dependency2>,
    value: i32,
}

#[auto_construct]
impl SingleConstructorClass {
    pub fn new(dep1: Arc<dyn Dependency1>, dep2: Arc<dyn Dependency2>, value: i32) -> Self {
        Self { dep1, dep2, value }
    }

    pub fn total(&self) -> u32 {
        self.dep1.operation() + self.value as u32
    }
}

pub struct MultipleConstructorClass {
    parts: usize,
}

#[auto_construct]
impl MultipleConstructorClass {
    pub fn new(_dep1: Arc<dyn Dependency1>) -> MultipleConstructorClass {
        Self { parts: 1 }
    }

    pub fn with_both(_dep1: Arc<dyn Dependency1>, _dep2: Box<dyn Dependency2>) -> Self {
        Self { parts: 2 }
    }

    #[allow(dead_code)]
    fn internal(_dep3: Arc<dyn Dependency3>) -> Self {
        Self { parts: 3 }
    }
}

pub struct ThreadSafeService {
    dep1: Arc<dyn Dependency1 + Send + Sync>,
    dep2: Box<dyn Dependency2 + Send + Sync>,
}

#[auto_construct]
impl ThreadSafeService {
    pub fn new(
        dep1: Arc<dyn Dependency1 + Send + Sync>,
        dep2: Box<dyn Dependency2 + Send + Sync>,
    ) -> Self {
        Self { dep1, dep2 }
    }
}

pub struct NonPublicConstructorClass;

#[auto_construct]
impl NonPublicConstructorClass {
    #[allow(dead_code)]
    fn new() -> Self {
        Self
    }

    pub fn helper(&self) -> bool {
        true
    }
}

#[derive(Debug)]
pub struct EmptyName;

impl std::fmt::Display for EmptyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("name must not be empty")
    }
}

impl std::error::Error for EmptyName {}

pub struct Named {
    name: String,
}

#[auto_construct]
impl Named {
    pub fn new(name: String) -> Result<Self, EmptyName> {
        if name.is_empty() {
            return Err(EmptyName);
        }
        Ok(Self { name })
    }
}

// =============================================================================
// Generated descriptors
// =============================================================================

#[test]
fn test_generated_descriptor_lists_public_constructors() {
    let constructors = MultipleConstructorClass::constructors();
    let names: Vec<_> = constructors.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["new", "with_both"]);

    let with_both = constructors[1].signature();
    assert_eq!(with_both.parameters()[0].name(), "_dep1");
    assert_eq!(
        with_both.types(),
        param_types![Arc<dyn Dependency1>, Box<dyn Dependency2>]
    );
}

#[test]
fn test_private_constructors_are_not_public() {
    assert!(NonPublicConstructorClass.helper());
    let err = ConstructorContext::<NonPublicConstructorClass>::new().unwrap_err();
    assert_eq!(
        err.to_string(),
        "There are no public constructors for type NonPublicConstructorClass."
    );
}

#[test]
fn test_multiple_constructors_require_disambiguation() {
    let err = ConstructorContext::<MultipleConstructorClass>::new().unwrap_err();
    assert!(matches!(err, Error::AmbiguousConstructor { .. }));

    let mut context = ConstructorContext::<MultipleConstructorClass>::with_parameter_types(
        &param_types![Arc<dyn Dependency1>, Box<dyn Dependency2>],
    )
    .unwrap();
    assert_eq!(context.build().unwrap().parts, 2);

    let err = ConstructorContext::<MultipleConstructorClass>::with_parameter_types(&param_types![
        Arc<dyn Dependency3>
    ])
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "No constructor of MultipleConstructorClass matches (Arc<dyn Dependency3>)"
    );
}

// =============================================================================
// Strict substitutes
// =============================================================================

#[test]
fn test_mockable_registers_arc_and_box_handles() {
    assert!(is_registered::<Arc<dyn Dependency1>>());
    assert!(is_registered::<Box<dyn Dependency2>>());
    assert!(is_registered::<Arc<dyn Dependency3>>());
    assert!(is_registered::<Arc<dyn Dependency1 + Send + Sync>>());
    assert!(is_registered::<Box<dyn Dependency2 + Send + Sync>>());
    assert!(!is_registered::<Arc<dyn Dependency1 + Send>>());
}

#[test]
#[should_panic(expected = "Dependency2::describe is an unconfigured member")]
fn test_generated_substitute_panics_on_required_method() {
    StrictDependency2.describe(true);
}

#[test]
#[should_panic(expected = "Dependency2::name is an unconfigured member")]
fn test_generated_substitute_overrides_default_methods() {
    StrictDependency2.name();
}

// =============================================================================
// Build
// =============================================================================

#[test]
fn test_the_correct_mocks_and_values_are_used_for_target_constructor() {
    let mut context = ConstructorContext::<SingleConstructorClass>::new().unwrap();
    let dep1 = context
        .inject(Arc::new(Fake1(10)) as Arc<dyn Dependency1>)
        .unwrap();
    let dep2 = context
        .inject_named("dep2", Arc::new(Fake2) as Arc<dyn Dependency2>)
        .unwrap();
    let value = context.inject(123).unwrap();

    let obj = context.build().unwrap();

    assert!(Arc::ptr_eq(&dep1, &obj.dep1));
    assert!(Arc::ptr_eq(&dep2, &obj.dep2));
    assert_eq!(obj.value, value);
    assert_eq!(obj.total(), 133);
    assert_eq!(obj.dep2.describe(false), "two");
}

#[test]
fn test_uninjected_mockable_types_are_mocked_automatically() {
    let mut context = ConstructorContext::<SingleConstructorClass>::new().unwrap();
    let value = context.inject(123).unwrap();

    let obj = context.build().unwrap();

    assert_eq!(obj.value, value);
    assert_eq!(Arc::strong_count(&obj.dep1), 1);
    assert_eq!(Arc::strong_count(&obj.dep2), 1);
}

#[test]
#[should_panic(expected = "Dependency1::operation is an unconfigured member")]
fn test_automatic_substitutes_are_strict() {
    let mut context = ConstructorContext::<SingleConstructorClass>::new().unwrap();
    context.inject(123).unwrap();
    let obj = context.build().unwrap();
    obj.total();
}

#[test]
fn test_unmockable_types_are_rejected_in_build() {
    let mut context = ConstructorContext::<SingleConstructorClass>::new().unwrap();

    let err = context.build().err().unwrap();

    assert!(matches!(err, Error::UnmockableType { .. }));
    assert!(err.to_string().contains("i32"));
}

#[test]
fn test_build_may_only_be_called_once() {
    let mut context = ConstructorContext::<SingleConstructorClass>::new().unwrap();
    context.inject(123).unwrap();

    assert!(context.build().is_ok());
    assert!(matches!(context.build(), Err(Error::AlreadyConstructed)));
}

#[test]
fn test_fallible_constructor() {
    let mut context = ConstructorContext::<Named>::new().unwrap();
    context.inject("widget".to_string()).unwrap();
    assert_eq!(context.build().unwrap().name, "widget");

    let mut context = ConstructorContext::<Named>::new().unwrap();
    context.inject_named("name", String::new()).unwrap();
    let err = context.build().err().unwrap();
    assert!(matches!(err, Error::ConstructorFailed { .. }));
    assert_eq!(err.to_string(), "Constructor of Named failed: name must not be empty");
}

#[test]
fn test_adding_a_dependency_does_not_break_existing_setup() {
    pub struct Extended {
        dep1: Arc<dyn Dependency1>,
        value: i32,
    }

    #[auto_construct]
    impl Extended {
        pub fn new(
            dep1: Arc<dyn Dependency1>,
            _dep3: Arc<dyn Dependency3>,
            _dep2: Box<dyn Dependency2>,
            value: i32,
        ) -> Self {
            Self { dep1, value }
        }
    }

    let mut context = ConstructorContext::<Extended>::new().unwrap();
    context.inject(Arc::new(Fake1(1)) as Arc<dyn Dependency1>).unwrap();
    context.inject(41).unwrap();

    let obj = context.build().unwrap();
    assert_eq!(obj.dep1.operation() as i32 + obj.value, 42);
}

#[test]
fn test_send_sync_capabilities_are_substituted() {
    let mut context = ConstructorContext::<ThreadSafeService>::new().unwrap();

    let service = context.build().unwrap();

    assert_eq!(Arc::strong_count(&service.dep1), 1);
    let handle = std::thread::spawn(move || service.dep2.name());
    let panic = handle.join().unwrap_err();
    let message = panic.downcast_ref::<String>().unwrap();
    assert!(message.contains("Dependency2::name is an unconfigured member"));
}

#[test]
fn test_boxed_fake_is_injected_by_value() {
    let mut context = ConstructorContext::<MultipleConstructorClass>::with_parameter_types(
        &param_types![Arc<dyn Dependency1>, Box<dyn Dependency2>],
    )
    .unwrap();
    context
        .inject_owned(Box::new(Fake2) as Box<dyn Dependency2>)
        .unwrap();

    assert_eq!(context.build().unwrap().parts, 2);
}
