//! Binding behavior through the public API and the `#[inject]` attribute.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use inject::{inject, Args, Binder, InjectConfig, InjectError, Injectable, ServiceRegistry, Value};
use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

fn init_tracing() {
    Lazy::force(&TRACING);
}

#[test]
fn test_binding_keeps_target_identity() {
    init_tracing();

    #[inject]
    #[derive(Injectable)]
    struct Foo;

    let binding = Foo::binding().unwrap();
    let _foo: Foo = binding.instantiate().unwrap();
    assert_eq!(binding.name(), "Foo");
    assert!(binding.is_a::<Foo>());
    assert!(binding.inject_names().is_empty());
}

#[test]
fn test_primitives_are_injected() {
    init_tracing();

    #[inject(1, "abc", true)]
    #[derive(Injectable)]
    struct Foo {
        num: i32,
        text: &'static str,
        flag: bool,
    }

    let foo = Foo::binding().unwrap().instantiate().unwrap();
    assert_eq!(foo.num, 1);
    assert_eq!(foo.text, "abc");
    assert!(foo.flag);
}

#[test]
fn test_unique_value_keeps_identity() {
    init_tracing();

    #[derive(Injectable)]
    struct Foo {
        symbol: Value,
    }

    let symbol = Value::new(());
    let foo = Binder::new()
        .dependency(symbol.clone())
        .bind::<Foo>()
        .unwrap()
        .instantiate()
        .unwrap();
    assert!(foo.symbol.ptr_eq(&symbol));
}

#[test]
fn test_array_and_object_keep_identity() {
    init_tracing();

    #[derive(Injectable)]
    struct Foo {
        arr: Arc<Vec<i32>>,
        obj: Arc<HashMap<String, String>>,
    }

    let arr = Arc::new(Vec::new());
    let obj = Arc::new(HashMap::new());
    let foo = Binder::new()
        .dependency(Value::from_arc(Arc::clone(&arr)))
        .dependency(Value::from_arc(Arc::clone(&obj)))
        .bind::<Foo>()
        .unwrap()
        .instantiate()
        .unwrap();
    assert!(Arc::ptr_eq(&foo.arr, &arr));
    assert!(Arc::ptr_eq(&foo.obj, &obj));
}

#[test]
fn test_function_is_passed_through() {
    init_tracing();

    fn greet() -> &'static str {
        "hello"
    }

    #[derive(Injectable)]
    struct Foo {
        greet: Value,
    }

    let greet_value = Value::new(greet as fn() -> &'static str);
    let foo = Binder::new()
        .dependency(greet_value.clone())
        .bind::<Foo>()
        .unwrap()
        .instantiate()
        .unwrap();
    assert!(foo.greet.ptr_eq(&greet_value));
    let f = foo.greet.downcast::<fn() -> &'static str>().unwrap();
    assert_eq!(f(), "hello");
}

#[test]
fn test_class_is_instantiated() {
    init_tracing();

    #[derive(Injectable, Clone)]
    struct Foo;

    #[inject(factory(Foo))]
    #[derive(Injectable)]
    struct Bar {
        foo: Foo,
    }

    let binding = Bar::binding().unwrap();
    let resolved = binding.dependencies().next().unwrap();
    assert!(resolved.is::<Foo>());
    let _bar: Bar = binding.instantiate().unwrap();
}

#[test]
fn test_bound_classes_compose() {
    init_tracing();

    #[derive(Injectable, Clone)]
    struct Foo;

    #[inject(factory(Foo))]
    #[derive(Injectable)]
    struct Bar {
        foo: Foo,
    }

    #[inject(bound(Bar))]
    #[derive(Injectable)]
    struct Baz {
        bar: Arc<Bar>,
    }

    let baz = Baz::binding().unwrap().instantiate().unwrap();
    let _foo: &Foo = &baz.bar.foo;

    // The inner instance is created once, when `Baz` is bound
    let binding = Baz::binding().unwrap();
    let first = binding.instantiate().unwrap();
    let second = binding.instantiate().unwrap();
    assert!(Arc::ptr_eq(&first.bar, &second.bar));
}

static COUNTED_BUILDS: AtomicUsize = AtomicUsize::new(0);

struct Counted;

impl Injectable for Counted {
    const NAME: &'static str = "Counted";

    fn construct(_args: &mut Args) -> Result<Self, InjectError> {
        COUNTED_BUILDS.fetch_add(1, Ordering::SeqCst);
        Ok(Counted)
    }
}

#[inject(factory(Counted))]
#[derive(Injectable)]
struct Cached {
    counted: Arc<Counted>,
}

#[test]
fn test_attribute_binds_once_per_type() {
    init_tracing();

    let first = Cached::binding().unwrap().instantiate().unwrap();
    let second = Cached::binding().unwrap().instantiate().unwrap();
    assert!(Arc::ptr_eq(&first.counted, &second.counted));
    assert_eq!(COUNTED_BUILDS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_call_arguments_override_injected() {
    init_tracing();

    #[inject(1)]
    #[derive(Injectable)]
    struct Foo {
        num: i32,
    }

    let binding = Foo::binding().unwrap();
    assert_eq!(binding.instantiate().unwrap().num, 1);
    assert_eq!(binding.instantiate_with(vec![Value::new(2)]).unwrap().num, 2);
}

#[test]
fn test_injects_into_base_of_derived_type() {
    init_tracing();

    #[derive(Injectable)]
    struct Foo {
        num1: i32,
    }

    #[inject(1, 2)]
    #[derive(Injectable)]
    struct Bar {
        #[injectable(base)]
        foo: Foo,
        num2: i32,
    }

    let bar = Bar::binding().unwrap().instantiate().unwrap();
    assert_eq!(bar.foo.num1, 1);
    assert_eq!(bar.num2, 2);
}

#[inject(1)]
#[derive(Injectable)]
struct Root {
    num1: i32,
}

#[inject(extends = Root)]
#[derive(Injectable)]
struct Middle {
    #[injectable(base)]
    root: Root,
}

#[inject(extends = Middle, 2)]
#[derive(Injectable)]
struct Leaf {
    #[injectable(base)]
    middle: Middle,
    num2: i32,
}

#[test]
fn test_inherits_ancestor_dependencies() {
    init_tracing();

    let binding = Leaf::binding().unwrap();
    assert!(binding.is_a::<Leaf>());
    assert!(binding.is_a::<Middle>());
    assert!(binding.is_a::<Root>());
    assert!(!binding.is_a::<String>());
    assert_eq!(
        binding.ancestors().iter().map(|a| a.name).collect::<Vec<_>>(),
        ["Root", "Middle"]
    );

    let leaf = binding.instantiate().unwrap();
    assert_eq!(leaf.middle.root.num1, 1);
    assert_eq!(leaf.num2, 2);
}

#[test]
fn test_overrides_inherited_dependencies() {
    init_tracing();

    let leaf = Leaf::binding()
        .unwrap()
        .instantiate_with(vec![Value::new(3), Value::new(4)])
        .unwrap();
    assert_eq!(leaf.middle.root.num1, 3);
    assert_eq!(leaf.num2, 4);
}

#[test]
fn test_named_placeholders_aggregate_ancestors_first() {
    init_tracing();

    #[inject(named("$http"))]
    #[derive(Injectable)]
    struct Client {
        http: Value,
    }

    #[inject(extends = Client, 5, named("$q"))]
    #[derive(Injectable)]
    struct Api {
        #[injectable(base)]
        client: Client,
        retries: i32,
        q: Value,
    }

    let binding = Api::binding().unwrap();
    assert_eq!(binding.inject_names(), ["$http", "$q"]);

    let http = Value::new(String::from("http"));
    let q = Value::new(String::from("q"));
    let api = binding
        .instantiate_injected(vec![http.clone(), q.clone()])
        .unwrap();
    assert!(api.client.http.ptr_eq(&http));
    assert!(api.q.ptr_eq(&q));
    assert_eq!(api.retries, 5);
}

#[derive(Debug)]
struct RootScope {
    id: u32,
}

#[derive(Injectable, Clone)]
struct Settings;

#[inject(1, named("$rootScope"), factory(Settings))]
#[derive(Injectable)]
struct Controller {
    num: i32,
    scope: Arc<RootScope>,
    settings: Settings,
}

#[test]
fn test_inject_names_drive_registry_resolution() {
    init_tracing();

    let binding = Controller::binding().unwrap();
    assert_eq!(binding.inject_names(), ["$rootScope"]);

    let mut registry = ServiceRegistry::new();
    registry
        .register_value("$rootScope", Value::new(RootScope { id: 9 }))
        .unwrap()
        .register_service("controller", binding)
        .unwrap();

    let controller = registry.get_arc::<Controller>("controller").unwrap();
    assert_eq!(controller.num, 1);
    assert_eq!(controller.scope.id, 9);
    let _settings: &Settings = &controller.settings;
}

#[test]
fn test_strict_attribute() {
    init_tracing();

    #[inject(strict, 1, 2)]
    #[derive(Injectable)]
    struct Single {
        a: i32,
    }

    let binding = Single::binding().unwrap();
    assert!(binding.is_strict());
    let err = binding.instantiate().err().unwrap();
    assert!(matches!(
        err,
        InjectError::UnconsumedArguments {
            target: "Single",
            count: 1
        }
    ));
}

#[test]
fn test_binder_from_config() {
    init_tracing();

    #[derive(Injectable)]
    struct Foo {
        scope: Value,
    }

    let config = InjectConfig {
        strict: true,
        ..InjectConfig::default()
    };
    let binding = Binder::with_config(&config)
        .named("$scope")
        .bind::<Foo>()
        .unwrap();

    let err = binding.instantiate_named(&HashMap::new()).err().unwrap();
    assert!(matches!(err, InjectError::UnresolvedPlaceholder { ref name, .. } if name == "$scope"));
}

#[test]
fn test_mismatched_argument_type_is_reported() {
    init_tracing();

    #[inject("not a number")]
    #[derive(Injectable)]
    struct Foo {
        num: i32,
    }

    let err = Foo::binding().unwrap().instantiate().err().unwrap();
    assert!(matches!(
        err,
        InjectError::ArgumentType {
            target: "Foo",
            index: 0,
            expected: "i32",
            ..
        }
    ));
}

#[test]
fn test_failing_factory_fails_bind() {
    init_tracing();

    #[derive(Injectable, Clone)]
    struct NeedsArg {
        value: u8,
    }

    #[inject(factory(NeedsArg))]
    #[derive(Injectable)]
    struct Foo {
        dep: NeedsArg,
    }

    let err = Foo::binding().err().unwrap();
    assert!(matches!(err, InjectError::Factory { ref factory, .. } if factory == "NeedsArg"));
}
