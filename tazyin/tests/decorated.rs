//! End-to-end decorated registrations through the facade crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tazyin::prelude::*;

trait Service: Send + Sync {
    fn name(&self) -> &'static str;
    fn decorated(&self) -> Option<Arc<dyn Service>>;
}

struct Layer {
    name: &'static str,
    decorated: Option<Arc<dyn Service>>,
}

impl Service for Layer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn decorated(&self) -> Option<Arc<dyn Service>> {
        self.decorated.clone()
    }
}

fn layer(name: &'static str, decorated: Option<Arc<dyn Service>>) -> Arc<dyn Service> {
    Arc::new(Layer { name, decorated })
}

#[test]
fn chain_wraps_a_in_b_in_c() {
    let a = layer("A", None);

    let mut builder = Container::builder();
    builder
        .register_decorated_transient({
            let a = a.clone();
            move |_| Ok(a.clone())
        })
        .unwrap()
        .add_decorator(|inner, _| Ok(layer("B", Some(inner))))
        .add_decorator(|inner, _| Ok(layer("C", Some(inner))));

    let container = builder.build().unwrap();
    let c: Arc<dyn Service> = container.resolve().unwrap();

    assert_eq!(c.name(), "C");
    let b = c.decorated().unwrap();
    assert_eq!(b.name(), "B");
    let inner = b.decorated().unwrap();
    assert!(Arc::ptr_eq(&inner, &a));
}

#[test]
fn each_lifetime_controls_how_often_the_chain_runs() {
    let cases = [
        (Lifetime::Singleton, 1),
        (Lifetime::Scoped, 2),
        (Lifetime::Transient, 4),
    ];

    for (lifetime, expected_runs) in cases {
        let runs = Arc::new(AtomicU32::new(0));

        let mut builder = Container::builder();
        builder
            .register_decorated_fn(lifetime, || layer("base", None))
            .unwrap()
            .add_decorator({
                let runs = runs.clone();
                move |inner, _| {
                    runs.fetch_add(1, Ordering::SeqCst);
                    Ok(layer("counted", Some(inner)))
                }
            });
        let container = builder.build().unwrap();

        for _ in 0..2 {
            let scope = container.create_scope();
            let _first: Arc<dyn Service> = scope.resolve().unwrap();
            let _second: Arc<dyn Service> = scope.resolve().unwrap();
        }

        assert_eq!(runs.load(Ordering::SeqCst), expected_runs, "lifetime {lifetime}");
    }
}

#[test]
fn lifetime_read_from_configuration() {
    let configured = "transient";
    let mut builder = Container::builder();
    builder
        .register_decorated_fn(configured, || layer("base", None))
        .unwrap();

    let container = builder.build().unwrap();
    let a: Arc<dyn Service> = container.resolve().unwrap();
    let b: Arc<dyn Service> = container.resolve().unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn decorator_failure_reaches_the_caller() {
    let mut builder = Container::builder();
    builder
        .register_decorated_singleton_fn(|| layer("base", None))
        .unwrap()
        .add_decorator(|_, r| {
            let _missing: u64 = r.resolve()?;
            Ok(layer("never", None))
        });

    let container = builder.build().unwrap();
    match container.resolve::<Arc<dyn Service>>() {
        Err(TazyinError::NotRegistered(err)) => {
            assert_eq!(err.requested, ServiceKey::of::<u64>());
        }
        Err(other) => panic!("Expected NotRegistered, got: {other:?}"),
        Ok(_) => panic!("Expected NotRegistered, got a service"),
    }
}
