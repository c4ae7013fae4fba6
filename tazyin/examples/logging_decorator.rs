//! Decorating a service with a logging layer.
//!
//! Run with `RUST_LOG=info cargo run --example logging_decorator`.

use std::sync::Arc;

use tazyin::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

// === The service and its plain implementation ===

trait ExampleService: Send + Sync {
    fn get_something(&self, some_value: i32) -> String;
}

struct PlainExampleService;

impl ExampleService for PlainExampleService {
    fn get_something(&self, some_value: i32) -> String {
        format!("something #{some_value}")
    }
}

impl From<PlainExampleService> for Arc<dyn ExampleService> {
    fn from(service: PlainExampleService) -> Self {
        Arc::new(service)
    }
}

// === A pass-through decorator that logs every call ===

#[derive(Clone)]
struct LogTarget(&'static str);

struct LoggingExampleService {
    inner: Arc<dyn ExampleService>,
    target: LogTarget,
}

impl ExampleService for LoggingExampleService {
    fn get_something(&self, some_value: i32) -> String {
        let something = self.inner.get_something(some_value);
        info!(
            service = self.target.0,
            some_value,
            something = %something,
            "Called get_something"
        );
        something
    }
}

impl From<LoggingExampleService> for Arc<dyn ExampleService> {
    fn from(service: LoggingExampleService) -> Self {
        Arc::new(service)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut builder = Container::builder()
        .singleton_value(LogTarget("example"))
        .constructor::<PlainExampleService>(|_| Ok(PlainExampleService))
        .constructor::<LoggingExampleService>(|r| {
            Ok(LoggingExampleService {
                inner: r.resolve()?,
                target: r.resolve()?,
            })
        });

    builder
        .register_decorated_singleton_impl::<Arc<dyn ExampleService>, PlainExampleService>()?
        .add_decorator_impl::<LoggingExampleService>();

    // ...or, with closures instead of constructors:
    //
    // builder
    //     .register_decorated_transient_fn(|| Arc::new(PlainExampleService) as Arc<dyn ExampleService>)?
    //     .add_decorator(|inner, r| {
    //         Ok(Arc::new(LoggingExampleService { inner, target: r.resolve()? }) as Arc<dyn ExampleService>)
    //     });

    let container = builder.build()?;

    let example_service: Arc<dyn ExampleService> = container.resolve()?;
    println!("{}", example_service.get_something(123));

    Ok(())
}
