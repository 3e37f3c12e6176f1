//! Basic example of the Tarkib resolver.

use std::sync::Arc;

use tarkib::prelude::*;
use tarkib::value::shared;

// === Define your services ===

struct Logger;

impl Logger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

struct Database {
    url: String,
    logger: Arc<Logger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

struct UserService {
    db: Arc<Database>,
    logger: Arc<Logger>,
}

impl UserService {
    fn get_user(&self, id: u64) -> String {
        self.logger.log(&format!("Getting user {id}"));
        self.db.query(&format!("SELECT * FROM users WHERE id = {id}"))
    }
}

// === Describe how to construct them ===

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();

    registry.register(TypeSpec::new("app.Logger", |_| Ok(shared(Logger))));

    registry.register(
        TypeSpec::new("app.Database", |args| {
            Ok(shared(Database {
                url: args.get::<String>(0)?.as_str().to_owned(),
                logger: args.get::<Logger>(1)?,
            }))
        })
        .param(
            ParamSpec::new("database_url")
                .default_value(String::from("postgres://localhost/app")),
        )
        .param(ParamSpec::new("logger").typed("app.Logger")),
    );

    registry.register(
        TypeSpec::new("app.UserService", |args| {
            Ok(shared(UserService {
                db: args.get::<Database>(0)?,
                logger: args.get::<Logger>(1)?,
            }))
        })
        .param(ParamSpec::new("db").typed("app.Database"))
        .param(ParamSpec::new("logger").typed("app.Logger")),
    );

    registry
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("tarkib=trace")
        .init();

    let resolver = Resolver::with_registry(registry());

    // Override the default connection string by parameter name
    resolver.map(
        "database_url",
        Binding::value(String::from("postgres://db.internal/app")),
    );
    // Defer an expensive value until something asks for it
    resolver.map("api_token", Binding::deferred(|| shared(String::from("t-0123"))));

    let service = resolver.get_as::<UserService>("app.UserService", Flags::NONE)?;
    println!("👤 {}", service.get_user(42));

    // Unflagged resolution returns the cached instance
    let again = resolver.get_as::<UserService>("app.UserService", Flags::NONE)?;
    println!("same instance: {}", Arc::ptr_eq(&service, &again));

    // NEW_INSTANCE rebuilds the top level but reuses cached dependencies
    let fresh = resolver.get_as::<UserService>("app.UserService", Flags::NEW_INSTANCE)?;
    println!(
        "fresh service, shared database: {}",
        !Arc::ptr_eq(&again, &fresh) && Arc::ptr_eq(&again.db, &fresh.db)
    );

    // DEEP rebuilds the whole tree
    let rebuilt = resolver.get_as::<UserService>("app.UserService", Flags::DEEP)?;
    println!("rebuilt database: {}", !Arc::ptr_eq(&fresh.db, &rebuilt.db));

    // Lazily bound values are produced on first lookup and memoized
    let token = resolver.parameter("api_token")?;
    println!("token: {}", token.downcast_ref::<String>().unwrap());

    println!("{resolver:?}");
    Ok(())
}
