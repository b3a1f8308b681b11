use typed_env::{EnvSchema, TypedEnvError}; // bring in the derive macro and error type

/// Host build configuration passed through untouched.
#[derive(Debug, Default)]
struct BuildConfig {
    react_strict_mode: bool,
}

/// Environment for the demo app.
#[derive(EnvSchema)]
#[allow(dead_code)]
struct AppEnv {
    /// Public API origin, safe to ship to the browser.
    next_public_api_url: String,

    /// Signing secret, server only.
    secret_key: String,

    /// Port the API listens on.
    port: u16,

    #[env_var(one_of("development", "production", "test"))]
    node_env: String,
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let config = BuildConfig {
        react_strict_mode: true,
    };

    let result = AppEnv::schema().and_then(|schema| typed_env::with_typed_env(config, &schema));
    match result {
        Ok(cfg) => {
            println!("Loaded config: {:#?}", cfg);
        }
        Err(TypedEnvError::Validation(errors)) => {
            eprintln!("{errors}");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("Env error: {}", err);
            std::process::exit(1);
        }
    }
}
