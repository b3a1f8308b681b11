use std::sync::Mutex;
use typed_env::{Schema, TypedEnvError, with_typed_env};

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn schema() -> Schema {
    Schema::builder()
        .string("TYPED_ENV_TEST_NEXT_PUBLIC_KEY")
        .enumeration("TYPED_ENV_TEST_MODE", ["a", "b"])
        .build()
        .expect("schema")
}

#[test]
fn reads_process_environment_and_writes_under_cwd() {
    let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
    let dir = tempfile::tempdir().expect("tempdir");
    let previous = std::env::current_dir().expect("cwd");

    unsafe {
        std::env::set_var("TYPED_ENV_TEST_NEXT_PUBLIC_KEY", "value");
        std::env::set_var("TYPED_ENV_TEST_MODE", "b");
    }
    std::env::set_current_dir(dir.path()).expect("chdir");

    let result = with_typed_env("next-config", &schema());

    std::env::set_current_dir(previous).expect("restore cwd");
    unsafe {
        std::env::remove_var("TYPED_ENV_TEST_NEXT_PUBLIC_KEY");
        std::env::remove_var("TYPED_ENV_TEST_MODE");
    }

    assert_eq!(result.expect("generate"), "next-config");
    let server = std::fs::read_to_string(dir.path().join("env/env.server.ts")).expect("server");
    assert!(server.contains("as 'value';"));
    assert!(server.contains(
        "export const TYPED_ENV_TEST_MODE = process.env.TYPED_ENV_TEST_MODE as 'a' | 'b';"
    ));
    // Neither key is public.
    let client = std::fs::read_to_string(dir.path().join("env/env.client.ts")).expect("client");
    assert_eq!(client, "");
}

#[test]
fn surfaces_missing_process_variables() {
    let _guard = ENV_MUTEX.lock().expect("env mutex poisoned");
    unsafe {
        std::env::remove_var("TYPED_ENV_TEST_NEXT_PUBLIC_KEY");
        std::env::remove_var("TYPED_ENV_TEST_MODE");
    }

    match with_typed_env((), &schema()) {
        Err(TypedEnvError::Validation(errors)) => {
            assert_eq!(
                errors.keys().collect::<Vec<_>>(),
                ["TYPED_ENV_TEST_NEXT_PUBLIC_KEY", "TYPED_ENV_TEST_MODE"]
            );
        }
        Ok(_) => panic!("expected validation failure"),
        Err(other) => panic!("unexpected error: {other:?}"),
    }
}
