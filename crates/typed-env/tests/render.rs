use typed_env::render::render_export;
use typed_env::util::quote_literal;
use typed_env::{Environment, Export, RenderMode, Schema, is_public, partition, render, validate};

fn export(key: &str, values: &[&str]) -> Export {
    Export {
        key: key.to_string(),
        values: values.iter().map(|v| v.to_string()).collect(),
    }
}

#[test]
fn renders_literal_union() {
    let line = render_export(&export("NODE_ENV", &["development", "production"]), RenderMode::Literal);
    assert_eq!(
        line,
        "export const NODE_ENV = process.env.NODE_ENV as 'development' | 'production';"
    );
}

#[test]
fn renders_generic_type() {
    let line = render_export(&export("NODE_ENV", &["development", "production"]), RenderMode::Generic);
    assert_eq!(line, "export const NODE_ENV = process.env.NODE_ENV as string;");
}

#[test]
fn joins_exports_with_single_blank_line() {
    let text = render(
        &[export("A", &["1"]), export("B", &["2"]), export("C", &["3"])],
        RenderMode::Literal,
    );
    assert_eq!(
        text,
        "export const A = process.env.A as '1';\n\nexport const B = process.env.B as '2';\n\nexport const C = process.env.C as '3';"
    );
    assert!(!text.ends_with('\n'));
}

#[test]
fn empty_partition_renders_nothing() {
    assert_eq!(render(&[], RenderMode::Literal), "");
}

#[test]
fn escapes_quotes_and_backslashes() {
    assert_eq!(quote_literal("plain"), "'plain'");
    assert_eq!(quote_literal("it's"), r"'it\'s'");
    assert_eq!(quote_literal(r"C:\tmp"), r"'C:\\tmp'");
    assert_eq!(quote_literal("a\nb"), r"'a\nb'");
}

#[test]
fn render_mode_follows_vercel_flag() {
    assert_eq!(RenderMode::from_env(&Environment::new()), RenderMode::Literal);
    assert_eq!(
        RenderMode::from_env(&Environment::new().with_var("VERCEL", "1")),
        RenderMode::Generic
    );
    assert_eq!(
        RenderMode::from_env(&Environment::new().with_var("VERCEL", "0")),
        RenderMode::Literal
    );
}

#[test]
fn classifies_public_keys() {
    assert!(is_public("NEXT_PUBLIC_API_URL"));
    assert!(is_public("NODE_ENV"));
    assert!(!is_public("SECRET_KEY"));
    assert!(!is_public("NODE_ENV_EXTRA"));
    assert!(!is_public("next_public_lowercase"));
}

#[test]
fn partitions_in_schema_order_with_full_enumerations() {
    let schema = Schema::builder()
        .enumeration("NODE_ENV", ["development", "production", "test"])
        .string("SECRET_KEY")
        .number("NEXT_PUBLIC_PORT")
        .build()
        .expect("schema");
    let env = Environment::from_iter([
        ("NEXT_PUBLIC_PORT", "8080"),
        ("SECRET_KEY", "s3cr3t"),
        ("NODE_ENV", "test"),
    ]);
    let record = validate(&schema, &env).expect("valid");

    let parts = partition(&record, &schema);
    assert_eq!(
        parts.server,
        [
            export("NODE_ENV", &["development", "production", "test"]),
            export("SECRET_KEY", &["s3cr3t"]),
            export("NEXT_PUBLIC_PORT", &["8080"]),
        ]
    );
    assert_eq!(
        parts.client,
        [
            export("NODE_ENV", &["development", "production", "test"]),
            export("NEXT_PUBLIC_PORT", &["8080"]),
        ]
    );
}

#[test]
fn numbers_render_as_written_in_the_environment() {
    let schema = Schema::builder()
        .number("NEXT_PUBLIC_PORT")
        .build()
        .expect("schema");

    for raw in ["1e3", "0.10", "007", "1e21"] {
        let env = Environment::from_iter([("NEXT_PUBLIC_PORT", raw)]);
        let record = validate(&schema, &env).expect("valid");
        let parts = partition(&record, &schema);

        assert_eq!(parts.client, [export("NEXT_PUBLIC_PORT", &[raw])]);
        assert_eq!(
            render(&parts.client, RenderMode::Literal),
            format!("export const NEXT_PUBLIC_PORT = process.env.NEXT_PUBLIC_PORT as '{raw}';")
        );
    }
}
