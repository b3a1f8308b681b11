use typed_env::{Environment, IssueKind, Scalar, Schema, validate};

fn schema() -> Schema {
    Schema::builder()
        .string("NEXT_PUBLIC_API_URL")
        .number("PORT")
        .enumeration("NODE_ENV", ["development", "production", "test"])
        .build()
        .expect("valid schema")
}

#[test]
fn accepts_conforming_environment() {
    let env = Environment::from_iter([
        ("NEXT_PUBLIC_API_URL", "https://api.example.com"),
        ("PORT", "3000"),
        ("NODE_ENV", "production"),
        ("UNRELATED", "ignored"),
    ]);

    let record = validate(&schema(), &env).expect("valid");
    assert_eq!(
        record.keys().collect::<Vec<_>>(),
        ["NEXT_PUBLIC_API_URL", "PORT", "NODE_ENV"]
    );
    assert_eq!(
        record.get("NEXT_PUBLIC_API_URL"),
        Some(&Scalar::String("https://api.example.com".into()))
    );
    assert_eq!(
        record.get("PORT"),
        Some(&Scalar::Number {
            raw: "3000".into(),
            value: 3000.0
        })
    );
    assert_eq!(
        record.get("NODE_ENV"),
        Some(&Scalar::String("production".into()))
    );
    assert!(record.get("UNRELATED").is_none());
}

#[test]
fn reports_every_missing_key() {
    let env = Environment::from_iter([("PORT", "8080")]);

    let errors = validate(&schema(), &env).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors.keys().collect::<Vec<_>>(),
        ["NEXT_PUBLIC_API_URL", "NODE_ENV"]
    );
    assert!(errors.iter().all(|issue| issue.kind == IssueKind::Missing));
}

#[test]
fn rejects_value_outside_enumeration() {
    let env = Environment::from_iter([
        ("NEXT_PUBLIC_API_URL", "https://api.example.com"),
        ("PORT", "3000"),
        ("NODE_ENV", "Production"),
    ]);

    let errors = validate(&schema(), &env).unwrap_err();
    let issue = errors.get("NODE_ENV").expect("NODE_ENV issue");
    assert_eq!(issue.kind, IssueKind::NotInEnumeration);
    assert!(issue.message.contains("'development' | 'production' | 'test'"));
    assert!(issue.message.contains("'Production'"));
}

#[test]
fn rejects_non_numeric_values() {
    for raw in ["", "  ", "abc", "3000px", "NaN", "inf"] {
        let env = Environment::from_iter([
            ("NEXT_PUBLIC_API_URL", "x"),
            ("PORT", raw),
            ("NODE_ENV", "test"),
        ]);
        let errors = validate(&schema(), &env).unwrap_err();
        let issue = errors.get("PORT").expect("PORT issue");
        assert_eq!(issue.kind, IssueKind::NotANumber, "value {raw:?}");
    }
}

#[test]
fn coerces_numeric_strings() {
    for (raw, expected) in [(" 42 ", 42.0), ("-1.5", -1.5), ("1e3", 1000.0)] {
        let env = Environment::from_iter([
            ("NEXT_PUBLIC_API_URL", "x"),
            ("PORT", raw),
            ("NODE_ENV", "test"),
        ]);
        let record = validate(&schema(), &env).expect("valid");
        let port = record.get("PORT").expect("PORT");
        assert_eq!(port.as_number(), Some(expected));
        assert_eq!(port.to_string(), raw);
    }
}

#[test]
fn empty_string_is_a_present_value() {
    let schema = Schema::builder().string("EMPTY").build().expect("schema");
    let env = Environment::from_iter([("EMPTY", "")]);

    let record = validate(&schema, &env).expect("valid");
    assert_eq!(record.get("EMPTY"), Some(&Scalar::String(String::new())));
}

#[test]
fn collects_mixed_problems_in_schema_order() {
    let env = Environment::from_iter([("PORT", "many"), ("NODE_ENV", "staging")]);

    let errors = validate(&schema(), &env).unwrap_err();
    let kinds: Vec<_> = errors.iter().map(|issue| issue.kind.clone()).collect();
    assert_eq!(
        kinds,
        [
            IssueKind::Missing,
            IssueKind::NotANumber,
            IssueKind::NotInEnumeration
        ]
    );
}

#[test]
fn renders_one_problem_per_line() {
    let env = Environment::new();

    let errors = validate(&schema(), &env).unwrap_err();
    let text = errors.to_string();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "environment validation failed:");
    assert_eq!(
        lines[1],
        "  - NEXT_PUBLIC_API_URL: required in schema but missing in environment"
    );
    assert!(lines[2].starts_with("  - PORT: "));
    assert!(lines[3].starts_with("  - NODE_ENV: "));
}

#[test]
fn empty_schema_accepts_anything() {
    let schema = Schema::builder().build().expect("schema");
    let record = validate(&schema, &Environment::from_iter([("A", "b")])).expect("valid");
    assert!(record.is_empty());
}

#[cfg(unix)]
#[test]
fn non_unicode_value_is_reported_distinctly() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let env = Environment::from_vars_os([
        (OsString::from("NEXT_PUBLIC_API_URL"), OsString::from_vec(vec![0x66, 0xff])),
        (OsString::from("PORT"), OsString::from("3000")),
    ]);
    assert!(env.is_non_unicode("NEXT_PUBLIC_API_URL"));
    assert_eq!(env.get("NEXT_PUBLIC_API_URL"), None);

    let errors = validate(&schema(), &env).unwrap_err();
    let issue = errors.get("NEXT_PUBLIC_API_URL").expect("url issue");
    assert_eq!(issue.kind, IssueKind::NotUnicode);
    assert_eq!(issue.message, "value is not valid unicode");
    assert_eq!(errors.get("NODE_ENV").expect("node env").kind, IssueKind::Missing);
    assert!(errors.get("PORT").is_none());
}

#[cfg(unix)]
#[test]
fn explicit_value_clears_non_unicode_marker() {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let env = Environment::from_vars_os([(OsString::from("PORT"), OsString::from_vec(vec![0xfe]))])
        .with_var("PORT", "3000");

    assert!(!env.is_non_unicode("PORT"));
    assert_eq!(env.get("PORT"), Some("3000"));
}
