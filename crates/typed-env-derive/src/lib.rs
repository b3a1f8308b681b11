use darling::ast::NestedMeta;
use darling::{Error, FromField, FromMeta};
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use std::collections::HashSet;
use syn::{Attribute, Data, DeriveInput, Expr, Fields, Lit, Meta, Type, parse_macro_input};

/// Parsed representation of a field with #[env_var(...)] attributes.
#[derive(Debug, FromField)]
#[darling(attributes(env_var))]
struct EnvField {
    ident: Option<syn::Ident>,
    ty: syn::Type,

    /// Explicit variable name; defaults to the field name upper-cased.
    #[darling(default)]
    rename: Option<String>,

    /// Closed set of accepted values.
    #[darling(default)]
    one_of: Option<Members>,
}

/// Represents `#[env_var(one_of("a", "b", ...))]`.
#[derive(Debug, Clone)]
struct Members(Vec<syn::LitStr>);

impl FromMeta for Members {
    fn from_list(items: &[NestedMeta]) -> Result<Self, Error> {
        let mut members = Vec::with_capacity(items.len());
        for item in items {
            match item {
                NestedMeta::Lit(Lit::Str(s)) => members.push(s.clone()),
                other => {
                    return Err(Error::custom("expected a string literal").with_span(other));
                }
            }
        }
        Ok(Members(members))
    }
}

#[proc_macro_derive(EnvSchema, attributes(env_var))]
pub fn derive_env_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into(),
    }
}

fn expand(input: &DeriveInput) -> Result<proc_macro2::TokenStream, Error> {
    let name = &input.ident;
    let struct_doc_tokens = doc_option_tokens(doc_from_attrs(&input.attrs));

    let fields = match &input.data {
        Data::Struct(ds) => match &ds.fields {
            Fields::Named(n) => &n.named,
            _ => {
                return Err(
                    Error::custom("EnvSchema expects a struct with named fields").with_span(name)
                );
            }
        },
        _ => return Err(Error::custom("EnvSchema expects a struct").with_span(name)),
    };

    let mut errors = Error::accumulator();
    let mut seen = HashSet::new();
    let mut field_spec_exprs = Vec::new();

    for f in fields {
        let Some(ef) = errors.handle(EnvField::from_field(f)) else {
            continue;
        };
        let Some(ident) = ef.ident.as_ref() else {
            continue;
        };

        let key = ef
            .rename
            .clone()
            .unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_uppercase());
        if !seen.insert(key.clone()) {
            errors.push(Error::custom(format!("`{key}` is declared more than once")).with_span(ident));
            continue;
        }
        if is_option_type(&ef.ty) {
            errors.push(
                Error::custom("optional variables are not supported; every key is required")
                    .with_span(&ef.ty),
            );
            continue;
        }

        let descriptor = match &ef.one_of {
            Some(Members(members)) if members.is_empty() => {
                errors.push(Error::custom("`one_of` needs at least one value").with_span(ident));
                continue;
            }
            Some(Members(members)) => {
                quote! { typed_env::Descriptor::enumeration([#(#members),*]) }
            }
            None => descriptor_for_type(&ef.ty),
        };

        let key_lit = syn::LitStr::new(&key, Span::call_site());
        let doc_tokens = doc_option_tokens(doc_from_attrs(&f.attrs));
        field_spec_exprs.push(quote! {
            typed_env::FieldSpec::new(#key_lit, #descriptor).with_doc(#doc_tokens)
        });
    }

    errors.finish()?;

    Ok(quote! {
        impl typed_env::EnvSchema for #name {
            fn field_specs() -> ::std::vec::Vec<typed_env::FieldSpec> {
                ::std::vec![#(#field_spec_exprs),*]
            }
            fn doc() -> Option<&'static str> {
                #struct_doc_tokens
            }
        }
    })
}

// ---------- helpers ----------

fn descriptor_for_type(ty: &Type) -> proc_macro2::TokenStream {
    if is_int(ty) || is_float(ty) {
        quote! { typed_env::Descriptor::number() }
    } else {
        quote! { typed_env::Descriptor::string() }
    }
}

fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(tp) = ty {
        if let Some(seg) = tp.path.segments.last() {
            return seg.ident == "Option"
                && matches!(seg.arguments, syn::PathArguments::AngleBracketed(_));
        }
    }
    false
}

fn is_float(ty: &Type) -> bool {
    is_ident(ty, &["f32", "f64"])
}

fn is_int(ty: &Type) -> bool {
    is_ident(
        ty,
        &[
            "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128",
            "usize",
        ],
    )
}

fn is_ident(ty: &Type, names: &[&str]) -> bool {
    if let Type::Path(tp) = ty {
        if let Some(seg) = tp.path.segments.last() {
            return names.iter().any(|n| seg.ident == *n);
        }
    }
    false
}

fn doc_from_attrs(attrs: &[Attribute]) -> Option<String> {
    let mut docs = Vec::new();
    for attr in attrs {
        if let Meta::NameValue(nv) = &attr.meta {
            if nv.path.is_ident("doc") {
                if let Expr::Lit(expr_lit) = &nv.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        let line = lit_str.value().trim().to_string();
                        if !line.is_empty() {
                            docs.push(line);
                        }
                    }
                }
            }
        }
    }
    if docs.is_empty() {
        None
    } else {
        Some(docs.join("\n"))
    }
}

fn doc_option_tokens(doc: Option<String>) -> proc_macro2::TokenStream {
    match doc {
        Some(text) => {
            let lit = syn::LitStr::new(&text, Span::call_site());
            quote! { Some(#lit) }
        }
        None => quote! { None },
    }
}
