use quote::quote;
use syn::{Path, Type, TypePath};

pub fn is_bool(ty: &Type) -> bool {
    matches!(ty, Type::Path(TypePath { qself: None, path }) if path.is_ident("bool"))
}

pub fn build_cli_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    if let Some(parse_with) = parse_with {
        quote! { #parse_with(&raw)? }
    } else {
        quote! {
            raw.parse::<#ty>()
                .map_err(|e| crate::Error::invalid_input(format!(
                    "Invalid value for --{name}: {raw} ({e})"
                )))?
        }
    }
}

pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (idx, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx != 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::{build_cli_parse_expr, is_bool, to_kebab_case};

    #[test]
    fn is_bool_only_matches_plain_bool() {
        let plain: syn::Type = parse_quote!(bool);
        let wrapped: syn::Type = parse_quote!(Option<bool>);
        let other: syn::Type = parse_quote!(usize);

        assert!(is_bool(&plain));
        assert!(!is_bool(&wrapped));
        assert!(!is_bool(&other));
    }

    #[test]
    fn build_cli_parse_expr_prefers_custom_parser() {
        let ty: syn::Type = parse_quote!(LogLevel);
        let parser: syn::Path = parse_quote!(LogLevel::parse);

        let custom = build_cli_parse_expr(&ty, Some(&parser)).to_string();
        let default = build_cli_parse_expr(&ty, None).to_string();

        assert!(custom.contains("LogLevel :: parse"));
        assert!(default.contains("parse :: < LogLevel >"));
    }

    #[test]
    fn to_kebab_case_inserts_dashes_before_ascii_uppercase() {
        assert_eq!(to_kebab_case("LogFormat"), "log-format");
        assert_eq!(to_kebab_case("already-kebab"), "already-kebab");
        assert_eq!(to_kebab_case("X"), "x");
    }
}
