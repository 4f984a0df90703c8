use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, parse_macro_input, spanned::Spanned};

use crate::utils;

/// One unit variant and the command-line spellings that select it.
struct Choice {
    ident: Ident,
    canonical: String,
    aliases: Vec<String>,
}

pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    let enum_ident = input.ident.clone();

    let Data::Enum(data_enum) = input.data else {
        return syn::Error::new(input.span(), "CliValue can only be derived for enums")
            .to_compile_error()
            .into();
    };

    let option_name = match option_name(&input.attrs, &enum_ident) {
        Ok(name) => name,
        Err(err) => return err.to_compile_error().into(),
    };

    let mut choices = Vec::new();
    for variant in data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new(variant.span(), "CliValue only supports unit variants")
                .to_compile_error()
                .into();
        }
        let mut aliases = Vec::new();
        for attr in variant.attrs.iter().filter(|a| a.path().is_ident("cli")) {
            let parse_result = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("alias") {
                    let lit: LitStr = meta.value()?.parse()?;
                    aliases.push(lit.value());
                    return Ok(());
                }
                Err(meta.error("unsupported cli attribute; expected alias"))
            });
            if let Err(err) = parse_result {
                return err.to_compile_error().into();
            }
        }
        choices.push(Choice {
            canonical: utils::to_kebab_case(&variant.ident.to_string()),
            ident: variant.ident,
            aliases,
        });
    }

    let table = choices.iter().flat_map(|choice| {
        let ident = &choice.ident;
        std::iter::once(&choice.canonical)
            .chain(choice.aliases.iter())
            .map(move |token| {
                let token = LitStr::new(token, Span::call_site());
                quote! { (#token, Self::#ident) }
            })
    });
    let canonical_arms = choices.iter().map(|choice| {
        let ident = &choice.ident;
        let canonical = LitStr::new(&choice.canonical, Span::call_site());
        quote! { Self::#ident => #canonical }
    });
    let expected = choices
        .iter()
        .map(|choice| choice.canonical.as_str())
        .collect::<Vec<_>>()
        .join("|");
    let expected_lit = LitStr::new(&expected, Span::call_site());
    let option_lit = LitStr::new(&option_name, Span::call_site());

    let expanded = quote! {
        impl #enum_ident {
            /// Accepted spellings; aliases follow their canonical value.
            const CLI_CHOICES: &'static [(&'static str, Self)] = &[#(#table),*];

            /// Canonical values joined with `|`, for usage text.
            pub fn expected() -> &'static str {
                #expected_lit
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    #(#canonical_arms,)*
                }
            }

            /// Case-insensitive lookup of a canonical value or alias.
            pub fn parse(raw: &str) -> crate::Result<Self> {
                Self::CLI_CHOICES
                    .iter()
                    .find(|(token, _)| token.eq_ignore_ascii_case(raw))
                    .map(|&(_, choice)| choice)
                    .ok_or_else(|| {
                        crate::Error::invalid_input(format!(
                            "Invalid value for --{}: {raw} (expected {})",
                            #option_lit,
                            Self::expected(),
                        ))
                    })
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };

    TokenStream::from(expanded)
}

/// `#[cli_value(option = "...")]`, defaulting to the kebab-cased enum name.
fn option_name(attrs: &[Attribute], enum_ident: &Ident) -> syn::Result<String> {
    let mut name = utils::to_kebab_case(&enum_ident.to_string());
    for attr in attrs.iter().filter(|a| a.path().is_ident("cli_value")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                let lit: LitStr = meta.value()?.parse()?;
                name = lit.value();
                return Ok(());
            }
            Err(meta.error("unsupported cli_value attribute; expected option"))
        })?;
    }
    Ok(name)
}
