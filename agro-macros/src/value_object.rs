use crate::derive_utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[value_object] 宏实现
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并/追加派生：Default, Clone, (Debug 可控), Serialize, Deserialize, PartialEq, (Eq 可控)
/// - 参数：`#[value_object(debug = true|false, eq = true|false)]`，默认均为 true；
///   含浮点字段的值对象需要 `eq = false`
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as ValueObjectAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Default),
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
    ];
    if cfg.derive_eq {
        required.push(syn::parse_quote!(Eq));
    }
    if cfg.derive_debug {
        required.insert(0, syn::parse_quote!(Debug));
    }

    match &mut input {
        Item::Struct(st) => {
            apply_derives(&mut st.attrs, required);
            TokenStream::from(quote! { #st })
        }
        Item::Enum(en) => {
            apply_derives(&mut en.attrs, required);
            TokenStream::from(quote! { #en })
        }
        other => syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
            .to_compile_error()
            .into(),
    }
}

// -------- parsing --------

struct ValueObjectAttrConfig {
    derive_debug: bool,
    derive_eq: bool,
}

impl Parse for ValueObjectAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut debug: Option<bool> = None;
        let mut eq: Option<bool> = None;

        let pairs: Punctuated<syn::MetaNameValue, Token![,]> = Punctuated::parse_terminated(input)?;
        for pair in pairs {
            let slot = if pair.path.is_ident("debug") {
                &mut debug
            } else if pair.path.is_ident("eq") {
                &mut eq
            } else {
                return Err(syn::Error::new(
                    pair.path.span(),
                    "unknown key in attribute; expected 'debug' or 'eq'",
                ));
            };
            if slot.is_some() {
                return Err(syn::Error::new(pair.path.span(), "duplicate key in attribute"));
            }
            match pair.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Bool(b),
                    ..
                }) => *slot = Some(b.value()),
                other => {
                    return Err(syn::Error::new(other.span(), "expected boolean literal"));
                }
            }
        }

        Ok(Self {
            derive_debug: debug.unwrap_or(true),
            derive_eq: eq.unwrap_or(true),
        })
    }
}
