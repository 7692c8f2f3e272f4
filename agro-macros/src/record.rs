use crate::derive_utils::apply_derives;
use crate::field_utils::{ensure_header_fields, has_field};
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Expr, Ident, Item, ItemStruct, LitStr, Result, Token, parse::Parse, parse::ParseStream,
    parse_macro_input,
};

/// #[record] 宏实现
/// - 注入记录头字段并置于最前：`id`、`code`（仅当给出 prefix）、`owner`、`audit`（serde flatten）
/// - 合并派生：Debug（可关闭）、Clone、Serialize、Deserialize
/// - 实现 `::agro_domain::record::Record`，给出 prefix 时再实现 `::agro_domain::record::Coded`
/// - 参数：`#[record(kind = "agent", prefix = "AGNT", search = [code, name], unique = [phone], debug = true)]`
///   - `kind` 默认为类型名小写
///   - `search` 列出参与文本检索的字段（需实现 `ToString`）
///   - `unique` 列出存储层唯一约束字段；`code` 自动包含在内
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as RecordAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[record] only on struct")
                .to_compile_error()
                .into();
        }
    };

    if !st.generics.params.is_empty() {
        return syn::Error::new(st.generics.span(), "#[record] does not support generics")
            .to_compile_error()
            .into();
    }

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    if let Some(prefix) = &cfg.prefix {
        if let Err(e) = check_prefix(prefix) {
            return e.to_compile_error().into();
        }
    }

    // 检索与唯一字段必须真实存在（注入字段除外）
    let injected: &[&str] = if cfg.prefix.is_some() {
        &["id", "code", "owner"]
    } else {
        &["id", "owner"]
    };
    for ident in cfg.search.iter().chain(cfg.unique.iter()) {
        let name = ident.to_string();
        if !injected.contains(&name.as_str()) && !has_field(fields_named, &name) {
            return syn::Error::new(ident.span(), format!("unknown field `{name}`"))
                .to_compile_error()
                .into();
        }
    }

    let mut header: Vec<syn::Field> = vec![syn::parse_quote! { id: ::agro_domain::record::RecordId }];
    if cfg.prefix.is_some() {
        header.push(syn::parse_quote! { code: ::agro_domain::value_object::Code });
    }
    header.push(syn::parse_quote! { owner: ::agro_domain::record::OwnerId });
    header.push(syn::parse_quote! {
        #[serde(flatten)]
        audit: ::agro_domain::value_object::Audit
    });
    ensure_header_fields(fields_named, header);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required);

    let out_struct = ItemStruct { ..st };
    let ident = &out_struct.ident;

    let kind = cfg
        .kind
        .unwrap_or_else(|| LitStr::new(&ident.to_string().to_lowercase(), ident.span()));

    let search = cfg.search.iter();

    // code 总是第一个唯一字段
    let mut unique: Vec<Ident> = Vec::new();
    if cfg.prefix.is_some() {
        unique.push(syn::parse_quote!(code));
    }
    unique.extend(cfg.unique.into_iter().filter(|i| i != "code"));
    let unique_names = unique.iter().map(|i| i.to_string());
    let unique_idents = unique.iter();

    let coded_impl = cfg.prefix.as_ref().map(|prefix| {
        quote! {
            impl ::agro_domain::record::Coded for #ident {
                const PREFIX: &'static str = #prefix;

                fn code(&self) -> &::agro_domain::value_object::Code { &self.code }
            }
        }
    });

    let expanded = quote! {
        #out_struct

        impl ::agro_domain::record::Record for #ident {
            const KIND: &'static str = #kind;

            fn id(&self) -> &::agro_domain::record::RecordId { &self.id }

            fn owner(&self) -> &::agro_domain::record::OwnerId { &self.owner }

            fn audit(&self) -> &::agro_domain::value_object::Audit { &self.audit }

            fn audit_mut(&mut self) -> &mut ::agro_domain::value_object::Audit { &mut self.audit }

            fn search_fields(&self) -> ::std::vec::Vec<::std::string::String> {
                ::std::vec![#(::std::string::ToString::to_string(&self.#search)),*]
            }

            fn unique_fields(&self) -> ::std::vec::Vec<(&'static str, ::std::string::String)> {
                ::std::vec![#((#unique_names, ::std::string::ToString::to_string(&self.#unique_idents))),*]
            }
        }

        #coded_impl
    };

    TokenStream::from(expanded)
}

fn check_prefix(prefix: &LitStr) -> Result<()> {
    let value = prefix.value();
    let valid = !value.is_empty() && value.len() <= 8 && value.chars().all(|c| c.is_ascii_uppercase());
    if valid {
        Ok(())
    } else {
        Err(syn::Error::new(
            prefix.span(),
            "prefix must be 1 to 8 ASCII upper-case letters",
        ))
    }
}

// -------- parsing --------

#[derive(Default)]
struct RecordAttrConfig {
    kind: Option<LitStr>,
    prefix: Option<LitStr>,
    search: Vec<Ident>,
    unique: Vec<Ident>,
    derive_debug: Option<bool>,
}

impl Parse for RecordAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self::default();
        if input.is_empty() {
            return Ok(cfg);
        }

        let elems: Punctuated<RecordAttrElem, Token![,]> = Punctuated::parse_terminated(input)?;
        let mut seen: Vec<String> = Vec::new();

        for elem in elems.into_iter() {
            let (key, span) = elem.key();
            if seen.contains(&key) {
                return Err(syn::Error::new(
                    span,
                    format!("duplicate key '{key}' in attribute"),
                ));
            }
            seen.push(key);

            match elem {
                RecordAttrElem::Kind(lit) => cfg.kind = Some(lit),
                RecordAttrElem::Prefix(lit) => cfg.prefix = Some(lit),
                RecordAttrElem::Search(_, idents) => cfg.search = idents,
                RecordAttrElem::Unique(_, idents) => cfg.unique = idents,
                RecordAttrElem::Debug(_, b) => cfg.derive_debug = Some(b),
            }
        }

        Ok(cfg)
    }
}

enum RecordAttrElem {
    Kind(LitStr),
    Prefix(LitStr),
    Search(proc_macro2::Span, Vec<Ident>),
    Unique(proc_macro2::Span, Vec<Ident>),
    Debug(proc_macro2::Span, bool),
}

impl RecordAttrElem {
    fn key(&self) -> (String, proc_macro2::Span) {
        match self {
            Self::Kind(lit) => ("kind".into(), lit.span()),
            Self::Prefix(lit) => ("prefix".into(), lit.span()),
            Self::Search(span, _) => ("search".into(), *span),
            Self::Unique(span, _) => ("unique".into(), *span),
            Self::Debug(span, _) => ("debug".into(), *span),
        }
    }
}

impl Parse for RecordAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;

        if key == "kind" {
            Ok(Self::Kind(input.parse()?))
        } else if key == "prefix" {
            Ok(Self::Prefix(input.parse()?))
        } else if key == "search" {
            Ok(Self::Search(key.span(), parse_ident_list(input)?))
        } else if key == "unique" {
            Ok(Self::Unique(key.span(), parse_ident_list(input)?))
        } else if key == "debug" {
            let expr: Expr = input.parse()?;
            match expr {
                Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Bool(b),
                    ..
                }) => Ok(Self::Debug(key.span(), b.value())),
                other => Err(syn::Error::new(
                    other.span(),
                    "expected boolean literal for 'debug'",
                )),
            }
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'kind', 'prefix', 'search', 'unique' or 'debug'",
            ))
        }
    }
}

// 解析 `[a, b, c]` 形式的字段列表
fn parse_ident_list(input: ParseStream) -> Result<Vec<Ident>> {
    let array: syn::ExprArray = input.parse()?;
    array
        .elems
        .into_iter()
        .map(|e| match e {
            Expr::Path(p) if p.path.get_ident().is_some() => p
                .path
                .get_ident()
                .cloned()
                .ok_or_else(|| syn::Error::new(p.span(), "expected field name")),
            other => Err(syn::Error::new(other.span(), "expected field name")),
        })
        .collect()
}
