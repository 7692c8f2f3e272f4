use quote::ToTokens;
use std::collections::HashSet;
use syn::{Attribute, Path, Token, punctuated::Punctuated};

// 拆分出非 derive 属性与已声明的 derive 路径
fn split_derives(attrs: &[Attribute]) -> (Vec<Attribute>, Vec<Path>) {
    let mut retained = Vec::new();
    let mut declared = Vec::new();
    for attr in attrs.iter() {
        if !attr.path().is_ident("derive") {
            retained.push(attr.clone());
            continue;
        }
        if let Ok(list) = attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated) {
            declared.extend(list);
        }
    }
    (retained, declared)
}

// derive 去重键：只看最后一段，`serde::Serialize` 与 `Serialize` 视为同一项
fn derive_key(p: &Path) -> String {
    match p.segments.last() {
        Some(last) => last.ident.to_string(),
        None => p.to_token_stream().to_string(),
    }
}

/// 将宏要求的 derive 与用户已声明的合并为单个 `#[derive(..)]`，并放在属性最前
///
/// 必需项在前、用户项在后，重复项只保留第一次出现。
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<Path>) {
    let (retained, declared) = split_derives(attrs);

    let mut seen = HashSet::new();
    let merged: Vec<Path> = required
        .into_iter()
        .chain(declared)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();

    let derive: Attribute = syn::parse_quote!(#[derive(#(#merged),*)]);
    *attrs = std::iter::once(derive).chain(retained).collect();
}
