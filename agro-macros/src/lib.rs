//! agro 过程宏
//!
//! - `#[record]`：为业务记录注入记录头字段并实现 `Record`/`Coded`
//! - `#[entity_id]`：为单字段 tuple struct 形式的标识生成常用实现
//! - `#[value_object]`：为值对象合并常用派生
//!
use proc_macro::TokenStream;

mod derive_utils;
mod entity_id;
mod field_utils;
mod record;
mod value_object;

/// 业务记录宏
///
/// ```ignore
/// #[record(kind = "agent", prefix = "AGNT", search = [code, name, phone], unique = [phone])]
/// #[serde(rename_all = "camelCase")]
/// pub struct Agent {
///     name: String,
///     phone: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn record(attr: TokenStream, item: TokenStream) -> TokenStream {
    record::expand(attr, item)
}

/// 实体标识宏，仅支持单字段 tuple struct（例如 `struct RecordId(Uuid);`）
#[proc_macro_attribute]
pub fn entity_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity_id::expand(attr, item)
}

/// 值对象宏，支持结构体与枚举
#[proc_macro_attribute]
pub fn value_object(attr: TokenStream, item: TokenStream) -> TokenStream {
    value_object::expand(attr, item)
}
