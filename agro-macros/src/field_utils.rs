use syn::{Field, FieldsNamed, Token, punctuated::Punctuated};

fn field_name_is(field: &Field, name: &str) -> bool {
    field.ident.as_ref().map(|i| i == name).unwrap_or(false)
}

/// 确保具名字段结构体包含记录头字段
/// - required: 字段模板（含类型与属性），按给定顺序置于最前
/// - 若用户已声明同名字段则复用用户的定义（保留其类型与属性），仅调整位置
pub(crate) fn ensure_header_fields(fields_named: &mut FieldsNamed, required: Vec<Field>) {
    let old_named = fields_named.named.clone();
    let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();

    let required_names: Vec<String> = required
        .iter()
        .filter_map(|f| f.ident.as_ref().map(|i| i.to_string()))
        .collect();

    for template in required.into_iter() {
        let name = template
            .ident
            .as_ref()
            .map(|i| i.to_string())
            .unwrap_or_default();
        match old_named.iter().find(|f| field_name_is(f, &name)) {
            Some(existing) => new_named.push(existing.clone()),
            None => new_named.push(template),
        }
    }

    // 业务字段保持原始顺序
    for f in old_named.into_iter() {
        let is_header = required_names.iter().any(|n| field_name_is(&f, n));
        if !is_header {
            new_named.push(f);
        }
    }

    fields_named.named = new_named;
}

/// 结构体中是否声明了给定字段
pub(crate) fn has_field(fields_named: &FieldsNamed, name: &str) -> bool {
    fields_named.named.iter().any(|f| field_name_is(f, name))
}
