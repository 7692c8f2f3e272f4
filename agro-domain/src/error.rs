//! 领域层统一错误定义
//!
//! 聚焦编码分配、存储唯一约束、记录查找与值校验等最小必要集合，
//! 便于在各实现层统一转换为 `DomainError`。
//!
use thiserror::Error;

/// 统一错误类型（领域层最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 编码分配 ---
    /// 已持久化的最大编码无法解析出数字后缀；属于数据缺陷，不能回退为 1
    #[error("code parse error: prefix={prefix}, code={code}, reason={reason}")]
    CodeParse {
        prefix: String,
        code: String,
        reason: String,
    },
    #[error("sequence exhausted: prefix={prefix}")]
    SequenceExhausted { prefix: String },

    // --- 仓储/持久化 ---
    /// 存储层唯一约束冲突；编码冲突可重试
    #[error("conflict: {field} '{value}' already exists")]
    Conflict { field: String, value: String },
    #[error("repository error: {reason}")]
    Repository { reason: String },
    #[error("database error: {reason}")]
    Database { reason: String },

    // --- 解析 ---
    #[error("parse error: {reason}")]
    Parse { reason: String },

    // --- 领域规则 ---
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },
    #[error("not found: {reason}")]
    NotFound { reason: String },
}

impl DomainError {
    /// 是否为 `code` 字段的唯一约束冲突（并发分配竞争的表现）
    pub fn is_code_conflict(&self) -> bool {
        matches!(self, DomainError::Conflict { field, .. } if field == "code")
    }

    /// 由数据库唯一约束名构造冲突错误
    ///
    /// 约束名须遵循 Postgres 默认命名 `{table}_{column}_key`（如 `agents_code_key`），
    /// 据此还原出列名作为 `field`；不符合该命名的约束名原样保留。
    pub fn unique_violation(
        table: Option<&str>,
        constraint: &str,
        value: impl Into<String>,
    ) -> Self {
        let column = constraint.strip_suffix("_key").unwrap_or(constraint);
        let column = table
            .and_then(|t| column.strip_prefix(t))
            .and_then(|c| c.strip_prefix('_'))
            .unwrap_or(column);
        DomainError::Conflict {
            field: column.to_string(),
            value: value.into(),
        }
    }

    pub fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        DomainError::NotFound {
            reason: format!("{kind} {id} not found"),
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

// ---- Cross-crate conversions for infrastructure convenience ----
// 允许在基础设施层直接使用 `?` 将 sqlx/uuid 等错误转换为 DomainError

#[cfg(feature = "infra-sqlx")]
impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound {
                reason: "row not found".to_string(),
            },
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DomainError::unique_violation(
                    db.table(),
                    db.constraint().unwrap_or("unknown"),
                    db.message(),
                )
            }
            other => DomainError::Database {
                reason: other.to_string(),
            },
        }
    }
}

impl From<uuid::Error> for DomainError {
    fn from(err: uuid::Error) -> Self {
        DomainError::Parse {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_conflict_is_detected_only_for_code_field() {
        let code = DomainError::Conflict {
            field: "code".into(),
            value: "AGNT001".into(),
        };
        assert!(code.is_code_conflict());

        let phone = DomainError::Conflict {
            field: "phone".into(),
            value: "9999966666".into(),
        };
        assert!(!phone.is_code_conflict());
        assert_eq!(phone.to_string(), "conflict: phone '9999966666' already exists");
    }

    #[test]
    fn unique_violation_recovers_column_from_constraint_name() {
        let err = DomainError::unique_violation(Some("agents"), "agents_code_key", "dup");
        assert!(err.is_code_conflict());

        let err = DomainError::unique_violation(Some("goods"), "goods_gst_no_key", "dup");
        assert!(matches!(&err, DomainError::Conflict { field, .. } if field == "gst_no"));
        assert!(!err.is_code_conflict());

        // 缺少表名时仅去掉后缀
        let err = DomainError::unique_violation(None, "code_key", "dup");
        assert!(err.is_code_conflict());

        let err = DomainError::unique_violation(Some("agents"), "custom_unique", "dup");
        assert!(matches!(&err, DomainError::Conflict { field, .. } if field == "custom_unique"));
    }

    #[test]
    fn uuid_error_maps_to_parse() {
        let err: DomainError = uuid::Uuid::parse_str("nope").unwrap_err().into();
        assert!(matches!(err, DomainError::Parse { .. }));
    }
}
