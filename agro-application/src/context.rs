use agro_domain::persist::Scope;
use agro_domain::record::{OwnerId, Record};
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 执行者角色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl Role {
    /// 解析角色名；除 `superadmin` 外一律视为普通用户
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("superadmin") {
            Role::SuperAdmin
        } else {
            Role::User
        }
    }
}

/// 发起本次调用的主体（由上游认证网关给出）
#[derive(Debug, Clone, Default, PartialEq, Eq, Builder)]
pub struct Principal {
    pub user_id: OwnerId,
    #[builder(default)]
    pub role: Role,
}

impl Principal {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// 列表可见范围：超级管理员可见全部，其余仅可见自己的记录
    pub fn scope(&self) -> Scope {
        if self.is_super_admin() {
            Scope::All
        } else {
            Scope::Owner(self.user_id.clone())
        }
    }

    /// 是否可以读写该记录
    pub fn can_access<R: Record>(&self, record: &R) -> bool {
        self.is_super_admin() || record.owner() == &self.user_id
    }
}

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（命令/查询）所需的横切信息：
/// - 执行主体（`principal`）：用户标识与角色，决定记录归属与可见范围；
/// - 关联标识（`correlation_id`）：与 HTTP 请求标识一致，用于日志串联。
///
/// 典型用法：
/// ```rust
/// use agro_application::context::{AppContext, Principal, Role};
/// use agro_domain::record::OwnerId;
///
/// let ctx = AppContext::builder()
///     .principal(
///         Principal::builder()
///             .user_id(OwnerId::new("u-1".into()))
///             .role(Role::SuperAdmin)
///             .build(),
///     )
///     .correlation_id("req-123".to_string())
///     .build();
/// assert!(ctx.principal.is_super_admin());
/// assert_eq!(ctx.correlation_id.as_deref(), Some("req-123"));
/// ```
#[derive(Clone, Debug, Default, Builder)]
pub struct AppContext {
    /// 执行主体
    pub principal: Principal,
    /// 关联标识（可选）
    pub correlation_id: Option<String>,
}

impl AppContext {
    /// 以普通用户身份构造
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self::builder()
            .principal(Principal::builder().user_id(OwnerId::new(user_id.into())).build())
            .build()
    }

    /// 以超级管理员身份构造
    pub fn for_super_admin(user_id: impl Into<String>) -> Self {
        Self::builder()
            .principal(
                Principal::builder()
                    .user_id(OwnerId::new(user_id.into()))
                    .role(Role::SuperAdmin)
                    .build(),
            )
            .build()
    }

    pub fn actor(&self) -> &OwnerId {
        &self.principal.user_id
    }
}
