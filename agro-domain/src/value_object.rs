//! 值对象（Value Object）
//!
//! 无标识、以值相等为准的对象，用于封装不可变的概念性值与校验逻辑：
//! 编码前缀（`Prefix`）、人类可读编码（`Code`）与审计信息（`Audit`）。
//!
use crate::error::{DomainError, DomainResult};
use crate::record::OwnerId;
use agro_macros::value_object;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 值对象抽象
pub trait ValueObject {
    /// 业务校验失败时的错误类型
    type Error;

    /// 创建值对象时进行验证
    fn validate(&self) -> Result<(), Self::Error>;
}

/// 编码数字部分的最小宽度，不足时左侧补零；超过后按实际位数增长
pub const CODE_MIN_WIDTH: usize = 3;

/// 前缀最大长度
pub const PREFIX_MAX_LEN: usize = 8;

/// 编码前缀，每种记录类型一个（例如 `AGNT`）
///
/// 由 1 到 8 个 ASCII 大写字母组成。
///
/// # 示例
///
/// ```
/// use agro_domain::value_object::Prefix;
///
/// let p = Prefix::new("AGNT").unwrap();
/// assert_eq!(p.as_str(), "AGNT");
/// assert!(Prefix::new("agnt").is_err());
/// assert!(Prefix::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Prefix(String);

impl Prefix {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let prefix = Self(value.into());
        prefix.validate()?;
        Ok(prefix)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Prefix {
    type Error = DomainError;

    fn validate(&self) -> Result<(), Self::Error> {
        let ok = !self.0.is_empty()
            && self.0.len() <= PREFIX_MAX_LEN
            && self.0.chars().all(|c| c.is_ascii_uppercase());
        if ok {
            Ok(())
        } else {
            Err(DomainError::InvalidValue {
                reason: format!(
                    "prefix '{}' must be 1 to {PREFIX_MAX_LEN} ASCII upper-case letters",
                    self.0
                ),
            })
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Prefix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Prefix::new(raw).map_err(serde::de::Error::custom)
    }
}

/// 人类可读的记录编码：前缀 + 至少三位补零的序号（`AGNT004`、`AGNT1000`）
///
/// 序号从 1 开始。排序按 (前缀, 数值) 进行，而不是按字符串，
/// 因此 `AGNT999 < AGNT1000`。
///
/// # 示例
///
/// ```
/// use agro_domain::value_object::{Code, Prefix};
///
/// let prefix = Prefix::new("AGNT").unwrap();
/// let code = Code::new(prefix.clone(), 4).unwrap();
/// assert_eq!(code.to_string(), "AGNT004");
///
/// let wide = Code::new(prefix.clone(), 1000).unwrap();
/// assert_eq!(wide.to_string(), "AGNT1000");
/// assert!(code < wide);
///
/// let parsed = Code::parse(&prefix, "AGNT017").unwrap();
/// assert_eq!(parsed.number(), 17);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code {
    prefix: Prefix,
    number: u64,
}

impl Code {
    pub fn new(prefix: Prefix, number: u64) -> DomainResult<Self> {
        if number == 0 {
            return Err(DomainError::InvalidValue {
                reason: format!("sequence number for prefix {prefix} must start at 1"),
            });
        }
        Ok(Self { prefix, number })
    }

    /// 按给定前缀解析已存储的编码
    ///
    /// 去掉前缀后必须是一个或多个 ASCII 数字；`+7`、`-1`、空后缀等一律视为 `CodeParse`。
    pub fn parse(prefix: &Prefix, raw: &str) -> DomainResult<Self> {
        let parse_error = |reason: &str| DomainError::CodeParse {
            prefix: prefix.to_string(),
            code: raw.to_string(),
            reason: reason.to_string(),
        };

        let suffix = raw
            .strip_prefix(prefix.as_str())
            .ok_or_else(|| parse_error("code does not start with the prefix"))?;

        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(parse_error("suffix is not a base-10 number"));
        }

        let number: u64 = suffix
            .parse()
            .map_err(|e: std::num::ParseIntError| parse_error(&e.to_string()))?;
        if number == 0 {
            return Err(parse_error("suffix must be at least 1"));
        }

        Ok(Self {
            prefix: prefix.clone(),
            number,
        })
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    pub fn number(&self) -> u64 {
        self.number
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:0width$}",
            self.prefix,
            self.number,
            width = CODE_MIN_WIDTH
        )
    }
}

impl FromStr for Code {
    type Err = DomainError;

    /// 不带预期前缀的解析：前缀取开头连续的大写字母
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s
            .find(|c: char| !c.is_ascii_uppercase())
            .unwrap_or(s.len());
        let prefix = Prefix::new(&s[..split]).map_err(|e| DomainError::CodeParse {
            prefix: s[..split].to_string(),
            code: s.to_string(),
            reason: e.to_string(),
        })?;
        Code::parse(&prefix, s)
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 审计信息：创建/更新的主体与时间
#[value_object]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub created_by: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<OwnerId>,
    pub updated_at: DateTime<Utc>,
}

impl Audit {
    /// 新建记录时的审计信息
    pub fn created(actor: &OwnerId) -> Self {
        let now = Utc::now();
        Self {
            created_by: actor.clone(),
            created_at: now,
            updated_by: None,
            updated_at: now,
        }
    }

    /// 记录被修改
    pub fn touch(&mut self, actor: &OwnerId) {
        self.updated_by = Some(actor.clone());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix(p: &str) -> Prefix {
        Prefix::new(p).unwrap()
    }

    #[test]
    fn test_prefix_validation() {
        assert!(Prefix::new("FAR").is_ok());
        assert!(Prefix::new("MCH").is_ok());
        assert!(Prefix::new("").is_err());
        assert!(Prefix::new("AG1").is_err());
        assert!(Prefix::new("TOOLONGPX").is_err());
    }

    #[test]
    fn test_code_padding_and_growth() {
        assert_eq!(Code::new(prefix("P"), 1).unwrap().to_string(), "P001");
        assert_eq!(Code::new(prefix("P"), 42).unwrap().to_string(), "P042");
        assert_eq!(Code::new(prefix("P"), 999).unwrap().to_string(), "P999");
        assert_eq!(Code::new(prefix("P"), 1000).unwrap().to_string(), "P1000");
        assert_eq!(Code::new(prefix("P"), 123456).unwrap().to_string(), "P123456");
    }

    #[test]
    fn test_code_zero_is_rejected() {
        let err = Code::new(prefix("P"), 0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { .. }));
    }

    #[test]
    fn test_code_parse_rejects_malformed_suffix() {
        let p = prefix("AGNT");
        for raw in ["AGNT", "AGNT+7", "AGNT-1", "AGNT 7", "AGNTx01", "BUYR001", "AGNT000"] {
            let err = Code::parse(&p, raw).unwrap_err();
            assert!(
                matches!(err, DomainError::CodeParse { .. }),
                "{raw} should be a parse error, got {err:?}"
            );
        }
    }

    #[test]
    fn test_code_parse_accepts_unpadded_and_wide() {
        let p = prefix("AGNT");
        assert_eq!(Code::parse(&p, "AGNT7").unwrap().number(), 7);
        assert_eq!(Code::parse(&p, "AGNT0007").unwrap().number(), 7);
        assert_eq!(Code::parse(&p, "AGNT1000").unwrap().number(), 1000);
    }

    #[test]
    fn test_code_orders_numerically() {
        let p = prefix("AGNT");
        let small = Code::parse(&p, "AGNT999").unwrap();
        let big = Code::parse(&p, "AGNT1000").unwrap();
        assert!(big > small);
        // 字符串比较会得出相反的结论
        assert!(small.to_string() > big.to_string());
    }

    #[test]
    fn test_code_from_str_and_serde() {
        let code: Code = "SELL012".parse().unwrap();
        assert_eq!(code.prefix().as_str(), "SELL");
        assert_eq!(code.number(), 12);

        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"SELL012\"");
        let back: Code = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);

        assert!(serde_json::from_str::<Code>("\"012\"").is_err());
    }

    #[test]
    fn test_audit_touch() {
        let alice = OwnerId::new("alice".into());
        let bob = OwnerId::new("bob".into());
        let mut audit = Audit::created(&alice);
        assert_eq!(audit.created_by, alice);
        assert!(audit.updated_by.is_none());

        audit.touch(&bob);
        assert_eq!(audit.updated_by, Some(bob));
        assert!(audit.updated_at >= audit.created_at);

        let json = serde_json::to_value(&audit).unwrap();
        assert_eq!(json["createdBy"], "alice");
        assert_eq!(json["updatedBy"], "bob");
    }
}
