//! 编码分配器
//!
//! 为新记录分配 `前缀 + 序号` 形式的人类可读编码：
//! 1. 从记录来源读取该前缀当前最大编码（按数值比较）；
//! 2. 以其序号作为下限推进该前缀的计数器；
//! 3. 用计数器返回的序号组成编码。
//!
//! 计数器只增不减，并发分配得到的序号互不相同，删除记录后编码也不会复用。
//! 存储层若仍报告 `code` 唯一冲突（例如有绕过计数器的写入），
//! `allocate_with_retry` 会重新分配并重试写入。
//!
use crate::error::{DomainError, DomainResult};
use crate::persist::{CodeSource, SequenceStore};
use crate::value_object::{Code, Prefix};
use std::future::Future;
use std::sync::Arc;

/// 默认最多尝试次数
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct CodeAllocator {
    sequences: Arc<dyn SequenceStore>,
    max_attempts: usize,
}

impl CodeAllocator {
    pub fn new(sequences: Arc<dyn SequenceStore>) -> Self {
        Self {
            sequences,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// 设置冲突重试的最多尝试次数（至少 1 次）
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// 分配下一个编码
    ///
    /// 记录来源中的最大编码无法解析时直接返回 `CodeParse`，不回退为 1。
    pub async fn allocate<S>(&self, prefix: &Prefix, source: &S) -> DomainResult<Code>
    where
        S: CodeSource + ?Sized,
    {
        let highest = source.highest_code(prefix).await.inspect_err(|err| {
            if let DomainError::CodeParse { code, reason, .. } = err {
                tracing::error!(%prefix, %code, %reason, "stored code is not parseable");
            }
        })?;

        let floor = highest.as_ref().map(Code::number).unwrap_or(0);
        let next = self.sequences.advance(prefix, floor).await?;
        let code = Code::new(prefix.clone(), next)?;

        tracing::debug!(%prefix, %code, floor, "code allocated");
        Ok(code)
    }

    /// 分配编码并执行写入；写入报告 `code` 冲突时重新分配
    ///
    /// 其它字段的冲突不重试，直接返回给调用方。
    pub async fn allocate_with_retry<S, F, Fut, T>(
        &self,
        prefix: &Prefix,
        source: &S,
        mut write: F,
    ) -> DomainResult<T>
    where
        S: CodeSource + ?Sized,
        F: FnMut(Code) -> Fut,
        Fut: Future<Output = DomainResult<T>>,
    {
        let mut attempt = 1;
        loop {
            let code = self.allocate(prefix, source).await?;
            match write(code.clone()).await {
                Ok(out) => return Ok(out),
                Err(err) if err.is_code_conflict() && attempt < self.max_attempts => {
                    tracing::warn!(%prefix, %code, attempt, "code conflict on write, retrying");
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_code_conflict() {
                        tracing::warn!(%prefix, %code, attempt, "code conflict persisted, giving up");
                    }
                    return Err(err);
                }
            }
        }
    }
}
