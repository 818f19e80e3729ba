use crate::utils::error_asset_name;
use std::path::Path;

/// 汇总报告最多展示的行数
pub const MAX_REPORT_LINES: usize = 20;

/// 批次级错误报告
///
/// 聚合-继续策略的载体：每个资产的失败转换为一行带
/// `[文件名/PathID]` 标签的文本，批次结束后一次性展示。
#[derive(Debug, Default)]
pub struct ErrorReport {
    lines: Vec<String>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条带资产标签的错误行
    pub fn push(&mut self, owning_file: &Path, path_id: i64, message: &str) {
        self.lines
            .push(format!("[{}]: {}", error_asset_name(owning_file, path_id), message));
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// 全部错误行
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 展示用摘要：前 20 行，换行连接
    pub fn summary(&self) -> String {
        self.lines
            .iter()
            .take(MAX_REPORT_LINES)
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }
}
