use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 替换补丁
///
/// 对所属文件中单个记录的字节级替换指令。本 crate 只构造并排队，
/// 从不落盘——磁盘写入发生在外部工作区之后刷新文件时。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplacementPatch {
    /// 删除记录
    Remove { path_id: i64 },
    /// 用新的序列化字节整体替换记录
    ReplaceBytes {
        path_id: i64,
        class_id: i32,
        mono_id: Option<u16>,
        bytes: Vec<u8>,
    },
}

impl ReplacementPatch {
    /// 补丁作用的记录标识
    pub fn path_id(&self) -> i64 {
        match self {
            ReplacementPatch::Remove { path_id } => *path_id,
            ReplacementPatch::ReplaceBytes { path_id, .. } => *path_id,
        }
    }
}

/// 按所属文件分片的补丁队列
///
/// 每个文件一条队列，单写者访问（资产严格顺序处理，见并发模型）。
/// 同一记录的后一个补丁覆盖前一个。
#[derive(Debug, Default)]
pub struct PatchQueue {
    queues: HashMap<PathBuf, Vec<ReplacementPatch>>,
}

impl PatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 入队一个补丁
    pub fn enqueue(&mut self, owning_file: &Path, patch: ReplacementPatch) {
        let queue = self.queues.entry(owning_file.to_path_buf()).or_default();
        queue.retain(|existing| existing.path_id() != patch.path_id());
        queue.push(patch);
    }

    /// 某文件待应用的补丁
    pub fn patches_for(&self, owning_file: &Path) -> &[ReplacementPatch] {
        self.queues
            .get(owning_file)
            .map(|q| q.as_slice())
            .unwrap_or(&[])
    }

    /// 受影响的文件列表
    pub fn affected_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.queues.keys()
    }

    /// 补丁总数
    pub fn len(&self) -> usize {
        self.queues.values().map(|q| q.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 取出全部补丁，按文件分组（交给外部工作区）
    pub fn drain(&mut self) -> HashMap<PathBuf, Vec<ReplacementPatch>> {
        std::mem::take(&mut self.queues)
    }
}
