use crate::codec::TextureCodec;
use crate::committer::{EncodedTexture, ReplacementCommitter};
use crate::datatypes::{TextureFormat, FIELD_PLATFORM_BLOB, FIELD_TEXTURE_FORMAT};
use crate::fieldtree::{require_i64, FieldTreeProvider};
use crate::matcher::ImportAsset;
use crate::patch::PatchQueue;
use crate::pipeline::report::ErrorReport;
use crate::utils::TextureError;
use log::warn;
use std::path::{Path, PathBuf};

/// 批量导入结果
#[derive(Debug, Default)]
pub struct ImportOutcome {
    /// 待交给外部工作区的补丁队列（按所属文件分片）
    pub queue: PatchQueue,
    /// 成功导入的资产数
    pub imported: usize,
    /// 聚合错误报告
    pub report: ErrorReport,
}

/// 导入流水线
///
/// 处理匹配器提交的 (资产, 文件) 对：读取当前格式与平台参数块，
/// 按原格式重新编码，提交替换并入队补丁。聚合-继续策略同导出。
pub struct ImportPipeline<'a> {
    provider: &'a dyn FieldTreeProvider,
    codec: &'a dyn TextureCodec,
}

impl<'a> ImportPipeline<'a> {
    pub fn new(provider: &'a dyn FieldTreeProvider, codec: &'a dyn TextureCodec) -> Self {
        Self { provider, codec }
    }

    /// 批量导入
    pub fn batch_import(&self, batch: &[(ImportAsset, PathBuf)]) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();

        for (asset, file) in batch {
            let record = &asset.record;
            match self.import_one(asset, file, &mut outcome.queue) {
                Ok(()) => outcome.imported += 1,
                Err(err) => {
                    warn!("{}/{}: {}", record.file_name(), record.path_id, err);
                    outcome
                        .report
                        .push(&record.file_path, record.path_id, &err.to_string());
                }
            }
        }

        outcome
    }

    fn import_one(
        &self,
        asset: &ImportAsset,
        file: &Path,
        queue: &mut PatchQueue,
    ) -> Result<(), TextureError> {
        let record = &asset.record;
        let mut tree = self.provider.base_field(record)?;

        let format_value = require_i64(tree.as_ref(), FIELD_TEXTURE_FORMAT)?;
        let format = TextureFormat::from_i64(format_value)
            .ok_or(TextureError::UnknownFormat(format_value))?;
        let platform_blob = tree
            .get_bytes(FIELD_PLATFORM_BLOB)
            .filter(|blob| !blob.is_empty());

        let (data, width, height) = self
            .codec
            .encode(
                file,
                format,
                record.target_platform,
                platform_blob.as_deref(),
            )
            .ok_or(TextureError::EncodeFailure(format))?;

        let encoded = EncodedTexture {
            data,
            width,
            height,
            format,
        };
        let patch = ReplacementCommitter::apply(record, tree.as_mut(), &encoded)?;
        queue.enqueue(&record.file_path, patch);
        Ok(())
    }
}
