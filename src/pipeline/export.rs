use crate::archive::ArchiveProvider;
use crate::codec::TextureCodec;
use crate::fieldtree::{AssetRecord, FieldTreeProvider};
use crate::pipeline::report::ErrorReport;
use crate::streaming::StreamingResolver;
use crate::texture::TextureInfo;
use crate::utils::{replace_invalid_path_chars, TextureError};
use image::ImageFormat;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 支持的导出图像种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFileType {
    Png,
    Tga,
}

impl ImageFileType {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFileType::Png => "png",
            ImageFileType::Tga => "tga",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ImageFileType::Png => ImageFormat::Png,
            ImageFileType::Tga => ImageFormat::Tga,
        }
    }
}

/// 批量导出选项
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// 输出目录
    pub output_dir: PathBuf,
    /// 输出图像种类
    pub file_type: ImageFileType,
}

/// 批量导出结果
#[derive(Debug, Default)]
pub struct ExportOutcome {
    /// 成功写出的图像文件
    pub exported: Vec<PathBuf>,
    /// 聚合错误报告
    pub report: ErrorReport,
}

/// 导出流水线
///
/// 逐资产严格顺序处理：材料化字段树（字节数组解释已强制）、读取
/// 贴图字段、解析像素字节、解码、写出图像文件。单个资产的失败记入
/// 报告后继续处理下一个，绝不中止批次。
pub struct ExportPipeline<'a> {
    provider: &'a dyn FieldTreeProvider,
    codec: &'a dyn TextureCodec,
    archives: &'a mut dyn ArchiveProvider,
}

impl<'a> ExportPipeline<'a> {
    pub fn new(
        provider: &'a dyn FieldTreeProvider,
        codec: &'a dyn TextureCodec,
        archives: &'a mut dyn ArchiveProvider,
    ) -> Self {
        Self {
            provider,
            codec,
            archives,
        }
    }

    /// 导出资产生成的标准文件名：`{名称}-{所属文件名}-{PathID}.{扩展名}`
    pub fn export_file_name(info: &TextureInfo, record: &AssetRecord, ext: &str) -> String {
        format!(
            "{}-{}-{}.{}",
            replace_invalid_path_chars(&info.name),
            record.file_name(),
            record.path_id,
            ext
        )
    }

    /// 批量导出
    pub fn batch_export(
        &mut self,
        selection: &[AssetRecord],
        options: &ExportOptions,
    ) -> ExportOutcome {
        let mut outcome = ExportOutcome::default();

        for record in selection {
            match self.export_one(record, options) {
                Ok(Some(path)) => outcome.exported.push(path),
                // 0x0 占位贴图：跳过，不算错误
                Ok(None) => {}
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

    /// 单资产导出：直接写到给定路径，错误立即返回而不是累积
    pub fn single_export(
        &mut self,
        record: &AssetRecord,
        output_path: &Path,
    ) -> Result<(), TextureError> {
        let mut tree = self.provider.base_field(record)?;
        let mut info = TextureInfo::from_tree(tree.as_ref())?;

        if info.is_zero_area() {
            return Err(TextureError::ZeroAreaTexture);
        }

        let data = StreamingResolver::resolve_for_tree(
            tree.as_mut(),
            &mut info,
            &record.file_path,
            self.archives.archive_for(record),
        )?;

        let image = self
            .codec
            .decode(
                &data,
                info.width,
                info.height,
                info.format,
                record.target_platform,
                info.platform_blob.as_deref(),
            )
            .ok_or(TextureError::DecodeFailure(info.format))?;

        let format = output_path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| match e.to_ascii_lowercase().as_str() {
                "tga" => Some(ImageFormat::Tga),
                _ => None,
            })
            .unwrap_or(ImageFormat::Png);
        image.save_with_format(output_path, format)?;
        Ok(())
    }

    fn export_one(
        &mut self,
        record: &AssetRecord,
        options: &ExportOptions,
    ) -> Result<Option<PathBuf>, TextureError> {
        let mut tree = self.provider.base_field(record)?;
        let mut info = TextureInfo::from_tree(tree.as_ref())?;

        // 0x0 贴图，通常是动态字体图集之类的占位
        if info.is_zero_area() {
            debug!("{}/{}: 0x0 贴图，跳过", record.file_name(), record.path_id);
            return Ok(None);
        }

        let file_name = Self::export_file_name(&info, record, options.file_type.extension());
        let output_path = options.output_dir.join(file_name);

        let data = StreamingResolver::resolve_for_tree(
            tree.as_mut(),
            &mut info,
            &record.file_path,
            self.archives.archive_for(record),
        )?;

        let image = self
            .codec
            .decode(
                &data,
                info.width,
                info.height,
                info.format,
                record.target_platform,
                info.platform_blob.as_deref(),
            )
            .ok_or(TextureError::DecodeFailure(info.format))?;

        image.save_with_format(&output_path, options.file_type.image_format())?;
        Ok(Some(output_path))
    }
}
