use crate::datatypes::TextureFormat;
use thiserror::Error;
use std::path::Path;

/// 自定义错误类型
///
/// 所有错误都是"单资产级"的：批量流水线在捕获后转换为报告行并继续，
/// 不会因为单个资产失败而中止整个批次。
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("resS was detected but {0} was not found on disk")]
    StreamFileNotFound(String),

    #[error("resS was detected but {0} was not found in bundle")]
    StreamEntryNotFoundInArchive(String),

    #[error("Failed to decode texture format {0}")]
    DecodeFailure(TextureFormat),

    #[error("Failed to encode texture format {0}")]
    EncodeFailure(TextureFormat),

    #[error("Texture size is 0x0. Texture cannot be exported.")]
    ZeroAreaTexture,

    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Unknown texture format value: {0}")]
    UnknownFormat(i64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}

/// 生成错误报告中的资产标签：`文件名/PathID`
pub fn error_asset_name(owning_file: &Path, path_id: i64) -> String {
    let file_name = owning_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{}/{}", file_name, path_id)
}

/// 替换资产名称中的非法路径字符
///
/// 贴图名称来自字段树，可能包含 `/`、`:` 等不能出现在文件名中的字符。
pub fn replace_invalid_path_chars(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if (c as u32) < 0x20 => '_',
            c => c,
        })
        .collect()
}

/// 去除文件名的扩展名（保留路径其余部分）
pub fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => &file_name[..pos],
        _ => file_name,
    }
}
