use crate::datatypes::{
    StreamingDescriptor, TextureFormat, FIELD_COMPLETE_IMAGE_SIZE, FIELD_HEIGHT, FIELD_IMAGE_DATA,
    FIELD_MIP_COUNT, FIELD_NAME, FIELD_PLATFORM_BLOB, FIELD_STREAM_OFFSET, FIELD_STREAM_PATH,
    FIELD_STREAM_SIZE, FIELD_TEXTURE_FORMAT, FIELD_WIDTH,
};
use crate::fieldtree::{require_bytes, require_i64, FieldTree};
use crate::utils::TextureError;

/// 一次操作中从字段树读出的贴图相关字段
///
/// 每次操作按需构造，生命周期不超过该次操作；修改通过
/// `ReplacementCommitter` 写回字段树，而不是写回本结构。
#[derive(Debug, Clone)]
pub struct TextureInfo {
    /// 显示名称
    pub name: String,
    /// 贴图格式
    pub format: TextureFormat,
    /// 宽度（像素）
    pub width: u32,
    /// 高度（像素）
    pub height: u32,
    /// mip 层级数（字段存在时）
    pub mip_count: Option<i64>,
    /// 流式数据描述符
    pub stream_data: StreamingDescriptor,
    /// 平台参数块（字段存在且非空时）
    pub platform_blob: Option<Vec<u8>>,
    /// 内联像素字节（流式存储时为空）
    pub image_data: Vec<u8>,
}

impl TextureInfo {
    /// 从字段树读取贴图字段
    ///
    /// 前提：树由 `FieldTreeProvider::base_field` 材料化，
    /// `image data` 已是平坦字节数组。
    pub fn from_tree(tree: &dyn FieldTree) -> Result<Self, TextureError> {
        let format_value = require_i64(tree, FIELD_TEXTURE_FORMAT)?;
        let format = TextureFormat::from_i64(format_value)
            .ok_or(TextureError::UnknownFormat(format_value))?;

        let stream_data = StreamingDescriptor {
            offset: tree.get_i64(FIELD_STREAM_OFFSET).unwrap_or(0) as u64,
            size: tree.get_i64(FIELD_STREAM_SIZE).unwrap_or(0) as u64,
            path: tree.get_string(FIELD_STREAM_PATH).unwrap_or_default(),
        };

        let platform_blob = tree
            .get_bytes(FIELD_PLATFORM_BLOB)
            .filter(|blob| !blob.is_empty());

        Ok(TextureInfo {
            name: tree.get_string(FIELD_NAME).unwrap_or_default(),
            format,
            width: require_i64(tree, FIELD_WIDTH)? as u32,
            height: require_i64(tree, FIELD_HEIGHT)? as u32,
            mip_count: tree.get_i64(FIELD_MIP_COUNT),
            stream_data,
            platform_blob,
            image_data: require_bytes(tree, FIELD_IMAGE_DATA)?,
        })
    }

    /// 0x0 贴图（动态字体图集等占位贴图的已知模式）
    pub fn is_zero_area(&self) -> bool {
        self.width == 0 && self.height == 0
    }
}

/// 把重新编码后的标量字段写回字段树
///
/// 描述符复位与字节数组写入由提交器负责，这里只处理
/// 格式/尺寸/总大小三组标量。
pub fn write_scalars(
    tree: &mut dyn FieldTree,
    format: TextureFormat,
    width: u32,
    height: u32,
    total_size: usize,
) {
    tree.set_i64(FIELD_TEXTURE_FORMAT, format as i32 as i64);
    tree.set_i64(FIELD_COMPLETE_IMAGE_SIZE, total_size as i64);
    tree.set_i64(FIELD_WIDTH, width as i64);
    tree.set_i64(FIELD_HEIGHT, height as i64);
}
