use crate::datatypes::{FIELD_IMAGE_DATA, FIELD_MIP_COUNT};
use crate::datatypes::TextureFormat;
use crate::fieldtree::{AssetRecord, FieldTree};
use crate::patch::ReplacementPatch;
use crate::streaming::reset_stream_data;
use crate::texture::write_scalars;
use crate::utils::TextureError;
use log::debug;

/// 一次成功编码的结果
#[derive(Debug, Clone)]
pub struct EncodedTexture {
    /// 编码后的像素字节
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// 替换提交器
///
/// 编码成功后把结果写回资产的字段树并生成替换补丁。
/// 只在内存中操作；补丁交给所属文件的外部补丁队列。
pub struct ReplacementCommitter;

impl ReplacementCommitter {
    /// 把编码结果应用到字段树，返回替换补丁
    ///
    /// # 步骤
    /// 1. 描述符复位为 `{0,0,""}`——新编码的数据总是内联写入
    /// 2. `m_MipCount` 存在时钳制为 1：重编码的单层图像没有预建
    ///    mip 链，残留的 mip 数会在下游读取时造成宽高不匹配
    /// 3. 写入格式、宽高、字节数组字段与总大小
    /// 4. 重新序列化字段树，构造 `ReplaceBytes` 补丁
    pub fn apply(
        record: &AssetRecord,
        tree: &mut dyn FieldTree,
        encoded: &EncodedTexture,
    ) -> Result<ReplacementPatch, TextureError> {
        reset_stream_data(tree);

        if tree.has_field(FIELD_MIP_COUNT) {
            tree.set_i64(FIELD_MIP_COUNT, 1);
        }

        write_scalars(
            tree,
            encoded.format,
            encoded.width,
            encoded.height,
            encoded.data.len(),
        );
        tree.set_bytes(FIELD_IMAGE_DATA, encoded.data.clone());

        let bytes = tree.serialize()?;
        debug!(
            "提交 {}/{}: {}x{} {}，序列化 {} 字节",
            record.file_name(),
            record.path_id,
            encoded.width,
            encoded.height,
            encoded.format,
            bytes.len()
        );

        Ok(ReplacementPatch::ReplaceBytes {
            path_id: record.path_id,
            class_id: record.class_id,
            mono_id: record.mono_id,
            bytes,
        })
    }
}
