/// 流式数据解析模块
///
/// 贴图的编码字节可能存放在三个层级：内联在字段树、所属文件旁的
/// 松散 .resS 文件、或容器归档内的条目。序列化层三种都合法；本模块
/// 按优先级解析成平坦缓冲，并在解析成功后立即把描述符归一化为
/// "内联"——同一次操作内的后续步骤不再区分存储层级。
use crate::datatypes::{StreamingDescriptor, ARCHIVE_SCHEME_PREFIX};
use crate::datatypes::{FIELD_STREAM_OFFSET, FIELD_STREAM_PATH, FIELD_STREAM_SIZE};
use crate::archive::ArchiveSource;
use crate::fieldtree::FieldTree;
use crate::texture::TextureInfo;
use crate::utils::TextureError;
use log::debug;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// 取路径的文件名部分（目录部分忽略——不同生产方会为同一条目
/// 写出不同的前缀/目录）
fn file_name_component(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// 三层存储解析器
pub struct StreamingResolver;

impl StreamingResolver {
    /// 解析描述符指向的编码字节
    ///
    /// # 优先级
    /// 1. 内联描述符：直接返回内联字节，零 I/O
    /// 2. 有归档上下文：剥离 `archive:/` 前缀（如存在），按文件名线性
    ///    扫描归档条目，从共享读取器的 `条目偏移 + 描述符偏移` 处
    ///    精确读取 `size` 字节
    /// 3. 松散文件：相对路径按所属文件所在目录解析，seek 到偏移后
    ///    精确读取 `size` 字节
    pub fn resolve(
        descriptor: &StreamingDescriptor,
        inline_data: &[u8],
        owning_file: &Path,
        archive: Option<&mut dyn ArchiveSource>,
    ) -> Result<Vec<u8>, TextureError> {
        if descriptor.is_inline() {
            return Ok(inline_data.to_vec());
        }

        if let Some(archive) = archive {
            return Self::resolve_from_archive(descriptor, archive);
        }

        Self::resolve_from_file(descriptor, owning_file)
    }

    fn resolve_from_archive(
        descriptor: &StreamingDescriptor,
        archive: &mut dyn ArchiveSource,
    ) -> Result<Vec<u8>, TextureError> {
        // 部分版本不写 archive:/ 前缀
        let search_path = descriptor
            .path
            .strip_prefix(ARCHIVE_SCHEME_PREFIX)
            .unwrap_or(&descriptor.path);
        let search_name = file_name_component(search_path);

        let entry_offset = archive
            .entries()
            .iter()
            .find(|entry| entry.name == search_name)
            .map(|entry| entry.offset);

        let Some(entry_offset) = entry_offset else {
            return Err(TextureError::StreamEntryNotFoundInArchive(
                search_name.to_string(),
            ));
        };

        debug!(
            "归档条目 {} 命中，偏移 0x{:X} + 0x{:X}",
            search_name, entry_offset, descriptor.offset
        );

        // 共享游标：读取前必须先定位
        let reader = archive.shared_reader();
        reader.seek(SeekFrom::Start(entry_offset + descriptor.offset))?;
        let mut data = vec![0u8; descriptor.size as usize];
        reader.read_exact(&mut data)?;
        Ok(data)
    }

    fn resolve_from_file(
        descriptor: &StreamingDescriptor,
        owning_file: &Path,
    ) -> Result<Vec<u8>, TextureError> {
        let mut stream_path = PathBuf::from(&descriptor.path);
        if stream_path.is_relative() {
            if let Some(root) = owning_file.parent() {
                stream_path = root.join(stream_path);
            }
        }

        if !stream_path.exists() {
            return Err(TextureError::StreamFileNotFound(
                file_name_component(&descriptor.path).to_string(),
            ));
        }

        let mut file = File::open(&stream_path)?;
        file.seek(SeekFrom::Start(descriptor.offset))?;
        let mut data = vec![0u8; descriptor.size as usize];
        file.read_exact(&mut data)?;
        Ok(data)
    }

    /// 解析并归一化
    ///
    /// 非内联解析成功后把树中的描述符复位为 `{0,0,""}`，同步更新
    /// `info`。后续逻辑（包括提交器）只见"内联"一种形态。
    pub fn resolve_for_tree(
        tree: &mut dyn FieldTree,
        info: &mut TextureInfo,
        owning_file: &Path,
        archive: Option<&mut dyn ArchiveSource>,
    ) -> Result<Vec<u8>, TextureError> {
        let was_inline = info.stream_data.is_inline();
        let data = Self::resolve(&info.stream_data, &info.image_data, owning_file, archive)?;

        if !was_inline {
            reset_stream_data(tree);
            info.stream_data = StreamingDescriptor::default();
        }
        Ok(data)
    }
}

/// 把字段树中的流式描述符复位为内联形态 `{0,0,""}`
pub fn reset_stream_data(tree: &mut dyn FieldTree) {
    tree.set_i64(FIELD_STREAM_OFFSET, 0);
    tree.set_i64(FIELD_STREAM_SIZE, 0);
    tree.set_string(FIELD_STREAM_PATH, "");
}
