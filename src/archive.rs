/// 容器归档抽象层
///
/// 归档（bundle）本体属于外部协作者，本 crate 只消费它的两个能力：
/// 列出带字节偏移的命名条目，以及共享字节读取器。读取器被视为单个
/// 可移动的读游标——每次读取前必须立即设置位置，不假设任何锁。
///
/// # 架构设计
///
/// - **ArchiveSource**: 条目表 + 共享读取器的 trait 接口
/// - **ArchiveProvider**: 按资产记录查找其所属归档（依赖注入点）
/// - **FileArchive**: 内存映射文件实现（零拷贝，默认实现）
/// - **MemoryArchive**: 内存实现（用于测试）
use crate::fieldtree::AssetRecord;
use crate::utils::TextureError;
use memmap2::Mmap;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 归档目录条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// 条目名（不含目录部分）
    pub name: String,
    /// 条目数据在共享字节源中的起始偏移
    pub offset: u64,
}

/// Read + Seek 组合约束（trait 对象用）
pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// 归档字节源契约
pub trait ArchiveSource {
    /// 列出命名条目及其偏移
    fn entries(&self) -> &[ArchiveEntry];

    /// 共享读取器（单游标，读取前必须先定位）
    fn shared_reader(&mut self) -> &mut dyn ReadSeek;
}

/// 归档查找契约
///
/// 流水线逐资产处理时据此判断记录是否位于容器归档内。
pub trait ArchiveProvider {
    /// 返回记录所属的归档（不在归档内时返回 None）
    fn archive_for(&mut self, record: &AssetRecord) -> Option<&mut dyn ArchiveSource>;
}

/// 空实现：所有记录都不在归档内
#[derive(Debug, Default)]
pub struct NoArchives;

impl ArchiveProvider for NoArchives {
    fn archive_for(&mut self, _record: &AssetRecord) -> Option<&mut dyn ArchiveSource> {
        None
    }
}

/// 按所属文件路径索引的归档集合
#[derive(Default)]
pub struct ArchiveMap {
    archives: HashMap<PathBuf, Box<dyn ArchiveSource>>,
}

impl ArchiveMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个归档：`file_path` 内的记录都属于它
    pub fn insert(&mut self, file_path: PathBuf, archive: Box<dyn ArchiveSource>) {
        self.archives.insert(file_path, archive);
    }
}

impl ArchiveProvider for ArchiveMap {
    fn archive_for(&mut self, record: &AssetRecord) -> Option<&mut dyn ArchiveSource> {
        self.archives
            .get_mut(&record.file_path)
            .map(|a| a.as_mut() as &mut dyn ArchiveSource)
    }
}

/// 内存映射读取器
///
/// `Cursor` 不能直接包裹 `Arc<Mmap>`，这里手写 Read/Seek。
struct MmapReader {
    mmap: Arc<Mmap>,
    pos: u64,
}

impl Read for MmapReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let data: &[u8] = &self.mmap;
        let start = (self.pos as usize).min(data.len());
        let n = (data.len() - start).min(buf.len());
        buf[..n].copy_from_slice(&data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for MmapReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.mmap.len() as i64;
        let new = match pos {
            SeekFrom::Start(p) => p as i64,
            SeekFrom::End(d) => len + d,
            SeekFrom::Current(d) => self.pos as i64 + d,
        };
        if new < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start",
            ));
        }
        self.pos = new as u64;
        Ok(self.pos)
    }
}

/// 文件归档
///
/// 使用内存映射访问归档数据块（零拷贝），条目表由外部的归档解析器
/// 提供——本 crate 不解析归档头。
pub struct FileArchive {
    entries: Vec<ArchiveEntry>,
    reader: MmapReader,
}

impl FileArchive {
    /// 打开归档数据文件并附上条目表
    pub fn open(path: &Path, entries: Vec<ArchiveEntry>) -> Result<Self, TextureError> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            entries,
            reader: MmapReader {
                mmap: Arc::new(mmap),
                pos: 0,
            },
        })
    }
}

impl ArchiveSource for FileArchive {
    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn shared_reader(&mut self) -> &mut dyn ReadSeek {
        &mut self.reader
    }
}

/// 内存归档（测试用）
pub struct MemoryArchive {
    entries: Vec<ArchiveEntry>,
    reader: io::Cursor<Vec<u8>>,
}

impl MemoryArchive {
    pub fn new(data: Vec<u8>, entries: Vec<ArchiveEntry>) -> Self {
        Self {
            entries,
            reader: io::Cursor::new(data),
        }
    }
}

impl ArchiveSource for MemoryArchive {
    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn shared_reader(&mut self) -> &mut dyn ReadSeek {
        &mut self.reader
    }
}
