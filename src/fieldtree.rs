/// 字段树抽象层
///
/// 该模块定义访问外部"结构化字段树"协作者的抽象接口，遵循依赖倒置原则。
/// 通用的字段树解码/编码器不属于本 crate；这里只暴露按字段路径读写
/// 标量/字节数组以及重新序列化的最小契约，支持依赖注入和测试 mock。
///
/// # 架构设计
///
/// - **FieldTree**: 单棵字段树的读写/序列化接口（字段路径用 `.` 分隔，
///   数组子字段写作 `m_PlatformBlob.Array`）
/// - **FieldTreeProvider**: 从资产记录材料化字段树的接口
/// - **MemoryFieldTree**: 内存实现（默认实现，亦用于测试）
///
/// # 使用示例
///
/// ```rust,ignore
/// use texture_extractor::fieldtree::{FieldTree, MemoryFieldTree};
///
/// let mut tree = MemoryFieldTree::new();
/// tree.set_i64("m_Width", 256);
/// assert_eq!(tree.get_i64("m_Width"), Some(256));
/// ```
use crate::utils::TextureError;
use byteorder::{LittleEndian, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

/// 资产记录标识
///
/// 标识所属文件中的一个序列化对象。本 crate 不拥有记录本身，
/// 每次操作按需从 `FieldTreeProvider` 重新材料化它的字段树。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    /// 所属序列化文件路径
    pub file_path: PathBuf,
    /// 64 位路径标识（PathID）
    pub path_id: i64,
    /// 类标识（Texture2D 为 28，但由调用方裁决）
    pub class_id: i32,
    /// 脚本类型标识（MonoBehaviour 专用，贴图通常为 None）
    pub mono_id: Option<u16>,
    /// 目标平台（透传给编解码器）
    pub target_platform: u32,
}

impl AssetRecord {
    /// 所属文件的文件名部分
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// 字段树读写契约
///
/// # 职责
/// - 按字段路径读写标量与字节数组
/// - 将整棵树重新序列化为字节
/// - 不暴露内部类型系统（那属于被排除的协作者）
pub trait FieldTree {
    /// 读取整数字段
    fn get_i64(&self, path: &str) -> Option<i64>;

    /// 写入整数字段
    fn set_i64(&mut self, path: &str, value: i64);

    /// 读取字符串字段
    fn get_string(&self, path: &str) -> Option<String>;

    /// 写入字符串字段
    fn set_string(&mut self, path: &str, value: &str);

    /// 读取字节数组字段
    fn get_bytes(&self, path: &str) -> Option<Vec<u8>>;

    /// 写入字节数组字段
    fn set_bytes(&mut self, path: &str, value: Vec<u8>);

    /// 字段是否存在
    fn has_field(&self, path: &str) -> bool;

    /// 重新序列化整棵树
    fn serialize(&self) -> Result<Vec<u8>, TextureError>;
}

/// 必填整数字段读取，缺失时报 `MissingField`
pub fn require_i64(tree: &dyn FieldTree, path: &str) -> Result<i64, TextureError> {
    tree.get_i64(path)
        .ok_or_else(|| TextureError::MissingField(path.to_string()))
}

/// 必填字节数组字段读取，缺失时报 `MissingField`
pub fn require_bytes(tree: &dyn FieldTree, path: &str) -> Result<Vec<u8>, TextureError> {
    tree.get_bytes(path)
        .ok_or_else(|| TextureError::MissingField(path.to_string()))
}

/// 字段树材料化契约
///
/// # 职责
/// - 对一个资产记录，基于模板和字节游标材料化其字段树
/// - **契约**：返回的树中 `image data` 与 `m_PlatformBlob.Array` 必须
///   已强制为字节数组解释——某些格式/版本组合会把像素字段声明为
///   结构化元素数组，统一为平坦缓冲后下游不再区分
pub trait FieldTreeProvider {
    /// 材料化一个贴图记录的字段树
    fn base_field(&self, record: &AssetRecord) -> Result<Box<dyn FieldTree>, TextureError>;
}

/// 字段值（内存实现用）
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Str(String),
    Bytes(Vec<u8>),
}

/// 内存字段树
///
/// 保持插入顺序的平坦键值树。序列化为小端字节流（整数 8 字节，
/// 字符串/字节数组带 u32 长度前缀），顺序即插入顺序，结果确定。
#[derive(Debug, Clone, Default)]
pub struct MemoryFieldTree {
    fields: Vec<(String, FieldValue)>,
}

impl MemoryFieldTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, path: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == path)
            .map(|(_, v)| v)
    }

    fn upsert(&mut self, path: &str, value: FieldValue) {
        match self.fields.iter_mut().find(|(name, _)| name == path) {
            Some((_, v)) => *v = value,
            None => self.fields.push((path.to_string(), value)),
        }
    }

    /// 按插入顺序遍历字段（调试/测试用）
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }
}

impl FieldTree for MemoryFieldTree {
    fn get_i64(&self, path: &str) -> Option<i64> {
        match self.find(path)? {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn set_i64(&mut self, path: &str, value: i64) {
        self.upsert(path, FieldValue::Int(value));
    }

    fn get_string(&self, path: &str) -> Option<String> {
        match self.find(path)? {
            FieldValue::Str(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn set_string(&mut self, path: &str, value: &str) {
        self.upsert(path, FieldValue::Str(value.to_string()));
    }

    fn get_bytes(&self, path: &str) -> Option<Vec<u8>> {
        match self.find(path)? {
            FieldValue::Bytes(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn set_bytes(&mut self, path: &str, value: Vec<u8>) {
        self.upsert(path, FieldValue::Bytes(value));
    }

    fn has_field(&self, path: &str) -> bool {
        self.find(path).is_some()
    }

    fn serialize(&self) -> Result<Vec<u8>, TextureError> {
        let mut out = Vec::new();
        for (_, value) in &self.fields {
            match value {
                FieldValue::Int(v) => out.write_i64::<LittleEndian>(*v)?,
                FieldValue::Str(v) => {
                    out.write_u32::<LittleEndian>(v.len() as u32)?;
                    out.write_all(v.as_bytes())?;
                }
                FieldValue::Bytes(v) => {
                    out.write_u32::<LittleEndian>(v.len() as u32)?;
                    out.write_all(v)?;
                }
            }
        }
        Ok(out)
    }
}
