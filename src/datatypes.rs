use serde::{Deserialize, Serialize};
use std::fmt;

/// 流式数据描述符的归档路径前缀
///
/// 部分版本的生产方不写这个前缀，解析时按"存在则剥离"处理。
pub const ARCHIVE_SCHEME_PREFIX: &str = "archive:/";

// Texture2D 字段树中的字段路径
pub const FIELD_NAME: &str = "m_Name";
pub const FIELD_TEXTURE_FORMAT: &str = "m_TextureFormat";
pub const FIELD_WIDTH: &str = "m_Width";
pub const FIELD_HEIGHT: &str = "m_Height";
pub const FIELD_MIP_COUNT: &str = "m_MipCount";
pub const FIELD_COMPLETE_IMAGE_SIZE: &str = "m_CompleteImageSize";
pub const FIELD_IMAGE_DATA: &str = "image data";
pub const FIELD_PLATFORM_BLOB: &str = "m_PlatformBlob.Array";
pub const FIELD_STREAM_OFFSET: &str = "m_StreamData.offset";
pub const FIELD_STREAM_SIZE: &str = "m_StreamData.size";
pub const FIELD_STREAM_PATH: &str = "m_StreamData.path";

/// 流式数据描述符
///
/// 描述贴图编码字节的物理存放位置，是 `m_StreamData` 子树的展平形式。
///
/// # 不变量
/// `size == 0 && path == ""` 当且仅当像素字节内联在字段树的
/// `image data` 字段中；任何其他组合都表示字节需要外部解析后才可用。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreamingDescriptor {
    /// 在外部数据源中的字节偏移
    pub offset: u64,
    /// 编码字节数
    pub size: u64,
    /// 外部数据源路径（空字符串 = 内联）
    pub path: String,
}

impl StreamingDescriptor {
    /// 像素字节是否已内联
    pub fn is_inline(&self) -> bool {
        self.size == 0 && self.path.is_empty()
    }
}

/// Unity 贴图格式
///
/// 序列化值与引擎的 TextureFormat 枚举一致，只列出插件会遇到的格式；
/// 未知值在读取时报 `UnknownFormat` 而不是静默跳过。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
#[repr(i32)]
pub enum TextureFormat {
    Alpha8 = 1,
    ARGB4444 = 2,
    RGB24 = 3,
    RGBA32 = 4,
    ARGB32 = 5,
    RGB565 = 7,
    R16 = 9,
    DXT1 = 10,
    DXT5 = 12,
    RGBA4444 = 13,
    BGRA32 = 14,
    RHalf = 15,
    RGHalf = 16,
    RGBAHalf = 17,
    RFloat = 18,
    RGFloat = 19,
    RGBAFloat = 20,
    BC6H = 24,
    BC7 = 25,
    BC4 = 26,
    BC5 = 27,
    DXT1Crunched = 28,
    DXT5Crunched = 29,
    ETC_RGB4 = 34,
    ETC2_RGB = 45,
    ETC2_RGBA8 = 47,
    ASTC_RGB_4x4 = 48,
    ASTC_RGB_6x6 = 50,
    ASTC_RGBA_4x4 = 54,
    ASTC_RGBA_6x6 = 56,
    ETC_RGB4Crunched = 64,
    ETC2_RGBA8Crunched = 65,
}

impl TextureFormat {
    /// 从序列化的整数值还原格式
    pub fn from_i64(value: i64) -> Option<Self> {
        use TextureFormat::*;
        Some(match value {
            1 => Alpha8,
            2 => ARGB4444,
            3 => RGB24,
            4 => RGBA32,
            5 => ARGB32,
            7 => RGB565,
            9 => R16,
            10 => DXT1,
            12 => DXT5,
            13 => RGBA4444,
            14 => BGRA32,
            15 => RHalf,
            16 => RGHalf,
            17 => RGBAHalf,
            18 => RFloat,
            19 => RGFloat,
            20 => RGBAFloat,
            24 => BC6H,
            25 => BC7,
            26 => BC4,
            27 => BC5,
            28 => DXT1Crunched,
            29 => DXT5Crunched,
            34 => ETC_RGB4,
            45 => ETC2_RGB,
            47 => ETC2_RGBA8,
            48 => ASTC_RGB_4x4,
            50 => ASTC_RGB_6x6,
            54 => ASTC_RGBA_4x4,
            56 => ASTC_RGBA_6x6,
            64 => ETC_RGB4Crunched,
            65 => ETC2_RGBA8Crunched,
            _ => return None,
        })
    }

}

impl fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_inline_invariant() {
        assert!(StreamingDescriptor::default().is_inline());

        let streamed = StreamingDescriptor {
            offset: 0,
            size: 4096,
            path: "archive:/CAB-aa/CAB-aa.resS".to_string(),
        };
        assert!(!streamed.is_inline());

        // size 为 0 但 path 非空仍然视为外部存储
        let odd = StreamingDescriptor {
            offset: 0,
            size: 0,
            path: "level0.resS".to_string(),
        };
        assert!(!odd.is_inline());
    }

    #[test]
    fn test_format_round_trip() {
        assert_eq!(TextureFormat::from_i64(4), Some(TextureFormat::RGBA32));
        assert_eq!(TextureFormat::from_i64(25), Some(TextureFormat::BC7));
        assert_eq!(TextureFormat::from_i64(999), None);
        assert_eq!(TextureFormat::RGBA32 as i32, 4);
    }

    #[test]
    fn test_format_display() {
        assert_eq!(TextureFormat::DXT5.to_string(), "DXT5");
        assert_eq!(TextureFormat::ETC2_RGBA8Crunched.to_string(), "ETC2_RGBA8Crunched");
    }
}
