/// 编解码器网关
///
/// 逐格式的 GPU 贴图编解码属于外部协作者，本模块只定义契约边界：
/// 调用方提供编码字节/图像文件与格式、平台、平台参数块，失败返回
/// `None`——对批量流水线而言是可跳过的单资产错误，绝不致命。
///
/// `BasicCodec` 是内置实现，覆盖无压缩格式（RGBA32/ARGB32/BGRA32/
/// RGB24/Alpha8）；压缩与 crunched 格式交给外部编解码器。
use crate::datatypes::TextureFormat;
use image::RgbaImage;
use log::debug;
use std::path::Path;

/// 编解码契约
///
/// 贴图像素按引擎惯例自底向上存储，实现负责行翻转。
pub trait TextureCodec {
    /// 解码编码字节为图像，失败返回 None
    fn decode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        format: TextureFormat,
        platform: u32,
        platform_blob: Option<&[u8]>,
    ) -> Option<RgbaImage>;

    /// 把图像文件编码为贴图字节，返回 (字节, 宽, 高)，失败返回 None
    fn encode(
        &self,
        image_path: &Path,
        format: TextureFormat,
        platform: u32,
        platform_blob: Option<&[u8]>,
    ) -> Option<(Vec<u8>, u32, u32)>;
}

/// 无压缩格式的内置编解码器
#[derive(Debug, Default)]
pub struct BasicCodec;

/// 自底向上 <-> 自顶向下的行翻转
fn flip_rows(data: &[u8], width: u32, height: u32, bytes_per_pixel: usize) -> Vec<u8> {
    let stride = width as usize * bytes_per_pixel;
    let mut out = Vec::with_capacity(data.len());
    for row in (0..height as usize).rev() {
        out.extend_from_slice(&data[row * stride..(row + 1) * stride]);
    }
    out
}

fn bytes_per_pixel(format: TextureFormat) -> Option<usize> {
    match format {
        TextureFormat::RGBA32 | TextureFormat::ARGB32 | TextureFormat::BGRA32 => Some(4),
        TextureFormat::RGB24 => Some(3),
        TextureFormat::Alpha8 => Some(1),
        _ => None,
    }
}

impl TextureCodec for BasicCodec {
    fn decode(
        &self,
        data: &[u8],
        width: u32,
        height: u32,
        format: TextureFormat,
        _platform: u32,
        _platform_blob: Option<&[u8]>,
    ) -> Option<RgbaImage> {
        let bpp = bytes_per_pixel(format)?;
        let expected = width as usize * height as usize * bpp;
        if data.len() < expected {
            debug!(
                "解码 {} 失败：需要 {} 字节，实际 {}",
                format,
                expected,
                data.len()
            );
            return None;
        }

        let flipped = flip_rows(&data[..expected], width, height, bpp);
        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        match format {
            TextureFormat::RGBA32 => rgba.extend_from_slice(&flipped),
            TextureFormat::ARGB32 => {
                for px in flipped.chunks_exact(4) {
                    rgba.extend_from_slice(&[px[1], px[2], px[3], px[0]]);
                }
            }
            TextureFormat::BGRA32 => {
                for px in flipped.chunks_exact(4) {
                    rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
            }
            TextureFormat::RGB24 => {
                for px in flipped.chunks_exact(3) {
                    rgba.extend_from_slice(&[px[0], px[1], px[2], 0xFF]);
                }
            }
            TextureFormat::Alpha8 => {
                for &a in &flipped {
                    rgba.extend_from_slice(&[0xFF, 0xFF, 0xFF, a]);
                }
            }
            _ => return None,
        }

        RgbaImage::from_raw(width, height, rgba)
    }

    fn encode(
        &self,
        image_path: &Path,
        format: TextureFormat,
        _platform: u32,
        _platform_blob: Option<&[u8]>,
    ) -> Option<(Vec<u8>, u32, u32)> {
        let bpp = bytes_per_pixel(format)?;

        let image = match image::open(image_path) {
            Ok(image) => image.to_rgba8(),
            Err(err) => {
                debug!("读取图像 {:?} 失败: {}", image_path, err);
                return None;
            }
        };

        let (width, height) = image.dimensions();
        let rgba = image.into_raw();

        let mut data = Vec::with_capacity(rgba.len());
        match format {
            TextureFormat::RGBA32 => data.extend_from_slice(&rgba),
            TextureFormat::ARGB32 => {
                for px in rgba.chunks_exact(4) {
                    data.extend_from_slice(&[px[3], px[0], px[1], px[2]]);
                }
            }
            TextureFormat::BGRA32 => {
                for px in rgba.chunks_exact(4) {
                    data.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
            }
            TextureFormat::RGB24 => {
                for px in rgba.chunks_exact(4) {
                    data.extend_from_slice(&[px[0], px[1], px[2]]);
                }
            }
            TextureFormat::Alpha8 => {
                for px in rgba.chunks_exact(4) {
                    data.push(px[3]);
                }
            }
            _ => return None,
        }

        let flipped = flip_rows(&data, width, height, bpp);
        Some((flipped, width, height))
    }
}
