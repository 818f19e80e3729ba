pub mod datatypes;
pub mod fieldtree;
pub mod archive;
pub mod texture;
pub mod streaming;
pub mod codec;
pub mod matcher;
pub mod patch;
pub mod committer;
pub mod pipeline;
pub mod utils;

// 重新导出主要结构
pub use datatypes::{StreamingDescriptor, TextureFormat, ARCHIVE_SCHEME_PREFIX};
pub use fieldtree::{AssetRecord, FieldTree, FieldTreeProvider, MemoryFieldTree};
pub use archive::{ArchiveEntry, ArchiveProvider, ArchiveSource, FileArchive, MemoryArchive, NoArchives};
pub use texture::TextureInfo;
pub use streaming::StreamingResolver;
pub use codec::{BasicCodec, TextureCodec};
pub use matcher::{BatchMatcher, ImportAsset, MatchCandidateSet};
pub use patch::{PatchQueue, ReplacementPatch};
pub use committer::{EncodedTexture, ReplacementCommitter};
pub use pipeline::{ErrorReport, ExportOptions, ExportPipeline, ImageFileType, ImportPipeline};
pub use utils::TextureError;

// 常量定义
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "tga"];
