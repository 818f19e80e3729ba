//! 流式数据解析集成测试
//!
//! 覆盖三层存储解析的全部路径：
//! - 内联描述符：零 I/O 直接返回
//! - 松散 .resS 文件：相对所属文件目录解析 + 精确偏移读取
//! - 归档条目：前缀剥离、文件名匹配、共享游标定位
//! - 解析成功后的描述符归一化不变量

use std::fs;
use std::path::PathBuf;
use texture_extractor::datatypes::{
    FIELD_HEIGHT, FIELD_IMAGE_DATA, FIELD_STREAM_OFFSET, FIELD_STREAM_PATH, FIELD_STREAM_SIZE,
    FIELD_TEXTURE_FORMAT, FIELD_WIDTH,
};
use texture_extractor::{
    ArchiveEntry, FieldTree, MemoryArchive, MemoryFieldTree, StreamingDescriptor,
    StreamingResolver, TextureError, TextureFormat, TextureInfo,
};

/// 内联标识：描述符 {0,0,""} 时原样返回内联字节，不做任何 I/O
///
/// 所属文件路径指向不存在的目录，任何文件访问都会失败——
/// 解析成功本身就证明没有发生 I/O。
#[test]
fn test_inline_identity() {
    let descriptor = StreamingDescriptor::default();
    let inline = vec![0xDE, 0xAD, 0xBE, 0xEF];

    let data = StreamingResolver::resolve(
        &descriptor,
        &inline,
        &PathBuf::from("/definitely/not/a/real/dir/level0.assets"),
        None,
    )
    .expect("内联解析不应该失败");

    assert_eq!(data, inline);
}

/// 松散文件偏移正确性：200 字节文件中 {offset:100, size:50} 读出 [100,150)
#[test]
fn test_loose_file_offset() {
    let dir = tempfile::tempdir().unwrap();
    let bytes: Vec<u8> = (0..200).map(|i| (i % 251) as u8).collect();
    fs::write(dir.path().join("foo.bin"), &bytes).unwrap();

    let owning_file = dir.path().join("level0.assets");
    let descriptor = StreamingDescriptor {
        offset: 100,
        size: 50,
        path: "foo.bin".to_string(),
    };

    let data = StreamingResolver::resolve(&descriptor, &[], &owning_file, None)
        .expect("应该能读取松散文件");
    assert_eq!(data, &bytes[100..150]);
}

#[test]
fn test_loose_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let owning_file = dir.path().join("level0.assets");
    let descriptor = StreamingDescriptor {
        offset: 0,
        size: 10,
        path: "foo.bin".to_string(),
    };

    let err = StreamingResolver::resolve(&descriptor, &[], &owning_file, None).unwrap_err();
    assert!(matches!(err, TextureError::StreamFileNotFound(name) if name == "foo.bin"));
}

fn sample_archive() -> MemoryArchive {
    let data: Vec<u8> = (0..1100u32).map(|i| (i % 251) as u8).collect();
    MemoryArchive::new(
        data,
        vec![
            ArchiveEntry {
                name: "CAB-bb.resS".to_string(),
                offset: 0,
            },
            ArchiveEntry {
                name: "CAB-aa.resS".to_string(),
                offset: 1000,
            },
        ],
    )
}

/// 归档匹配：路径带 archive:/ 前缀和目录部分，条目偏移 1000 +
/// 描述符偏移 20 ⇒ 从共享流的第 1020 字节开始读
#[test]
fn test_archive_entry_match() {
    let mut archive = sample_archive();
    let descriptor = StreamingDescriptor {
        offset: 20,
        size: 50,
        path: "archive:/sub/CAB-aa.resS".to_string(),
    };

    let data = StreamingResolver::resolve(
        &descriptor,
        &[],
        &PathBuf::from("bundle/CAB-aa"),
        Some(&mut archive),
    )
    .expect("归档条目应该命中");

    let expected: Vec<u8> = (1020..1070u32).map(|i| (i % 251) as u8).collect();
    assert_eq!(data, expected);
}

/// 部分版本不写 archive:/ 前缀，裸文件名同样命中
#[test]
fn test_archive_entry_without_prefix() {
    let mut archive = sample_archive();
    let descriptor = StreamingDescriptor {
        offset: 0,
        size: 4,
        path: "CAB-aa.resS".to_string(),
    };

    let data = StreamingResolver::resolve(
        &descriptor,
        &[],
        &PathBuf::from("bundle/CAB-aa"),
        Some(&mut archive),
    )
    .unwrap();
    let expected: Vec<u8> = (1000..1004u32).map(|i| (i % 251) as u8).collect();
    assert_eq!(data, expected);
}

#[test]
fn test_archive_entry_not_found() {
    let mut archive = sample_archive();
    let descriptor = StreamingDescriptor {
        offset: 0,
        size: 4,
        path: "archive:/CAB-zz.resS".to_string(),
    };

    let err = StreamingResolver::resolve(
        &descriptor,
        &[],
        &PathBuf::from("bundle/CAB-aa"),
        Some(&mut archive),
    )
    .unwrap_err();
    assert!(
        matches!(err, TextureError::StreamEntryNotFoundInArchive(name) if name == "CAB-zz.resS")
    );
}

/// 归一化不变量：任何非内联解析成功后，重新读取描述符必为 {0,0,""}
#[test]
fn test_normalization_after_resolution() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("level0.resS"), vec![9u8; 64]).unwrap();
    let owning_file = dir.path().join("level0.assets");

    let mut tree = MemoryFieldTree::new();
    tree.set_i64(FIELD_TEXTURE_FORMAT, TextureFormat::RGBA32 as i32 as i64);
    tree.set_i64(FIELD_WIDTH, 4);
    tree.set_i64(FIELD_HEIGHT, 4);
    tree.set_i64(FIELD_STREAM_OFFSET, 0);
    tree.set_i64(FIELD_STREAM_SIZE, 64);
    tree.set_string(FIELD_STREAM_PATH, "level0.resS");
    tree.set_bytes(FIELD_IMAGE_DATA, vec![]);

    let mut info = TextureInfo::from_tree(&tree).unwrap();
    assert!(!info.stream_data.is_inline());

    let data = StreamingResolver::resolve_for_tree(&mut tree, &mut info, &owning_file, None)
        .expect("松散文件解析应该成功");
    assert_eq!(data.len(), 64);

    // 树里和 info 里的描述符都已归一化为内联形态
    assert_eq!(tree.get_i64(FIELD_STREAM_OFFSET), Some(0));
    assert_eq!(tree.get_i64(FIELD_STREAM_SIZE), Some(0));
    assert_eq!(tree.get_string(FIELD_STREAM_PATH).as_deref(), Some(""));
    assert!(info.stream_data.is_inline());
}

/// 内联解析不触发归一化写入（本来就是内联）
#[test]
fn test_inline_resolution_leaves_tree_untouched() {
    let mut tree = MemoryFieldTree::new();
    tree.set_i64(FIELD_TEXTURE_FORMAT, TextureFormat::RGBA32 as i32 as i64);
    tree.set_i64(FIELD_WIDTH, 1);
    tree.set_i64(FIELD_HEIGHT, 1);
    tree.set_bytes(FIELD_IMAGE_DATA, vec![1, 2, 3, 4]);

    let mut info = TextureInfo::from_tree(&tree).unwrap();
    let data = StreamingResolver::resolve_for_tree(
        &mut tree,
        &mut info,
        &PathBuf::from("/nope/level0.assets"),
        None,
    )
    .unwrap();

    assert_eq!(data, vec![1, 2, 3, 4]);
    // 树中从未写入过流式字段，解析也不应该补写
    assert!(!tree.has_field(FIELD_STREAM_PATH));
}
