/// 批量匹配模块
///
/// 在批量导入前，把每个选中资产和目录中的候选文件按命名模板配对。
/// 候选集在模板变化时整体重算（纯函数），用户的手动选择保存在独立的
/// 覆盖表里，重算后合并——只要该资产的候选列表没变，覆盖就不丢失。
///
/// # 匹配规则
///
/// - 空模板时每个资产的有效后缀为 `-{文件名}-{PathID}`
/// - 否则模板中的 `{Description}`/`{File}`/`{PathID}` 被替换为
///   显示名称、所属文件名、路径标识
/// - 非通配模式：`后缀.扩展名` 与候选文件名做**后缀**匹配（允许
///   任意前缀，如 mod 名、版本号）
/// - 通配模式（扩展名含 `*`）：候选文件名去扩展名后与后缀匹配
use crate::fieldtree::AssetRecord;
use crate::utils::{strip_extension, TextureError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// 批量导入中的一个选中资产
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportAsset {
    /// 资产记录
    pub record: AssetRecord,
    /// 显示名称（来自字段树的 m_Name）
    pub display_name: String,
}

/// 单个资产的候选文件集
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchCandidateSet {
    /// 满足当前模板的目录文件名（有序）
    pub files: Vec<String>,
    /// 当前选中下标，-1 表示未选
    pub selected_index: i32,
}

/// 构造一个资产对一个扩展名的匹配串
///
/// `extension` 为 `*` 时返回裸后缀（通配模式）。
pub fn match_name(
    template: &str,
    display_name: &str,
    file_name: &str,
    path_id: i64,
    extension: &str,
) -> String {
    let suffix = if template.is_empty() {
        format!("-{}-{}", file_name, path_id)
    } else {
        template
            .replace("{Description}", display_name)
            .replace("{File}", file_name)
            .replace("{PathID}", &path_id.to_string())
    };

    if extension != "*" {
        format!("{}.{}", suffix, extension)
    } else {
        suffix
    }
}

/// 纯函数：对全部资产重算候选列表
pub fn compute_candidates(
    template: &str,
    assets: &[ImportAsset],
    files_in_dir: &[String],
    extensions: &[String],
    any_extension: bool,
) -> Vec<Vec<String>> {
    assets
        .iter()
        .map(|asset| {
            let file_name = asset.record.file_name();
            if any_extension {
                let suffix = match_name(
                    template,
                    &asset.display_name,
                    &file_name,
                    asset.record.path_id,
                    "*",
                );
                files_in_dir
                    .iter()
                    .filter(|f| strip_extension(f).ends_with(&suffix))
                    .cloned()
                    .collect()
            } else {
                files_in_dir
                    .iter()
                    .filter(|f| {
                        extensions.iter().any(|ext| {
                            f.ends_with(&match_name(
                                template,
                                &asset.display_name,
                                &file_name,
                                asset.record.path_id,
                                ext,
                            ))
                        })
                    })
                    .cloned()
                    .collect()
            }
        })
        .collect()
}

/// 批量匹配器
///
/// 目录列表与模板状态由一个匹配器实例独占（对话框生命周期内单实例）。
pub struct BatchMatcher {
    directory: PathBuf,
    files_in_dir: Vec<String>,
    extensions: Vec<String>,
    any_extension: bool,
    template: String,
    assets: Vec<ImportAsset>,
    candidates: Vec<MatchCandidateSet>,
    /// 用户手动选择：资产下标 -> 候选下标
    overrides: HashMap<usize, usize>,
}

impl BatchMatcher {
    /// 扫描目录并用空模板建立初始候选集
    ///
    /// 扩展名过滤大小写不敏感；`extensions` 含 `*` 时不过滤。
    pub fn new(
        directory: PathBuf,
        assets: Vec<ImportAsset>,
        extensions: Vec<String>,
    ) -> Result<Self, TextureError> {
        let any_extension = extensions.iter().any(|e| e == "*");
        let mut files_in_dir = Vec::new();
        for entry in std::fs::read_dir(&directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let keep = any_extension
                || extensions.iter().any(|ext| {
                    name.rsplit('.')
                        .next()
                        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
                });
            if keep {
                files_in_dir.push(name);
            }
        }
        // 目录遍历顺序不稳定，排序保证候选下标可复现
        files_in_dir.sort();

        Ok(Self::with_listing(
            directory,
            files_in_dir,
            assets,
            extensions,
        ))
    }

    /// 用现成的文件列表构造（测试和外部列目录场景）
    pub fn with_listing(
        directory: PathBuf,
        files_in_dir: Vec<String>,
        assets: Vec<ImportAsset>,
        extensions: Vec<String>,
    ) -> Self {
        let any_extension = extensions.iter().any(|e| e == "*");
        let mut matcher = Self {
            directory,
            files_in_dir,
            extensions,
            any_extension,
            template: String::new(),
            assets,
            candidates: Vec::new(),
            overrides: HashMap::new(),
        };
        matcher.recompute();
        matcher
    }

    /// 设置匹配模板并重算全部候选集
    ///
    /// 某资产的候选列表在重算前后一致时，它的手动选择保持不变；
    /// 列表变化则选择复位为 0（空集为 -1）并丢弃覆盖。
    pub fn set_template(&mut self, template: &str) {
        if self.template == template {
            return;
        }
        self.template = template.to_string();
        self.recompute();
    }

    fn recompute(&mut self) {
        let lists = compute_candidates(
            &self.template,
            &self.assets,
            &self.files_in_dir,
            &self.extensions,
            self.any_extension,
        );

        let mut next = Vec::with_capacity(lists.len());
        for (i, files) in lists.into_iter().enumerate() {
            let unchanged = self
                .candidates
                .get(i)
                .is_some_and(|prev| prev.files == files);

            let override_index = self.overrides.get(&i).copied();
            let selected_index = match override_index {
                Some(ov) if unchanged && ov < files.len() => ov as i32,
                _ => {
                    self.overrides.remove(&i);
                    if files.is_empty() {
                        -1
                    } else {
                        0
                    }
                }
            };

            next.push(MatchCandidateSet {
                files,
                selected_index,
            });
        }
        debug!(
            "模板 {:?} 重算完成，{} 个资产中 {} 个有候选",
            self.template,
            next.len(),
            next.iter().filter(|c| !c.files.is_empty()).count()
        );
        self.candidates = next;
    }

    /// 当前模板
    pub fn template(&self) -> &str {
        &self.template
    }

    /// 全部候选集（与构造时的资产顺序对齐）
    pub fn candidates(&self) -> &[MatchCandidateSet] {
        &self.candidates
    }

    /// 可复查的资产（候选集非空的那些），返回 (下标, 资产, 候选集)
    pub fn reviewable(&self) -> impl Iterator<Item = (usize, &ImportAsset, &MatchCandidateSet)> {
        self.assets
            .iter()
            .zip(&self.candidates)
            .enumerate()
            .filter(|(_, (_, set))| !set.files.is_empty())
            .map(|(i, (asset, set))| (i, asset, set))
    }

    /// 手动选择某资产的候选文件；只影响该资产
    pub fn select_candidate(&mut self, asset_index: usize, candidate_index: usize) -> bool {
        let Some(set) = self.candidates.get_mut(asset_index) else {
            return false;
        };
        if candidate_index >= set.files.len() {
            return false;
        }
        set.selected_index = candidate_index as i32;
        self.overrides.insert(asset_index, candidate_index);
        true
    }

    /// 提交：对每个已选资产配出 (资产, 解析后的文件路径)
    ///
    /// 未选（selected_index == -1）的资产被静默省略，部分提交合法。
    pub fn commit(&self) -> Vec<(ImportAsset, PathBuf)> {
        self.assets
            .iter()
            .zip(&self.candidates)
            .filter(|(_, set)| set.selected_index != -1)
            .map(|(asset, set)| {
                let file = &set.files[set.selected_index as usize];
                (asset.clone(), self.directory.join(file))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(name: &str, file: &str, path_id: i64) -> ImportAsset {
        ImportAsset {
            record: AssetRecord {
                file_path: PathBuf::from(file),
                path_id,
                class_id: 28,
                mono_id: None,
                target_platform: 0,
            },
            display_name: name.to_string(),
        }
    }

    fn extensions() -> Vec<String> {
        vec!["png".to_string(), "tga".to_string()]
    }

    #[test]
    fn test_default_template_suffix() {
        // 空模板：后缀为 -{文件名}-{PathID}.{扩展名}
        assert_eq!(match_name("", "level0", "level0", 1, "png"), "-level0-1.png");
        // 通配模式去掉扩展名
        assert_eq!(match_name("", "level0", "level0", 1, "*"), "-level0-1");
    }

    #[test]
    fn test_placeholder_substitution() {
        assert_eq!(
            match_name("{Description}_{PathID}", "MainTex", "level0", 7, "png"),
            "MainTex_7.png"
        );
        assert_eq!(
            match_name("{File}-{Description}", "MainTex", "level0", 7, "tga"),
            "level0-MainTex.tga"
        );
    }

    #[test]
    fn test_suffix_match_allows_prefix() {
        let assets = vec![asset("level0", "level0", 1)];
        let files = vec![
            "img-level0-1.png".to_string(),
            "level0-1.png".to_string(),
            "unrelated.png".to_string(),
        ];
        let matcher =
            BatchMatcher::with_listing(PathBuf::from("/import"), files, assets, extensions());

        // "level0-1.png" 缺少前导 '-'（后缀是 "-level0-1.png"），不匹配
        let set = &matcher.candidates()[0];
        assert_eq!(set.files, vec!["img-level0-1.png".to_string()]);
        assert_eq!(set.selected_index, 0);
    }

    #[test]
    fn test_empty_candidate_set_excluded() {
        let assets = vec![asset("a", "level0", 1), asset("b", "level0", 2)];
        let files = vec!["mod-level0-1.png".to_string()];
        let matcher =
            BatchMatcher::with_listing(PathBuf::from("/import"), files, assets, extensions());

        let reviewable: Vec<_> = matcher.reviewable().collect();
        assert_eq!(reviewable.len(), 1);
        assert_eq!(reviewable[0].0, 0);
        assert_eq!(matcher.candidates()[1].selected_index, -1);
    }

    #[test]
    fn test_partial_commit() {
        let assets = vec![asset("a", "level0", 1), asset("b", "level0", 2)];
        let files = vec!["x-level0-1.png".to_string()];
        let matcher =
            BatchMatcher::with_listing(PathBuf::from("/import"), files, assets, extensions());

        let committed = matcher.commit();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].0.record.path_id, 1);
        assert_eq!(committed[0].1, PathBuf::from("/import/x-level0-1.png"));
    }

    #[test]
    fn test_override_survives_unchanged_recompute() {
        let assets = vec![asset("MainTex", "level0", 7)];
        let files = vec![
            "a-level0-7.png".to_string(),
            "b-level0-7.png".to_string(),
            "MainTex_7.png".to_string(),
        ];
        let mut matcher =
            BatchMatcher::with_listing(PathBuf::from("/import"), files, assets, extensions());

        assert!(matcher.select_candidate(0, 1));
        assert_eq!(matcher.candidates()[0].selected_index, 1);

        // 相同模板重设是空操作，覆盖保持
        matcher.set_template("");
        assert_eq!(matcher.candidates()[0].selected_index, 1);

        // 候选列表变化：覆盖丢弃，选择复位为 0
        matcher.set_template("{Description}_{PathID}");
        assert_eq!(
            matcher.candidates()[0].files,
            vec!["MainTex_7.png".to_string()]
        );
        assert_eq!(matcher.candidates()[0].selected_index, 0);
    }

    #[test]
    fn test_wildcard_mode() {
        let assets = vec![asset("MainTex", "level0", 7)];
        let files = vec!["skin-MainTex_7.dds".to_string(), "other.dds".to_string()];
        let matcher = BatchMatcher::with_listing(
            PathBuf::from("/import"),
            files,
            assets,
            vec!["*".to_string()],
        );
        // 空模板的默认后缀 "-level0-7" 与去扩展名后的文件名不匹配
        assert!(matcher.candidates()[0].files.is_empty());

        let assets = vec![asset("MainTex", "level0", 7)];
        let files = vec!["skin-MainTex_7.dds".to_string()];
        let mut matcher = BatchMatcher::with_listing(
            PathBuf::from("/import"),
            files,
            assets,
            vec!["*".to_string()],
        );
        matcher.set_template("{Description}_{PathID}");
        assert_eq!(
            matcher.candidates()[0].files,
            vec!["skin-MainTex_7.dds".to_string()]
        );
    }

    #[test]
    fn test_same_file_satisfies_multiple_assets() {
        // 同一目录文件允许同时出现在多个资产的候选集中（重复资产场景）
        let assets = vec![asset("MainTex", "level0", 7), asset("MainTex", "level1", 7)];
        let files = vec!["MainTex_7.png".to_string()];
        let mut matcher =
            BatchMatcher::with_listing(PathBuf::from("/import"), files, assets, extensions());
        matcher.set_template("{Description}_{PathID}");

        assert_eq!(matcher.candidates()[0].files.len(), 1);
        assert_eq!(matcher.candidates()[1].files.len(), 1);
        assert_eq!(matcher.commit().len(), 2);
    }
}
