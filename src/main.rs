use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use texture_extractor::{BatchMatcher, ImportAsset, SUPPORTED_IMAGE_EXTENSIONS};

#[derive(Parser)]
#[command(name = "texture_extractor")]
#[command(about = "为选中的贴图资产在目录中计算批量导入候选")]
#[command(version)]
struct Cli {
    /// 资产选择JSON文件路径（ImportAsset数组）
    #[arg(short, long)]
    assets: PathBuf,

    /// 候选文件所在目录
    #[arg(short, long)]
    dir: PathBuf,

    /// 匹配模板，如 "{Description}_{PathID}"（留空用默认后缀）
    #[arg(short, long, default_value = "")]
    template: String,

    /// 允许的扩展名（逗号分隔）
    #[arg(long)]
    extensions: Option<String>,

    /// 通配模式：不过滤扩展名，按去扩展名后的文件名匹配
    #[arg(long)]
    wildcard: bool,

    /// 输出JSON文件路径（缺省打印到标准输出）
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 静默模式(仅输出错误)
    #[arg(long)]
    quiet: bool,
}

/// 输出的单个匹配条目
#[derive(Serialize)]
struct MatchEntry {
    display_name: String,
    file: String,
    path_id: i64,
    candidates: Vec<String>,
    selected_index: i32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    validate_input(&cli)?;

    let assets = load_assets(&cli.assets)?;
    if !cli.quiet {
        println!("已加载 {} 个资产描述", assets.len());
    }

    handle_match(&cli, assets)
}

fn validate_input(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.assets.exists() {
        return Err(format!("资产文件不存在: {:?}", cli.assets).into());
    }
    if !cli.dir.is_dir() {
        return Err(format!("目录不存在: {:?}", cli.dir).into());
    }
    Ok(())
}

fn load_assets(path: &Path) -> Result<Vec<ImportAsset>, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn handle_match(cli: &Cli, assets: Vec<ImportAsset>) -> Result<(), Box<dyn std::error::Error>> {
    let extensions: Vec<String> = if cli.wildcard {
        vec!["*".to_string()]
    } else {
        match &cli.extensions {
            Some(list) => list.split(',').map(|e| e.trim().to_string()).collect(),
            None => SUPPORTED_IMAGE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    };

    let mut matcher = BatchMatcher::new(cli.dir.clone(), assets, extensions)?;
    matcher.set_template(&cli.template);

    let entries: Vec<MatchEntry> = matcher
        .reviewable()
        .map(|(_, asset, set)| MatchEntry {
            display_name: asset.display_name.clone(),
            file: asset.record.file_name(),
            path_id: asset.record.path_id,
            candidates: set.files.clone(),
            selected_index: set.selected_index,
        })
        .collect();

    let json = serde_json::to_string_pretty(&entries)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)?;
            if !cli.quiet {
                println!("匹配结果已写入: {:?}", path);
            }
        }
        None => println!("{}", json),
    }

    if !cli.quiet {
        println!("{} 个资产有候选文件", entries.len());
    }
    Ok(())
}
