/// 流水线编排模块
///
/// 把解析、编解码、提交串成逐资产的导出/导入流程，并实现批次级的
/// 聚合-继续错误策略：单个资产的失败只产生一行报告，批次总是跑完。
///
/// # 架构设计
///
/// - **report**: 批次错误报告（带标签的行，封顶 20 行）
/// - **export**: 导出流水线（批量 + 单资产两种入口）
/// - **import**: 导入流水线（消费匹配器的提交结果）
///
/// # 并发模型
///
/// 一次调用一条逻辑线程：资产严格顺序处理，从不并行——每个资产都
/// 会触碰共享的所属文件补丁队列，归档读取器又只有一个可移动游标。
/// 任何资产处理中途都没有挂起点，也没有重试。
pub mod report;
pub mod export;
pub mod import;

// === 导出公共接口 ===
pub use report::{ErrorReport, MAX_REPORT_LINES};
pub use export::{ExportOptions, ExportOutcome, ExportPipeline, ImageFileType};
pub use import::{ImportOutcome, ImportPipeline};
