// ==========================================
// 学生名册管理系统 - 命令行入口
// ==========================================
// 用法:
//   student-roster                      打印名册概况
//   student-roster import <file.csv>    导入（按表头识别列布局）
//   student-roster export <file.csv>    按标准 5 列布局导出
//   student-roster threshold <value>    修改非活跃阈值并对账
// 数据库: 环境变量 STUDENT_ROSTER_DB，缺省为用户数据目录
// ==========================================

use anyhow::{bail, Context};
use student_roster::app::{get_default_db_path, AppState};
use student_roster::config::ThresholdKind;
use student_roster::importer::ColumnLayout;
use student_roster::logging;

fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("{} v{}", student_roster::APP_NAME, student_roster::VERSION);

    let db_path = get_default_db_path();
    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None => {}
        Some("import") => {
            let path = args.next().context("缺少导入文件路径")?;
            let report = state.import_api.import_from_path(&path, None)?;
            println!("{}", report.summary());
        }
        Some("export") => {
            let path = args.next().context("缺少导出文件路径")?;
            let count = state.import_api.export_to_path(&path, ColumnLayout::Standard)?;
            println!("已导出 {} 名学生到 {}", count, path);
        }
        Some("threshold") => {
            let raw = args.next().context("缺少阈值")?;
            let value: f64 = raw.parse().with_context(|| format!("阈值格式错误: {}", raw))?;
            if let Some(outcome) = state.config_api.set_threshold(ThresholdKind::Inactive, value)? {
                println!(
                    "阈值已设为 {:.2}，扫描 {} 名，状态变化 {} 名",
                    outcome.threshold,
                    outcome.scanned,
                    outcome.changed_count()
                );
            }
        }
        Some(other) => bail!("未知命令: {}", other),
    }

    let summary = state.report_api.get_summary_statistics()?;
    tracing::info!(
        total = summary.total,
        active = summary.active,
        inactive = summary.inactive,
        average_gpa = summary.average_gpa,
        "名册概况"
    );
    tracing::debug!(config = %state.config_manager.get_config_snapshot()?, "当前配置");

    Ok(())
}
