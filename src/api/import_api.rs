// ==========================================
// 学生名册管理系统 - 导入导出 API
// ==========================================
// 职责: 文本 ⇄ 学生名册批量桥接
// 红线: 每一行都经 StudentApi::save_student，坏行跳过不中断
// ==========================================

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tracing::{info, instrument, warn};

use crate::api::audit;
use crate::api::error::{ApiError, ApiResult};
use crate::api::student_api::StudentApi;
use crate::domain::action_log::{ActionLog, ActionType, ACTOR_USER};
use crate::domain::student::Student;
use crate::importer::error::ImportError;
use crate::importer::exporter::{export_to_string, write_students};
use crate::importer::field_mapper::{ColumnLayout, FieldMapper};
use crate::importer::file_parser::{CsvParser, ParsedTable};
use crate::importer::report::{ImportFailure, ImportReport};
use crate::repository::action_log_repo::ActionLogRepository;

pub struct ImportApi {
    student_api: Arc<StudentApi>,
    action_log_repo: Option<Arc<ActionLogRepository>>,
}

impl ImportApi {
    pub fn new(student_api: Arc<StudentApi>) -> Self {
        Self {
            student_api,
            action_log_repo: None,
        }
    }

    pub fn with_action_log(mut self, action_log_repo: Arc<ActionLogRepository>) -> Self {
        self.action_log_repo = Some(action_log_repo);
        self
    }

    // ==========================================
    // 导入
    // ==========================================

    /// 从文本导入
    ///
    /// # 参数
    /// - text: 首行为表头的逗号分隔文本
    /// - layout: 列布局；None 时按表头列数识别
    ///
    /// # 返回
    /// - Ok(ImportReport): 成功数 + 逐行失败明细
    /// - Err(Parse): 无法识别布局或文本无法解析（未处理任何行）
    #[instrument(skip(self, text))]
    pub fn import_from_text(
        &self,
        text: &str,
        layout: Option<ColumnLayout>,
    ) -> ApiResult<ImportReport> {
        let table = CsvParser::parse_str(text)
            .map_err(|e| self.failure("import_from_text", e))?;
        self.import_table(table, layout)
    }

    /// 从文件导入
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_from_path(
        &self,
        path: impl AsRef<Path>,
        layout: Option<ColumnLayout>,
    ) -> ApiResult<ImportReport> {
        let table = CsvParser::parse_file(path.as_ref())
            .map_err(|e| self.failure("import_from_path", e))?;
        self.import_table(table, layout)
    }

    fn import_table(
        &self,
        table: ParsedTable,
        layout: Option<ColumnLayout>,
    ) -> ApiResult<ImportReport> {
        let layout = match layout {
            Some(l) => l,
            None => ColumnLayout::detect(table.headers.len())
                .map_err(|e| self.failure("import", e))?,
        };
        let mapper = FieldMapper::new(layout);
        let mut report = ImportReport::new(layout);

        // 解析阶段的行级错误（编码/格式）
        for err in &table.rejected {
            warn!(line = ?err.row(), error = %err, "导入行无法解析，已跳过");
            report.failures.push(ImportFailure::from_error(err, None));
        }

        for row in &table.rows {
            let draft = match mapper.map_row(row) {
                Ok(d) => d,
                Err(e) => {
                    warn!(line = row.line_number, error = %e, "导入行解析失败，已跳过");
                    let student_id = row.fields.first().cloned().filter(|s| !s.is_empty());
                    report.failures.push(ImportFailure::from_error(&e, student_id));
                    continue;
                }
            };

            let student_id = draft.student_id.clone();
            match self.student_api.save_student(draft) {
                Ok(_) => report.imported += 1,
                Err(e) => {
                    warn!(line = row.line_number, student_id = %student_id, error = %e, "导入行保存失败，已跳过");
                    let err = ImportError::Rejected {
                        row: row.line_number,
                        message: e.to_string(),
                    };
                    report
                        .failures
                        .push(ImportFailure::from_error(&err, Some(student_id)));
                }
            }
        }

        report.failures.sort_by_key(|f| f.line);

        info!(
            batch_id = %report.batch_id,
            layout = ?layout,
            imported = report.imported,
            failed = report.failed(),
            "导入完成"
        );
        self.record(
            ActionLog::new(ActionType::Import, ACTOR_USER)
                .with_payload(json!({
                    "batch_id": report.batch_id,
                    "layout": layout,
                    "imported": report.imported,
                    "failed": report.failed(),
                }))
                .with_detail(report.summary()),
        );
        Ok(report)
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 导出当前名册为文本
    #[instrument(skip(self))]
    pub fn export_to_text(&self, layout: ColumnLayout) -> ApiResult<String> {
        let students = self.student_api.list_students()?;
        let text = self.export_students(&students, layout)?;
        self.record_export(layout, students.len(), None);
        Ok(text)
    }

    /// 导出指定学生列表（不读库）
    pub fn export_students(&self, students: &[Student], layout: ColumnLayout) -> ApiResult<String> {
        Ok(export_to_string(students, layout)?)
    }

    /// 导出当前名册到文件
    ///
    /// # 返回
    /// - Ok(usize): 导出的学生数
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn export_to_path(&self, path: impl AsRef<Path>, layout: ColumnLayout) -> ApiResult<usize> {
        let path = path.as_ref();
        let students = self.student_api.list_students()?;

        File::create(path)
            .map_err(|e| ImportError::FileWrite(format!("{}: {}", path.display(), e)))
            .and_then(|file| write_students(BufWriter::new(file), &students, layout))
            .map_err(|e| self.failure("export_to_path", e))?;

        self.record_export(layout, students.len(), Some(path));
        Ok(students.len())
    }

    fn record_export(&self, layout: ColumnLayout, count: usize, path: Option<&Path>) {
        info!(layout = ?layout, count, "导出完成");
        let mut log = ActionLog::new(ActionType::Export, ACTOR_USER).with_payload(json!({
            "layout": layout,
            "count": count,
        }));
        if let Some(p) = path {
            log = log.with_detail(p.display().to_string());
        }
        self.record(log);
    }

    fn failure(&self, operation: &str, err: impl Into<ApiError>) -> ApiError {
        audit::storage_failure(self.action_log_repo.as_deref(), operation, None, err.into())
    }

    fn record(&self, log: ActionLog) {
        if let Some(repo) = &self.action_log_repo {
            repo.record_best_effort(&log);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorKind;
    use crate::config::thresholds::InMemoryThresholdStore;
    use crate::repository::in_memory::InMemoryStudentRepository;

    fn setup() -> ImportApi {
        let student_api = StudentApi::new(
            Arc::new(InMemoryStudentRepository::new()),
            Arc::new(InMemoryThresholdStore::default()),
        );
        ImportApi::new(Arc::new(student_api))
    }

    #[test]
    fn test_import_skips_bad_gpa_row() {
        let api = setup();
        let text = "Student ID,Full Name,Programme,GPA,Status\n\
                    S001,Ama Owusu,Biology,3.20,Active\n\
                    S002,Kofi Mensah,Physics,abc,Active\n\
                    S003,Esi Addo,Law,1.00,Inactive\n";
        let report = api.import_from_text(text, None).unwrap();

        assert_eq!(report.layout, ColumnLayout::Standard);
        assert_eq!(report.imported, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].line, 3);
        assert!(report.summary().contains("成功导入 2 名学生"));
    }

    #[test]
    fn test_import_validation_failure_reported_per_row() {
        let api = setup();
        let text = "Student ID,Full Name,Programme,GPA,Status\n\
                    S1,Ama Owusu,Biology,3.20,Active\n\
                    S002,R2D2,Physics,3.0,Active\n\
                    S003,Esi Addo,Law,5.0,Active\n\
                    S004,Yaw Darko,Law,2.0,Active\n";
        let report = api.import_from_text(text, None).unwrap();
        assert_eq!(report.imported, 1);
        let lines: Vec<usize> = report.failures.iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }

    #[test]
    fn test_import_unknown_layout_fails_whole() {
        let api = setup();
        let err = api
            .import_from_text("a,b,c\nS001,Ama,3.0\n", None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn test_export_roundtrip() {
        let api = setup();
        let text = "Student ID,Full Name,Programme,GPA,Status\n\
                    S001,Ama Owusu,Biology,3.2,Active\n\
                    S002,Kofi Mensah,Physics,1.25,Inactive\n";
        api.import_from_text(text, None).unwrap();

        let exported = api.export_to_text(ColumnLayout::Standard).unwrap();
        assert_eq!(
            exported,
            "Student ID,Full Name,Programme,GPA,Status\n\
             S001,Ama Owusu,Biology,3.20,Active\n\
             S002,Kofi Mensah,Physics,1.25,Inactive\n"
        );

        let fresh = setup();
        let report = fresh.import_from_text(&exported, None).unwrap();
        assert_eq!(report.imported, 2);
    }
}
