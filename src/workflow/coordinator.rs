// ==========================================
// 车辆批量导入 - 导入工作流协调器
// ==========================================
// 职责: 驱动 Select → Preview → Uploading → Complete 状态机
// 红线:
// - 同一时刻最多一个提交在途
// - 解码/校验完成后才替换可见状态
// - 持锁期间不跨 await
// ==========================================

use crate::config::ImportConfig;
use crate::domain::types::WorkflowPhase;
use crate::domain::upload::UploadOutcome;
use crate::domain::validation::ValidationResult;
use crate::importer::csv_export::ExportFile;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{check_csv_path, CsvDecoder, DecodedFile};
use crate::importer::template::TemplateGenerator;
use crate::importer::validator::VehicleValidator;
use crate::ingestion::error::{IngestionError, IngestionResult};
use crate::ingestion::service::{CatalogIngestion, IngestionBatch, IngestionResponse};
use crate::workflow::error::{WorkflowError, WorkflowResult};
use crate::workflow::reconcile::reconcile;
use crate::workflow::report::{error_report, failed_records_report};
use crate::workflow::state::{Notice, NoticeLevel, WorkflowState};
use chrono::{Datelike, Local, NaiveDate};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;
use tracing::{info, instrument, warn};

// ==========================================
// Session - 锁内数据（状态 + 在途提交的取消句柄）
// ==========================================
#[derive(Default)]
struct Session {
    state: WorkflowState,
    cancel: Option<oneshot::Sender<()>>,
}

impl Session {
    /// Uploading → Preview（保留已校验数据）
    fn restore_preview(&mut self, notice: Notice) {
        self.cancel = None;
        if self.state.phase == WorkflowPhase::Uploading {
            self.state.phase = WorkflowPhase::Preview;
            self.state.notice = Some(notice);
        }
    }
}

// ==========================================
// InFlightGuard - 在途提交守卫
// ==========================================
// submit() 的 future 在结局落定前被丢弃（任务中止 / 调用方超时）时，
// 把阶段从 Uploading 退回 Preview，避免工作流永久卡死
struct InFlightGuard<'a> {
    session: &'a Mutex<Session>,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(session: &'a Mutex<Session>) -> Self {
        Self {
            session,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        match self.session.lock() {
            Ok(mut session) => {
                warn!("提交在结局落定前被中止，回到预览");
                session.restore_preview(Notice::new(
                    NoticeLevel::Warning,
                    "Upload was interrupted. Check your inventory before retrying.",
                ));
            }
            Err(e) => warn!(error = %e, "提交中止后无法恢复工作流状态"),
        }
    }
}

/// 提交结局（服务响应含传输失败 / 用户取消）
enum SubmitResolution {
    Responded(IngestionResult<IngestionResponse>),
    Cancelled,
}

// ==========================================
// ImportCoordinator
// ==========================================
#[derive(Clone)]
pub struct ImportCoordinator {
    config: ImportConfig,
    decoder: CsvDecoder,
    template: TemplateGenerator,
    service: Arc<dyn CatalogIngestion>,
    session: Arc<Mutex<Session>>,
}

impl ImportCoordinator {
    /// 创建协调器（校验配置）
    pub fn new(service: Arc<dyn CatalogIngestion>, config: ImportConfig) -> WorkflowResult<Self> {
        config.validate()?;

        Ok(Self {
            decoder: CsvDecoder::new(config.max_file_size_bytes),
            template: TemplateGenerator::new(config.template_file_name.clone()),
            config,
            service,
            session: Arc::new(Mutex::new(Session::default())),
        })
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn phase(&self) -> WorkflowResult<WorkflowPhase> {
        Ok(self.lock()?.state.phase)
    }

    /// 当前状态快照（拷贝）
    pub fn snapshot(&self) -> WorkflowResult<WorkflowState> {
        Ok(self.lock()?.state.clone())
    }

    pub fn can_submit(&self) -> WorkflowResult<bool> {
        Ok(self.lock()?.state.can_submit())
    }

    // ==========================================
    // Select → Preview
    // ==========================================

    /// 选择文件（内存字节）
    ///
    /// # 返回
    /// - Ok(ValidationResult): 解码与校验完成，进入 Preview
    /// - Err: 解码失败 / 空文件 / 非 Select 阶段，状态保持 Select
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn select_file(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> WorkflowResult<ValidationResult> {
        self.ensure_phase(WorkflowPhase::Select, WorkflowPhase::Preview)?;

        if !file_name.to_lowercase().ends_with(".csv") {
            let ext = Path::new(file_name)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            let err = WorkflowError::Decode(ImportError::UnsupportedFormat(ext));
            self.set_notice(Notice::new(NoticeLevel::Error, err.to_string()))?;
            return Err(err);
        }

        info!(file_name = %file_name, "开始解析上传文件");

        let decoder = self.decoder.clone();
        let validator = self.validator();
        let processed = tokio::task::spawn_blocking(
            move || -> ImportResult<(DecodedFile, ValidationResult)> {
                let decoded = decoder.decode_bytes(&bytes)?;
                let validation = validator.validate(&decoded.records);
                Ok((decoded, validation))
            },
        )
        .await
        .map_err(|e| ImportError::Other(anyhow::Error::new(e).context("解析任务异常")))?;

        let mut session = self.lock()?;

        // 解析期间可能已有其他文件进入 Preview
        if session.state.phase != WorkflowPhase::Select {
            return Err(WorkflowError::InvalidStateTransition {
                from: session.state.phase,
                to: WorkflowPhase::Preview,
            });
        }

        let (decoded, validation) = match processed {
            Ok(v) => v,
            Err(e) => {
                warn!(file_name = %file_name, error = %e, "文件解析失败");
                session.state.notice = Some(Notice::new(
                    NoticeLevel::Error,
                    format!("Failed to parse CSV file: {}", e),
                ));
                return Err(e.into());
            }
        };

        if decoded.records.is_empty() {
            warn!(file_name = %file_name, "文件无数据行");
            session.state.notice = Some(Notice::new(
                NoticeLevel::Error,
                WorkflowError::EmptyFile.to_string(),
            ));
            return Err(WorkflowError::EmptyFile);
        }

        info!(
            file_name = %file_name,
            total_rows = validation.total_rows,
            valid = validation.valid_count,
            error_rows = validation.error_row_count,
            warning_rows = validation.warning_row_count,
            "文件校验完成"
        );

        let notice = if validation.is_valid {
            Notice::new(
                NoticeLevel::Info,
                format!("{} vehicles ready to upload", validation.total_rows),
            )
        } else {
            Notice::new(
                NoticeLevel::Warning,
                format!(
                    "{} row(s) have errors. Fix them and re-select the file.",
                    validation.error_row_count
                ),
            )
        };

        session.state = WorkflowState {
            phase: WorkflowPhase::Preview,
            file_name: Some(file_name.to_string()),
            records: Some(decoded.records),
            parse_issues: decoded.parse_issues,
            validation: Some(validation.clone()),
            outcome: None,
            notice: Some(notice),
        };

        Ok(validation)
    }

    /// 选择文件（本地路径）
    pub async fn select_path(&self, file_path: &Path) -> WorkflowResult<ValidationResult> {
        let bytes = self.read_path(file_path).await.map_err(|e| {
            let err = WorkflowError::Decode(e);
            // 通知写入失败不影响原错误返回
            let _ = self.set_notice(Notice::new(NoticeLevel::Error, err.to_string()));
            err
        })?;

        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.csv")
            .to_string();

        self.select_file(&file_name, bytes).await
    }

    async fn read_path(&self, file_path: &Path) -> ImportResult<Vec<u8>> {
        check_csv_path(file_path)?;

        let size = tokio::fs::metadata(file_path).await?.len();
        if size > self.config.max_file_size_bytes {
            return Err(ImportError::FileTooLarge {
                size,
                limit: self.config.max_file_size_bytes,
            });
        }

        Ok(tokio::fs::read(file_path).await?)
    }

    // ==========================================
    // Preview → Uploading → Complete / Select / Preview
    // ==========================================

    /// 提交整批记录
    ///
    /// # 结局
    /// - 服务响应（含部分失败）: Complete
    /// - 传输失败 / 超时: Select，保留已校验数据以便重试
    /// - 用户取消: Preview
    #[instrument(skip(self), fields(batch_id))]
    pub async fn submit(&self) -> WorkflowResult<UploadOutcome> {
        let (batch, cancelled) = self.begin_submission()?;
        let mut guard = InFlightGuard::new(&self.session);
        tracing::Span::current().record("batch_id", &tracing::field::display(batch.batch_id));

        info!(
            batch_id = %batch.batch_id,
            rows = batch.len(),
            "开始提交车辆批次"
        );

        let timeout = self.config.submit_timeout();
        let timeout_secs = self.config.submit_timeout_secs;
        let service = Arc::clone(&self.service);

        let resolution = tokio::select! {
            res = tokio::time::timeout(timeout, service.submit_batch(batch)) => {
                SubmitResolution::Responded(
                    res.unwrap_or(Err(IngestionError::Timeout(timeout_secs))),
                )
            }
            _ = cancelled => SubmitResolution::Cancelled,
        };

        guard.disarm();
        self.finish_submission(resolution)
    }

    fn begin_submission(&self) -> WorkflowResult<(IngestionBatch, oneshot::Receiver<()>)> {
        let mut session = self.lock()?;
        let state = &mut session.state;

        match state.phase {
            WorkflowPhase::Uploading => return Err(WorkflowError::SubmissionInFlight),
            WorkflowPhase::Complete => {
                return Err(WorkflowError::InvalidStateTransition {
                    from: WorkflowPhase::Complete,
                    to: WorkflowPhase::Uploading,
                })
            }
            WorkflowPhase::Select | WorkflowPhase::Preview => {}
        }

        let records = match state.records.as_ref() {
            Some(records) if !records.is_empty() => records,
            _ => return Err(WorkflowError::NothingToSubmit),
        };
        let validation = state
            .validation
            .as_ref()
            .ok_or(WorkflowError::NothingToSubmit)?;
        if !validation.allows_submission() {
            return Err(WorkflowError::SubmissionBlocked {
                error_rows: validation.error_row_count,
            });
        }

        let batch = IngestionBatch::new(state.file_name.clone(), records);
        state.phase = WorkflowPhase::Uploading;
        state.notice = Some(Notice::new(
            NoticeLevel::Info,
            format!("Uploading {} vehicles...", batch.len()),
        ));

        let (tx, rx) = oneshot::channel();
        session.cancel = Some(tx);

        Ok((batch, rx))
    }

    fn finish_submission(&self, resolution: SubmitResolution) -> WorkflowResult<UploadOutcome> {
        let mut session = self.lock()?;
        session.cancel = None;
        let state = &mut session.state;

        match resolution {
            SubmitResolution::Responded(Ok(response)) => {
                let outcome = reconcile(response);

                info!(
                    total = outcome.total,
                    successful = outcome.successful,
                    failed = outcome.failed,
                    "车辆批次提交完成"
                );

                let notice = if outcome.has_failures() {
                    Notice::new(
                        NoticeLevel::Warning,
                        format!(
                            "Uploaded {} of {} vehicles. {} failed.",
                            outcome.successful, outcome.total, outcome.failed
                        ),
                    )
                } else {
                    Notice::new(
                        NoticeLevel::Success,
                        format!("Successfully uploaded {} vehicles", outcome.successful),
                    )
                };

                state.phase = WorkflowPhase::Complete;
                state.outcome = Some(outcome.clone());
                state.notice = Some(notice);
                Ok(outcome)
            }
            SubmitResolution::Responded(Err(e)) => {
                warn!(error = %e, "车辆批次提交失败，回到文件选择");
                state.phase = WorkflowPhase::Select;
                state.notice = Some(Notice::new(
                    NoticeLevel::Error,
                    format!("Upload failed: {}. Your file is kept; try again.", e),
                ));
                Err(WorkflowError::Transport(e))
            }
            SubmitResolution::Cancelled => {
                info!("车辆批次提交已取消");
                state.phase = WorkflowPhase::Preview;
                state.notice = Some(Notice::new(
                    NoticeLevel::Info,
                    WorkflowError::SubmissionCancelled.to_string(),
                ));
                Err(WorkflowError::SubmissionCancelled)
            }
        }
    }

    /// 取消在途提交
    ///
    /// # 返回
    /// - true: 已发出取消信号（状态由 submit 回到 Preview）
    /// - false: 当前没有在途提交（提交方已失联时顺带退回 Preview）
    pub fn cancel_submission(&self) -> WorkflowResult<bool> {
        let mut session = self.lock()?;
        if session.state.phase != WorkflowPhase::Uploading {
            return Ok(false);
        }

        let sent = session
            .cancel
            .take()
            .map(|tx| tx.send(()).is_ok())
            .unwrap_or(false);
        if sent {
            return Ok(true);
        }

        // 接收端已不存在：提交方已离开，直接退回 Preview
        warn!("在途提交已失联，直接回到预览");
        session.restore_preview(Notice::new(
            NoticeLevel::Info,
            WorkflowError::SubmissionCancelled.to_string(),
        ));
        Ok(false)
    }

    /// 重置为初始状态（丢弃全部会话数据）
    pub fn reset(&self) -> WorkflowResult<()> {
        let mut session = self.lock()?;
        if session.state.phase == WorkflowPhase::Uploading {
            return Err(WorkflowError::InvalidStateTransition {
                from: WorkflowPhase::Uploading,
                to: WorkflowPhase::Select,
            });
        }

        info!(from = %session.state.phase, "重置导入工作流");
        *session = Session::default();
        Ok(())
    }

    // ==========================================
    // 导出
    // ==========================================

    /// 错误报告（upload_errors_YYYY-MM-DD.csv）
    pub fn export_errors(&self, date: NaiveDate) -> WorkflowResult<ExportFile> {
        let session = self.lock()?;
        let outcome = session
            .state
            .outcome
            .as_ref()
            .ok_or(WorkflowError::NothingToExport)?;

        Ok(error_report(outcome, &self.config.error_export_prefix, date)?)
    }

    /// 失败行重导出（failed_vehicles_YYYY-MM-DD.csv）
    pub fn export_failed_records(&self, date: NaiveDate) -> WorkflowResult<ExportFile> {
        let session = self.lock()?;
        let state = &session.state;
        let (outcome, records) = match (state.outcome.as_ref(), state.records.as_ref()) {
            (Some(outcome), Some(records)) if outcome.has_failures() => (outcome, records),
            _ => return Err(WorkflowError::NothingToExport),
        };

        Ok(failed_records_report(
            records,
            outcome,
            &self.config.failed_export_prefix,
            date,
        )?)
    }

    /// 上传模板（任何阶段可用）
    pub fn template(&self) -> WorkflowResult<ExportFile> {
        Ok(self.template.generate()?)
    }

    // ==========================================
    // 内部工具
    // ==========================================

    fn lock(&self) -> WorkflowResult<MutexGuard<'_, Session>> {
        self.session
            .lock()
            .map_err(|e| WorkflowError::StatePoisoned(e.to_string()))
    }

    fn ensure_phase(&self, expected: WorkflowPhase, to: WorkflowPhase) -> WorkflowResult<()> {
        let phase = self.lock()?.state.phase;
        if phase != expected {
            return Err(WorkflowError::InvalidStateTransition { from: phase, to });
        }
        Ok(())
    }

    fn set_notice(&self, notice: Notice) -> WorkflowResult<()> {
        self.lock()?.state.notice = Some(notice);
        Ok(())
    }

    fn validator(&self) -> VehicleValidator {
        VehicleValidator::new(self.config.validation_rules(Local::now().year()))
    }
}
