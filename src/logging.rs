// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 支持环境变量配置日志级别
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=debug 或 RUST_LOG=vehicle_bulk_import=trace
///
/// # 示例
/// ```no_run
/// use vehicle_bulk_import::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 初始化 JSON 格式日志（供日志采集使用）
pub fn init_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(filter)
        .init();
}

/// 初始化测试环境的日志系统
///
/// 可重复调用；仅首次生效
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("vehicle_bulk_import=debug"))
        .with_test_writer()
        .try_init();
}
