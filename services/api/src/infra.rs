use loan_approval::config::AppConfig;
use loan_approval::error::AppError;
use loan_approval::telemetry;
use loan_approval::underwriting::{CachedModel, DecisionRenderer, LogisticRegressionModel};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type LoanRenderer = DecisionRenderer<LogisticRegressionModel>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Resolve the artifact path: explicit override first, then configuration.
pub(crate) fn model_path(config: &AppConfig, override_path: Option<PathBuf>) -> PathBuf {
    override_path.unwrap_or_else(|| config.model.artifact_path.clone())
}

/// Load the classifier once and wrap it in a renderer shared by every request.
pub(crate) fn load_renderer(model: &CachedModel) -> Result<Arc<LoanRenderer>, AppError> {
    let classifier = model.get()?;
    let renderer = DecisionRenderer::new(classifier)?;
    Ok(Arc::new(renderer))
}

/// Shared setup for the one-shot commands: configuration, logging, model.
pub(crate) fn command_renderer(model: Option<PathBuf>) -> Result<Arc<LoanRenderer>, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    load_renderer(&CachedModel::new(model_path(&config, model)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_commands_install_the_log_subscriber() {
        let artifact =
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models/loan_approval.json");

        let renderer = command_renderer(Some(artifact)).expect("command setup succeeds");

        assert!(tracing::dispatcher::has_been_set());
        assert_eq!(renderer.encoder().schema().len(), 23);
    }
}
