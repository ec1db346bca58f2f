// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort model readiness gate.
//!
//! Checks the inference server's loaded models, asks it to load the model if
//! absent, waits a fixed settling delay and checks once more. No retries and
//! no monitoring after the call returns.

use std::sync::Arc;
use std::time::Duration;

use hasko_core::InferenceProvider;
use tracing::{debug, error, info, warn};

pub struct ModelLauncher {
    inference: Arc<dyn InferenceProvider>,
    settle: Duration,
}

impl ModelLauncher {
    pub fn new(inference: Arc<dyn InferenceProvider>, settle: Duration) -> Self {
        Self { inference, settle }
    }

    /// Returns `true` once `model` is confirmed loaded. Failures degrade to `false`.
    pub async fn ensure_running(&self, model: &str) -> bool {
        if self.is_running(model).await {
            info!(model, "model is already running");
            return true;
        }

        info!(model, "attempting to start model");
        if let Err(e) = self.inference.launch(model).await {
            error!(model, error = %e, "failed to start model");
            return false;
        }

        tokio::time::sleep(self.settle).await;

        if self.is_running(model).await {
            info!(model, "model started successfully");
            true
        } else {
            error!(model, "model failed to start");
            false
        }
    }

    async fn is_running(&self, model: &str) -> bool {
        match self.inference.running_models().await {
            Ok(running) => {
                debug!(model, running = ?running, "loaded models");
                running.iter().any(|name| same_model(model, name))
            }
            Err(e) => {
                warn!(model, error = %e, "error checking model status");
                false
            }
        }
    }
}

/// Case-insensitive model name comparison where a bare name matches its
/// `:latest` tag.
pub fn same_model(wanted: &str, loaded: &str) -> bool {
    if wanted.eq_ignore_ascii_case(loaded) {
        return true;
    }
    !wanted.contains(':')
        && loaded
            .rsplit_once(':')
            .is_some_and(|(base, tag)| tag.eq_ignore_ascii_case("latest") && base.eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use hasko_test_utils::MockInference;
    use tracing_test::traced_test;

    use super::*;

    fn launcher(mock: MockInference) -> (Arc<MockInference>, ModelLauncher) {
        let mock = Arc::new(mock);
        let launcher = ModelLauncher::new(mock.clone(), Duration::from_secs(5));
        (mock, launcher)
    }

    #[test]
    fn model_names_match_loosely() {
        assert!(same_model("Llama3.2:3B", "llama3.2:3b"));
        assert!(same_model("mistral", "mistral:latest"));
        assert!(!same_model("mistral", "mistral:7b"));
        assert!(!same_model("mistral:7b", "mistral:latest"));
        assert!(!same_model("llama3", "llama3.2:latest"));
    }

    #[tokio::test]
    async fn already_running_skips_launch() {
        let (mock, launcher) = launcher(MockInference::new().with_running(&["llama3:latest"]));
        assert!(launcher.ensure_running("llama3").await);
        assert_eq!(mock.launch_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn absent_model_is_launched_then_rechecked() {
        let (mock, launcher) = launcher(MockInference::new());
        assert!(launcher.ensure_running("llama3").await);
        assert_eq!(mock.launch_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn model_that_never_loads_is_reported() {
        let (mock, launcher) = launcher(MockInference::new().never_loads());
        assert!(!launcher.ensure_running("llama3").await);
        assert_eq!(mock.launch_calls(), 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn launch_error_degrades_to_false() {
        let (_mock, launcher) = launcher(MockInference::new().failing_launch());
        assert!(!launcher.ensure_running("llama3").await);
        assert!(logs_contain("failed to start model"));
    }
}
