use serde::{Deserialize, Serialize};

use crate::validator::{check_valid_string, is_placeholder};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,
    // Base URL of the session manager web service (no trailing path)
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    // Session storage file; relative paths resolve against the config dir
    #[serde(default)]
    pub session_file: Option<String>,
    #[serde(default = "default_true")]
    pub animations: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            server_url: default_server_url(),
            request_timeout_secs: default_timeout(),
            session_file: None,
            animations: true,
        }
    }
}

fn default_title() -> String {
    "ML Session Manager".to_string()
}

fn default_server_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

pub(crate) fn validate_app_config(cfg: &AppConfig) -> Result<(), String> {
    let url = cfg.server_url.trim();
    if url.is_empty() {
        return Err("server_url must not be empty".to_string());
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(format!(
            "server_url '{url}' must start with http:// or https://"
        ));
    }
    if cfg.request_timeout_secs == 0 || cfg.request_timeout_secs > 600 {
        return Err(format!(
            "request_timeout_secs must be in 1..=600, got {}",
            cfg.request_timeout_secs
        ));
    }
    if let Some(p) = &cfg.session_file {
        if p.trim().is_empty() {
            return Err("session_file must not be blank when set".to_string());
        }
    }
    Ok(())
}

/// A prior analysis session offered by `/retrieve-session`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SessionOption {
    pub id: i64,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Svm,
    Svr,
}

impl ModelType {
    pub const ALL: [ModelType; 2] = [ModelType::Svm, ModelType::Svr];

    pub fn parse(raw: &str) -> Option<Self> {
        if is_placeholder(raw) || !check_valid_string(raw) {
            return None;
        }
        match raw.trim().to_ascii_lowercase().as_str() {
            "svm" => Some(ModelType::Svm),
            "svr" => Some(ModelType::Svr),
            _ => None,
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            ModelType::Svm => "svm",
            ModelType::Svr => "svr",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModelType::Svm => "SVM",
            ModelType::Svr => "SVR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelType {
    Linear,
    Poly,
    Rbf,
    Sigmoid,
}

impl KernelType {
    pub const ALL: [KernelType; 4] = [
        KernelType::Linear,
        KernelType::Poly,
        KernelType::Rbf,
        KernelType::Sigmoid,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        if is_placeholder(raw) || !check_valid_string(raw) {
            return None;
        }
        match raw.trim().to_ascii_lowercase().as_str() {
            "linear" => Some(KernelType::Linear),
            "poly" => Some(KernelType::Poly),
            "rbf" => Some(KernelType::Rbf),
            "sigmoid" => Some(KernelType::Sigmoid),
            _ => None,
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            KernelType::Linear => "linear",
            KernelType::Poly => "poly",
            KernelType::Rbf => "rbf",
            KernelType::Sigmoid => "sigmoid",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            KernelType::Linear => "Linear",
            KernelType::Poly => "Polynomial",
            KernelType::Rbf => "RBF",
            KernelType::Sigmoid => "Sigmoid",
        }
    }
}

/// Body of the `/load-data` request issued by the Generate Model form.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ModelGeneratePayload {
    pub session_type: &'static str,
    pub session_id: i64,
    pub model_type: ModelType,
    pub sv_kernel_type: KernelType,
}

impl ModelGeneratePayload {
    pub fn new(session_id: i64, model_type: ModelType, kernel: KernelType) -> Self {
        Self {
            session_type: "model_generate",
            session_id,
            model_type,
            sv_kernel_type: kernel,
        }
    }
}
