use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to load {entity} (status {status})")]
    Load { entity: &'static str, status: u16 },
    #[error("session expired (status {status})")]
    AuthExpired { status: u16 },
    #[error("missing Linkwarden URL or token")]
    MissingCredentials,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Structured error data for the message channel
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorInfo {
    Load { entity: &'static str, status: u16 },
    AuthExpired,
    Network(String),
}

impl ErrorInfo {
    pub fn from_dashboard_error(e: &DashboardError) -> Self {
        match e {
            DashboardError::Load { entity, status } => ErrorInfo::Load {
                entity,
                status: *status,
            },
            DashboardError::AuthExpired { .. } | DashboardError::MissingCredentials => {
                ErrorInfo::AuthExpired
            }
            _ => ErrorInfo::Network(e.to_string()),
        }
    }
}

/// Ready-to-render error notice for the main grid
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNotice {
    pub title: String,
    pub message: String,
    pub hint: String,
}

const LOAD_LINKS_MESSAGE: &str =
    "Failed to load links. Check LINKWARDEN_URL / TOKEN and backend connectivity.";

impl ErrorNotice {
    pub fn from_error_info(info: &ErrorInfo) -> Self {
        match info {
            ErrorInfo::Load { entity, status } => Self {
                title: format!("Load Error ({})", status),
                message: if *entity == "links" {
                    LOAD_LINKS_MESSAGE.into()
                } else {
                    format!("Failed to load {}.", entity)
                },
                hint: "Try again later".into(),
            },
            ErrorInfo::AuthExpired => Self {
                title: "Session Expired".into(),
                message: LOAD_LINKS_MESSAGE.into(),
                hint: "Sign in again or restore the session from settings".into(),
            },
            ErrorInfo::Network(msg) => Self {
                title: "Network Error".into(),
                message: truncate(msg, 80),
                hint: "Check backend connectivity".into(),
            },
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
