// Domain errors
use thiserror::Error;

/// Problems in how widgets and pages are wired together. Always fatal at startup.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("widget id `{0}` is registered more than once")]
    DuplicateWidget(String),

    #[error("page `{page}` references unregistered widget `{widget}`")]
    UnknownWidget { page: String, widget: String },

    #[error("page path `{0}` is declared more than once")]
    DuplicatePage(String),

    #[error("path `{0}` must start with `/` and stay clear of `/api/`, `/healthz` and the static assets")]
    ReservedPath(String),

    #[error("widget `{widget}` binds output `{output}` more than once")]
    DuplicateOutput { widget: String, output: String },

    #[error("widget `{widget}` declares control `{control}` more than once")]
    DuplicateControl { widget: String, control: String },

    #[error("output `{output}` of widget `{widget}` depends on undeclared control `{control}`")]
    UndeclaredControl {
        widget: String,
        output: String,
        control: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DashboardError {
    #[error("conflicting values for cell ({row}, {column}): {existing} vs {conflicting}")]
    DataIntegrity {
        row: String,
        column: String,
        existing: f64,
        conflicting: f64,
    },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("widget `{0}` not found")]
    WidgetNotFound(String),

    #[error("widget `{widget}` has no control `{control}`")]
    UnknownControl { widget: String, control: String },

    #[error("control `{control}` expects {expected}")]
    InvalidControlValue {
        control: String,
        expected: &'static str,
    },

    #[error("a time series needs at least one point")]
    EmptySeries,

    #[error("malformed request: {0}")]
    MalformedRequest(String),
}
