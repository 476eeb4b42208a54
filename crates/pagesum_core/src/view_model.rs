pub const TRIGGER_IDLE: &str = "Summarise Page";
pub const TRIGGER_BUSY: &str = "Summarising...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub trigger_enabled: bool,
    pub trigger_label: &'static str,
    pub body: ResultView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Ready,
    Progress(&'static str),
    /// Summary is final; translation still running.
    SummaryPendingTranslation { summary: String },
    Final {
        summary: String,
        translation: Option<String>,
        translation_error: Option<String>,
    },
    Failed { message: String },
    Notice { message: String },
}

impl ResultView {
    pub const STARTING: &'static str = "Starting...";
    pub const EXTRACTING: &'static str = "Extracting page content...";
    pub const SUMMARISING: &'static str = "Generating summary...";
    pub const TRANSLATING: &'static str = "Translating...";
}
