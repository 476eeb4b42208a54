pub const READY_TEXT: &str = "No summary yet.";
pub const SUMMARY_HEADING: &str = "Summary";
pub const TRANSLATION_HEADING: &str = "中文";
pub const ERROR_PREFIX: &str = "Error: ";
pub const RULE: &str = "----";
