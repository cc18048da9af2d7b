/// Presentation settings of an interactive session.
///
/// ```
/// use cmdshell::ShellConfig;
/// let config = ShellConfig::default().with_prompt("db> ").with_banner(None);
/// assert_eq!(config.prompt, "db> ");
/// assert_eq!(config.continuation_prompt, "<> ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Prompt shown when a new logical line starts.
    pub prompt: String,
    /// Prompt shown while a line ending in `\` is being continued.
    pub continuation_prompt: String,
    /// Printed when the interactive loop starts.
    pub banner: Option<String>,
    /// Printed when the interactive loop ends.
    pub farewell: Option<String>,
    /// Word that lists the registry instead of running a command.
    pub help_keyword: String,
    /// Keep an in-memory history for the line editor. Never written to disk.
    pub history: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "[] ".to_string(),
            continuation_prompt: "<> ".to_string(),
            banner: Some("Command processor initialized".to_string()),
            farewell: Some("Goodbye".to_string()),
            help_keyword: "help".to_string(),
            history: true,
        }
    }
}

impl ShellConfig {
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_continuation_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.continuation_prompt = prompt.into();
        self
    }

    pub fn with_banner(mut self, banner: Option<String>) -> Self {
        self.banner = banner;
        self
    }

    pub fn with_farewell(mut self, farewell: Option<String>) -> Self {
        self.farewell = farewell;
        self
    }

    pub fn with_help_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.help_keyword = keyword.into();
        self
    }

    pub fn with_history(mut self, history: bool) -> Self {
        self.history = history;
        self
    }

    /// Drops banner and farewell, for scripted use.
    pub fn quiet(self) -> Self {
        self.with_banner(None).with_farewell(None)
    }

    /// The hint printed after a line that contained resolution errors.
    pub fn help_hint(&self) -> String {
        format!("type \"{}\" for help", self.help_keyword)
    }
}
