/// State of the receipt file input: its value, whether it is marked as
/// errored, and the message shown next to it. At most one message exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    value: String,
    errored: bool,
    error_message: Option<String>,
}

impl FileInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn is_errored(&self) -> bool {
        self.errored
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Show `msg` next to the input, replacing any message already there.
    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.error_message = Some(msg.into());
        self.errored = true;
    }

    pub fn remove_error(&mut self) {
        self.error_message = None;
        self.errored = false;
    }
}
