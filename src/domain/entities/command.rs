/// Trigger word of the sync command
pub const SYNC_TRIGGER: &str = "partyparrotssync";

/// A slash command exposed to chat users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlashCommand {
    pub trigger: String,
    pub description: String,
    pub auto_complete: bool,
}

impl SlashCommand {
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            description: String::new(),
            auto_complete: true,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Check whether a raw command line (`/trigger args...`) invokes this command
    pub fn matches(&self, input: &str) -> bool {
        input
            .trim()
            .trim_start_matches('/')
            .split_whitespace()
            .next()
            .map(|word| word.eq_ignore_ascii_case(&self.trigger))
            .unwrap_or(false)
    }
}

impl Default for SlashCommand {
    fn default() -> Self {
        Self::new(SYNC_TRIGGER).with_description("Sync Party Parrots emojis")
    }
}

/// Who invoked a command, and where the replies go
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub user_id: String,
    pub channel_id: String,
    pub root_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cmd = SlashCommand::default();
        assert_eq!(cmd.trigger, "partyparrotssync");
        assert!(cmd.auto_complete);
    }

    #[test]
    fn test_matches() {
        let cmd = SlashCommand::default();
        assert!(cmd.matches("/partyparrotssync"));
        assert!(cmd.matches("/PartyParrotsSync now"));
        assert!(!cmd.matches("/partyparrots"));
        assert!(!cmd.matches(""));
    }
}
