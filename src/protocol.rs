use serde::{Deserialize, Serialize};

/// Prefix that routes a command to the cheat path instead of the dispatcher.
pub const CHEAT_PREFIX: char = '!';

// ── Inbound ──────────────────────────────────────────────────────────

/// One line from a gateway: `"<player> <command> [args...]"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundCommand {
    pub player: String,
    pub text: String,
}

impl InboundCommand {
    pub fn new(player: &str, text: &str) -> Self {
        Self {
            player: player.to_string(),
            text: text.to_string(),
        }
    }

    /// Split raw input into player identity and command text. Returns
    /// `None` for blank input; a lone name yields empty command text.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let (player, text) = raw.split_once(char::is_whitespace).unwrap_or((raw, ""));
        Some(Self::new(player, text.trim()))
    }

    pub fn is_cheat(&self) -> bool {
        self.text.starts_with(CHEAT_PREFIX)
    }
}

// ── Outbound ─────────────────────────────────────────────────────────

/// Response text addressed to a single player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub player: String,
    pub text: String,
}

impl OutboundMessage {
    pub fn new(player: &str, text: impl Into<String>) -> Self {
        Self {
            player: player.to_string(),
            text: text.into(),
        }
    }
}

// ── Fixed templates ──────────────────────────────────────────────────

pub fn player_not_found(player_name: &str) -> String {
    format!("Player {} not found in these players 🤷‍♂️ Have you joined?", player_name)
}

pub const NOT_AUTHORIZED: &str = "You are not authorized to use this command.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_player_from_command() {
        let cmd = InboundCommand::parse("Tester attack rusty goblin").unwrap();
        assert_eq!(cmd.player, "Tester");
        assert_eq!(cmd.text, "attack rusty goblin");
        assert!(!cmd.is_cheat());
    }

    #[test]
    fn parse_handles_name_only_and_blank_lines() {
        let cmd = InboundCommand::parse("  Tester  ").unwrap();
        assert_eq!(cmd.player, "Tester");
        assert_eq!(cmd.text, "");
        assert!(InboundCommand::parse("   ").is_none());
    }

    #[test]
    fn bang_prefix_marks_a_cheat() {
        assert!(InboundCommand::parse("blacklabel !heal").unwrap().is_cheat());
    }

    #[test]
    fn outbound_serializes_as_json_object() {
        let json = serde_json::to_string(&OutboundMessage::new("Tester", "You move north.\n")).unwrap();
        assert_eq!(json, r#"{"player":"Tester","text":"You move north.\n"}"#);
    }

    #[test]
    fn player_not_found_names_the_player() {
        assert_eq!(
            player_not_found("Ghost"),
            "Player Ghost not found in these players 🤷‍♂️ Have you joined?"
        );
    }
}
