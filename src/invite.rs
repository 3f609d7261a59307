//! Invite data model
//!
//! A `GameInvite` is composed once by the sender, encoded into a link and
//! never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Number of entries on the prize wheel (and in a custom prize list)
pub const PRIZE_COUNT: usize = 6;

/// Display language of the invite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Zh];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Locale::En),
            "zh" => Some(Locale::Zh),
            _ => None,
        }
    }

    /// Unknown or missing codes fall back to English
    pub fn from_code_or_default(s: &str) -> Self {
        Self::from_code(s).unwrap_or_default()
    }
}

/// Which message bank and reply set the invite uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Apology,
    MissYou,
    Love,
    ThankYou,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Apology,
        Category::MissYou,
        Category::Love,
        Category::ThankYou,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Apology => "apology",
            Category::MissYou => "missyou",
            Category::Love => "love",
            Category::ThankYou => "thankyou",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "apology" => Some(Category::Apology),
            "missyou" => Some(Category::MissYou),
            "love" => Some(Category::Love),
            "thankyou" => Some(Category::ThankYou),
            _ => None,
        }
    }
}

/// A customized set of wheel prizes, always exactly six entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeList(pub [String; PRIZE_COUNT]);

impl PrizeList {
    /// Build from any sequence; `None` unless it has exactly six entries
    pub fn from_vec(prizes: Vec<String>) -> Option<Self> {
        let prizes: [String; PRIZE_COUNT] = prizes.try_into().ok()?;
        Some(Self(prizes))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// True when every entry matches the given defaults, in order
    pub fn matches(&self, defaults: &[&str]) -> bool {
        self.0.len() == defaults.len() && self.0.iter().zip(defaults).all(|(a, b)| a == b)
    }
}

/// Everything the recipient's page needs, carried in the link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GameInvite {
    pub sender: String,
    pub recipient: String,
    /// Free-text body ("being late", "the birthday gift", ...)
    pub message: String,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub category: Category,
    /// Only present when the sender changed the default prizes
    #[serde(default)]
    pub prizes: Option<PrizeList>,
}

impl GameInvite {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_prizes(mut self, prizes: PrizeList) -> Self {
        self.prizes = Some(prizes);
        self
    }

    /// The play page refuses invites without both names
    pub fn is_playable(&self) -> bool {
        !self.sender.trim().is_empty() && !self.recipient.trim().is_empty()
    }

    /// Wheel prize at `index`, falling back to the localized defaults
    pub fn prize(&self, index: usize) -> String {
        match &self.prizes {
            Some(list) => list.get(index).unwrap_or_default().to_string(),
            None => crate::i18n::default_prizes(self.locale)
                .get(index)
                .copied()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_codes() {
        assert_eq!(Locale::from_code_or_default("fr"), Locale::En);
        assert_eq!(Locale::from_code_or_default("zh"), Locale::Zh);
        assert_eq!(Category::from_code("birthday"), None);
        for cat in Category::ALL {
            assert_eq!(Category::from_code(cat.as_str()), Some(cat));
        }
    }

    #[test]
    fn test_prize_list_requires_six() {
        let five: Vec<String> = (0..5).map(|i| i.to_string()).collect();
        assert!(PrizeList::from_vec(five).is_none());
        let six: Vec<String> = (0..6).map(|i| i.to_string()).collect();
        let list = PrizeList::from_vec(six).unwrap();
        assert_eq!(list.get(5), Some("5"));
        assert_eq!(list.get(6), None);
    }

    #[test]
    fn test_prize_fallback_to_defaults() {
        let invite = GameInvite::new("Alex", "Sam", "being late");
        assert_eq!(invite.prize(0), crate::i18n::default_prizes(Locale::En)[0]);
        assert!(invite.is_playable());
        assert!(!GameInvite::new("", "Sam", "x").is_playable());
    }
}
