//! Keyword routing for inbound messages.
//!
//! Rules are checked in order and the first keyword hit wins. Anything that
//! matches no rule is `General` and goes through retrieval and the model.

pub mod replies;

use serde::Serialize;

pub use replies::{BILLING_REPLY, CUTOFF_REPLY, OUTAGE_REPLY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Cutoff,
    Billing,
    Outage,
    General,
}

impl Intent {
    /// Fixed reply for routed intents; `None` for `General`.
    pub fn canned_reply(&self) -> Option<&'static str> {
        match self {
            Intent::Cutoff => Some(CUTOFF_REPLY),
            Intent::Billing => Some(BILLING_REPLY),
            Intent::Outage => Some(OUTAGE_REPLY),
            Intent::General => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentRule {
    pub intent: Intent,
    pub keywords: Vec<String>,
}

impl IntentRule {
    pub fn new<I, S>(intent: Intent, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            intent,
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct IntentRouter {
    rules: Vec<IntentRule>,
}

impl Default for IntentRouter {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl IntentRouter {
    pub fn new(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn classify(&self, message: &str) -> Intent {
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::General)
    }
}

pub fn default_rules() -> Vec<IntentRule> {
    vec![
        IntentRule::new(Intent::Cutoff, ["cut-off", "cutoff", "pamutol"]),
        IntentRule::new(Intent::Billing, ["bill", "payment", "balance"]),
        IntentRule::new(
            Intent::Outage,
            ["outage", "brownout", "no power", "power situation"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_wins_over_other_categories() {
        let router = IntentRouter::default();
        assert_eq!(
            router.classify("What's the cut-off date for Balamban?"),
            Intent::Cutoff
        );
        assert_eq!(
            router.classify("BILL payment and CUTOFF during the outage"),
            Intent::Cutoff
        );
        assert_eq!(router.classify("Kanus-a ang PAMUTOL?"), Intent::Cutoff);
    }

    #[test]
    fn billing_beats_outage() {
        let router = IntentRouter::default();
        assert_eq!(
            router.classify("Can I pay my bill during a brownout?"),
            Intent::Billing
        );
        assert_eq!(router.classify("What is my balance"), Intent::Billing);
    }

    #[test]
    fn outage_keywords() {
        let router = IntentRouter::default();
        assert_eq!(router.classify("No Power in Toledo"), Intent::Outage);
        assert_eq!(router.classify("power situation today?"), Intent::Outage);
    }

    #[test]
    fn unmatched_is_general() {
        let router = IntentRouter::default();
        assert_eq!(
            router.classify("How many kWh loss last month?"),
            Intent::General
        );
        assert_eq!(router.classify(""), Intent::General);
    }

    #[test]
    fn every_default_keyword_routes_to_its_rule() {
        let router = IntentRouter::default();
        for rule in router.rules() {
            for keyword in &rule.keywords {
                let message = format!("something about {} here", keyword.to_uppercase());
                assert_eq!(
                    router.classify(&message),
                    rule.intent,
                    "keyword {}",
                    keyword
                );
            }
        }
    }

    #[test]
    fn keywords_are_normalised() {
        let rule = IntentRule::new(Intent::Billing, ["  Invoice ", ""]);
        assert_eq!(rule.keywords, vec!["invoice".to_string()]);
    }

    #[test]
    fn only_general_has_no_canned_reply() {
        assert!(Intent::General.canned_reply().is_none());
        assert!(Intent::Cutoff
            .canned_reply()
            .unwrap()
            .contains("Balamban – 8th of the month"));
        let outage = Intent::Outage.canned_reply().unwrap();
        assert!(outage.contains("(032) 467-9-112"));
    }
}
