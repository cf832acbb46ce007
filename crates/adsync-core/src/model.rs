//! Entity model
//!
//! Value records for the three levels of the advertising hierarchy as
//! loaded from CSV. Equality is identity-based rather than full-field:
//! two campaigns with the same name but different budgets are duplicates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default campaign budget in micro units (0.10 in account currency)
pub const DEFAULT_CAMPAIGN_BUDGET_MICROS: i64 = 100_000;

/// Default ad group CPC bid in micro units
pub const DEFAULT_AD_GROUP_BID_MICROS: i64 = 100_000;

/// A campaign to create
#[derive(Debug, Clone)]
pub struct Campaign {
    /// Campaign name (sanitized)
    pub name: String,
    /// Daily budget in micro units
    pub budget: i64,
}

impl Campaign {
    /// Create a campaign with the default budget
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            budget: DEFAULT_CAMPAIGN_BUDGET_MICROS,
        }
    }

    /// Set the budget
    pub fn with_budget(mut self, budget: i64) -> Self {
        self.budget = budget;
        self
    }
}

impl PartialEq for Campaign {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Campaign {}

/// An ad group to create under a campaign
#[derive(Debug, Clone)]
pub struct AdGroup {
    /// Ad group name (sanitized)
    pub name: String,
    /// Manual CPC bid in micro units
    pub bid_amount: i64,
    /// Name of the parent campaign
    pub campaign_name: String,
}

impl AdGroup {
    /// Create an ad group with the default bid
    pub fn new(name: impl Into<String>, campaign_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bid_amount: DEFAULT_AD_GROUP_BID_MICROS,
            campaign_name: campaign_name.into(),
        }
    }

    /// Set the bid amount
    pub fn with_bid_amount(mut self, bid_amount: i64) -> Self {
        self.bid_amount = bid_amount;
        self
    }
}

impl PartialEq for AdGroup {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for AdGroup {}

/// Keyword match type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchType {
    /// Broad match
    Broad,
    /// Phrase match
    Phrase,
    /// Exact match
    Exact,
    /// Broad match modifier (`+word +word`), sent as a broad keyword
    Bpe,
}

impl MatchType {
    /// All match types, in the order the targeting map is consulted
    pub const ALL: [MatchType; 4] = [
        MatchType::Broad,
        MatchType::Phrase,
        MatchType::Exact,
        MatchType::Bpe,
    ];

    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Broad => "BROAD",
            MatchType::Phrase => "PHRASE",
            MatchType::Exact => "EXACT",
            MatchType::Bpe => "BPE",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BROAD" => Ok(MatchType::Broad),
            "PHRASE" => Ok(MatchType::Phrase),
            "EXACT" => Ok(MatchType::Exact),
            "BPE" => Ok(MatchType::Bpe),
            other => Err(crate::Error::invalid_input(format!(
                "unknown match type '{}'",
                other
            ))),
        }
    }
}

/// A keyword criterion to create under an ad group
#[derive(Debug, Clone)]
pub struct Keyword {
    /// Keyword text (sanitized)
    pub text: String,
    /// Match type
    pub targeting: MatchType,
    /// Name of the parent ad group
    pub ad_group_name: String,
}

impl Keyword {
    /// Create a keyword
    pub fn new(
        text: impl Into<String>,
        targeting: MatchType,
        ad_group_name: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            targeting,
            ad_group_name: ad_group_name.into(),
        }
    }

    /// Text as stored by the remote API
    ///
    /// BPE keywords are rewritten into broad-modified form.
    pub fn remote_text(&self) -> String {
        match self.targeting {
            MatchType::Bpe => broad_modified(&self.text),
            _ => self.text.clone(),
        }
    }

    /// Match type as sent to the remote API
    pub fn remote_match_type(&self) -> MatchType {
        match self.targeting {
            MatchType::Bpe => MatchType::Broad,
            other => other,
        }
    }
}

impl PartialEq for Keyword {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.targeting == other.targeting
    }
}

impl Eq for Keyword {}

/// Drop the broad-modifier `+` in front of each word
///
/// `+super +keyword` becomes `super keyword`; other text is unchanged.
pub fn without_broad_modifiers(text: &str) -> String {
    text.split(' ')
        .map(|word| word.strip_prefix('+').unwrap_or(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rewrite a keyword into broad-modified form
///
/// `super keyword` becomes `+super +keyword`.
pub fn broad_modified(text: &str) -> String {
    text.split(' ')
        .map(|word| format!("+{}", word))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_equality_ignores_budget() {
        let a = Campaign::new("Shoes");
        let b = Campaign::new("Shoes").with_budget(5_000_000);
        assert_eq!(a, b);
        assert_ne!(a, Campaign::new("Boots"));
    }

    #[test]
    fn ad_group_equality_ignores_campaign() {
        let a = AdGroup::new("Running", "Shoes");
        let b = AdGroup::new("Running", "Sport").with_bid_amount(1);
        assert_eq!(a, b);
    }

    #[test]
    fn keyword_equality_uses_text_and_targeting() {
        let a = Keyword::new("red shoes", MatchType::Exact, "Running");
        let b = Keyword::new("red shoes", MatchType::Exact, "Trail");
        let c = Keyword::new("red shoes", MatchType::Phrase, "Running");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn match_type_round_trips_through_name() {
        for match_type in MatchType::ALL {
            assert_eq!(match_type.as_str().parse::<MatchType>().unwrap(), match_type);
        }
        assert!("broad".parse::<MatchType>().is_err());
    }

    #[test]
    fn broad_modified_prefixes_each_word() {
        assert_eq!(broad_modified("super keyword"), "+super +keyword");
        assert_eq!(broad_modified("single"), "+single");
    }

    #[test]
    fn broad_modifiers_are_dropped_per_word() {
        assert_eq!(without_broad_modifiers("+red +shoes"), "red shoes");
        assert_eq!(without_broad_modifiers("red shoes"), "red shoes");
        assert_eq!(without_broad_modifiers("c++ +guide"), "c++ guide");
    }

    #[test]
    fn bpe_keyword_is_sent_as_broad() {
        let keyword = Keyword::new("red shoes", MatchType::Bpe, "Running");
        assert_eq!(keyword.remote_text(), "+red +shoes");
        assert_eq!(keyword.remote_match_type(), MatchType::Broad);

        let exact = Keyword::new("red shoes", MatchType::Exact, "Running");
        assert_eq!(exact.remote_text(), "red shoes");
        assert_eq!(exact.remote_match_type(), MatchType::Exact);
    }
}
