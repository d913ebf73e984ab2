//! Keyword-based category inference for task prompts

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::EconomyError;
use crate::state::Category;

/// Keyword table, checked in order; the first category with a hit wins.
pub const CATEGORY_KEYWORDS: [(Category, &[&str]); 4] = [
    (
        Category::Development,
        &["code", "api", "contract", "backend", "frontend", "integration", "debug"],
    ),
    (
        Category::Research,
        &["research", "analyze", "report", "trend", "market", "review"],
    ),
    (
        Category::DataMining,
        &["data", "scrape", "dataset", "extract", "pipeline", "etl"],
    ),
    (
        Category::ContentGen,
        &["content", "write", "post", "summary", "copy", "article"],
    ),
];

/// Category used when no keyword matches
pub const DEFAULT_CATEGORY: Category = Category::Research;

/// Case-insensitive substring match against [`CATEGORY_KEYWORDS`].
///
/// ```
/// use agentic_economy::state::Category;
/// use agentic_economy::utils::classifier::infer_category;
///
/// assert_eq!(infer_category("Fix the API integration"), Category::Development);
/// assert_eq!(infer_category("hello"), Category::Research);
/// ```
pub fn infer_category(prompt: &str) -> Category {
    let lowered = prompt.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Either classify the prompt or use the given category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryChoice {
    #[default]
    Auto,
    Explicit(Category),
}

impl CategoryChoice {
    pub fn resolve(&self, prompt: &str) -> Category {
        match self {
            CategoryChoice::Auto => infer_category(prompt),
            CategoryChoice::Explicit(category) => *category,
        }
    }
}

impl fmt::Display for CategoryChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryChoice::Auto => f.write_str("AUTO"),
            CategoryChoice::Explicit(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryChoice {
    type Err = EconomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            Ok(CategoryChoice::Auto)
        } else {
            s.parse().map(CategoryChoice::Explicit)
        }
    }
}

impl Serialize for CategoryChoice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CategoryChoice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_category_keyword() {
        assert_eq!(infer_category("debug my backend"), Category::Development);
        assert_eq!(infer_category("Market trend report"), Category::Research);
        assert_eq!(infer_category("scrape product listings"), Category::DataMining);
        assert_eq!(infer_category("Write a blog article"), Category::ContentGen);
    }

    #[test]
    fn test_earlier_category_wins() {
        // "api" (development) beats "data" (data mining)
        assert_eq!(infer_category("build an api for data"), Category::Development);
        // "review" (research) beats "write"
        assert_eq!(infer_category("write a review"), Category::Research);
    }

    #[test]
    fn test_substring_matching() {
        // "contract" inside "contractor", "post" inside "compost"
        assert_eq!(infer_category("find a contractor"), Category::Development);
        assert_eq!(infer_category("compost tips"), Category::ContentGen);
    }

    #[test]
    fn test_default_category() {
        assert_eq!(infer_category(""), DEFAULT_CATEGORY);
        assert_eq!(infer_category("hello there"), Category::Research);
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!("AUTO".parse::<CategoryChoice>().unwrap(), CategoryChoice::Auto);
        assert_eq!("auto".parse::<CategoryChoice>().unwrap(), CategoryChoice::Auto);
        assert_eq!(
            "DATA_MINING".parse::<CategoryChoice>().unwrap(),
            CategoryChoice::Explicit(Category::DataMining)
        );
        assert!("SPORTS".parse::<CategoryChoice>().is_err());
    }

    #[test]
    fn test_explicit_choice_ignores_prompt() {
        let choice = CategoryChoice::Explicit(Category::ContentGen);
        assert_eq!(choice.resolve("debug the api"), Category::ContentGen);
        assert_eq!(CategoryChoice::Auto.resolve("debug the api"), Category::Development);
    }
}
