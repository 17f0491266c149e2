//! CLDR cardinal plural rules for the cultures the catalogs are written in.

/// Cardinal plural category selected by a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "zero" => Some(Self::Zero),
            "one" => Some(Self::One),
            "two" => Some(Self::Two),
            "few" => Some(Self::Few),
            "many" => Some(Self::Many),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Few => "few",
            Self::Many => "many",
            Self::Other => "other",
        }
    }
}

/// Plural rules of a culture (the language part of a locale).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRules {
    /// `one` for exactly 1 (English, Spanish, ...).
    English,
    /// `one` when the integer part is 0 or 1 (Portuguese).
    Portuguese,
    /// Every number is `other`.
    Invariant,
}

impl PluralRules {
    /// Rules for a culture code such as `en` or `pt`.
    pub fn for_culture(culture: &str) -> Self {
        match culture {
            "en" | "es" | "de" | "it" | "nl" => Self::English,
            "pt" => Self::Portuguese,
            _ => Self::Invariant,
        }
    }

    pub fn category(&self, n: f64) -> PluralCategory {
        let n = n.abs();
        let is_integer = n.fract() == 0.0;
        match self {
            Self::English if is_integer && n == 1.0 => PluralCategory::One,
            Self::Portuguese if n.trunc() <= 1.0 => PluralCategory::One,
            _ => PluralCategory::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_rules() {
        let rules = PluralRules::for_culture("en");
        assert_eq!(rules.category(1.0), PluralCategory::One);
        assert_eq!(rules.category(0.0), PluralCategory::Other);
        assert_eq!(rules.category(2.0), PluralCategory::Other);
        assert_eq!(rules.category(1.5), PluralCategory::Other);
    }

    #[test]
    fn test_portuguese_rules() {
        let rules = PluralRules::for_culture("pt");
        assert_eq!(rules.category(0.0), PluralCategory::One);
        assert_eq!(rules.category(1.0), PluralCategory::One);
        assert_eq!(rules.category(1.5), PluralCategory::One);
        assert_eq!(rules.category(2.0), PluralCategory::Other);
    }

    #[test]
    fn test_unknown_culture_is_invariant() {
        let rules = PluralRules::for_culture("xx");
        assert_eq!(rules, PluralRules::Invariant);
        assert_eq!(rules.category(1.0), PluralCategory::Other);
    }
}
