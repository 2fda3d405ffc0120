/// Password strength heuristic for the sign-up meter
///
/// Display only; enforcement lives in the validation rules.

/// Score a password 0..=5: one point each for length >= 6, length >= 10,
/// an uppercase letter, a digit, and a non-alphanumeric character.
pub fn strength(password: &str) -> u8 {
    if password.is_empty() {
        return 0;
    }
    let mut score = 0u8;

    let len = password.chars().count();
    if len >= 6 {
        score += 1;
    }
    if len >= 10 {
        score += 1;
    }

    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }

    score.min(5)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLabel {
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=1 => StrengthLabel::Weak,
            2..=3 => StrengthLabel::Medium,
            _ => StrengthLabel::Strong,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Medium => "Medium",
            StrengthLabel::Strong => "Strong",
        }
    }
}
