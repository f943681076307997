// SPDX-FileCopyrightText: 2026 Cofre Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Password strength estimation.
//!
//! Entropy is the naive charset model: length times log2 of the combined
//! size of the character classes present. That overestimates real-world
//! strength for dictionary words, which is why [`analyze`] runs pattern
//! checks alongside the number.

const ASCII_SYMBOLS: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Strength bucket derived from entropy bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLabel {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl StrengthLabel {
    pub fn from_entropy(bits: f64) -> Self {
        if bits < 28.0 {
            Self::VeryWeak
        } else if bits < 36.0 {
            Self::Weak
        } else if bits < 60.0 {
            Self::Moderate
        } else if bits < 80.0 {
            Self::Strong
        } else {
            Self::VeryStrong
        }
    }

    /// 0..=4 score for UI meters.
    pub fn score(self) -> u8 {
        match self {
            Self::VeryWeak => 0,
            Self::Weak => 1,
            Self::Moderate => 2,
            Self::Strong => 3,
            Self::VeryStrong => 4,
        }
    }
}

impl std::fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::VeryWeak => "very weak",
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
            Self::VeryStrong => "very strong",
        };
        f.write_str(label)
    }
}

fn charset_size(password: &str) -> u32 {
    let mut size = 0;
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        size += 26;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        size += 26;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        size += 10;
    }
    if password.chars().any(|c| ASCII_SYMBOLS.contains(c)) {
        size += 32;
    }
    if size == 0 {
        // Non-ASCII content; assume a wide pool.
        size = 128;
    }
    size
}

/// Entropy in bits under the charset model.
pub fn entropy(password: &str) -> f64 {
    if password.is_empty() {
        return 0.0;
    }
    password.chars().count() as f64 * f64::from(charset_size(password)).log2()
}

/// Human-readable crack-time estimate at ten billion guesses per second.
pub fn estimate_crack_time(bits: f64) -> String {
    const GUESSES_PER_SEC: f64 = 10_000_000_000.0;
    const YEAR: f64 = 86_400.0 * 365.0;

    if bits <= 0.0 {
        return "instant".to_string();
    }
    let seconds = bits.exp2() / GUESSES_PER_SEC;
    if !seconds.is_finite() {
        return "longer than the age of the universe".to_string();
    }

    if seconds < 1.0 {
        "instant".to_string()
    } else if seconds < 60.0 {
        format!("{seconds:.0} seconds")
    } else if seconds < 3_600.0 {
        format!("{:.0} minutes", seconds / 60.0)
    } else if seconds < 86_400.0 {
        format!("{:.0} hours", seconds / 3_600.0)
    } else if seconds < YEAR {
        format!("{:.0} days", seconds / 86_400.0)
    } else if seconds < YEAR * 1_000.0 {
        format!("{:.0} years", seconds / YEAR)
    } else if seconds < YEAR * 1_000_000.0 {
        format!("{:.0} thousand years", seconds / (YEAR * 1_000.0))
    } else if seconds < YEAR * 1_000_000_000.0 {
        format!("{:.0} million years", seconds / (YEAR * 1_000_000.0))
    } else {
        "longer than the age of the universe".to_string()
    }
}

/// Full strength report for one candidate password.
#[derive(Debug, Clone)]
pub struct StrengthReport {
    pub entropy_bits: f64,
    pub label: StrengthLabel,
    pub crack_time: String,
    pub feedback: Vec<String>,
}

/// Analyze a password: entropy, bucket, crack time, and actionable
/// feedback on weaknesses.
pub fn analyze(password: &str) -> StrengthReport {
    let bits = entropy(password);
    StrengthReport {
        entropy_bits: bits,
        label: StrengthLabel::from_entropy(bits),
        crack_time: estimate_crack_time(bits),
        feedback: feedback(password),
    }
}

fn feedback(password: &str) -> Vec<String> {
    let mut notes = Vec::new();
    let len = password.chars().count();

    if len < 8 {
        notes.push("Password is very short; use at least 12 characters.".to_string());
    } else if len < 12 {
        notes.push("Consider using at least 12 characters.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        notes.push("Add uppercase letters.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        notes.push("Add lowercase letters.".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        notes.push("Add digits.".to_string());
    }
    if !password.chars().any(|c| ASCII_SYMBOLS.contains(c)) {
        notes.push("Add symbols (!@#$%...).".to_string());
    }

    const COMMON_PATTERNS: &[&str] = &[
        "12345", "qwerty", "password", "abcdef", "111111", "admin", "letmein", "welcome",
        "monkey", "dragon",
    ];
    let lower = password.to_lowercase();
    if let Some(pattern) = COMMON_PATTERNS.iter().find(|p| lower.contains(**p)) {
        notes.push(format!("Avoid common patterns like '{pattern}'."));
    }

    if has_triple_repeat(password) {
        notes.push("Avoid repeating the same character more than twice in a row.".to_string());
    }
    if has_ascending_run(password) {
        notes.push("Avoid runs of consecutive characters (abc, 123).".to_string());
    }

    if notes.is_empty() {
        notes.push("Looks strong.".to_string());
    }
    notes
}

fn has_triple_repeat(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

fn has_ascending_run(password: &str) -> bool {
    let codes: Vec<u32> = password.chars().map(u32::from).collect();
    codes
        .windows(3)
        .any(|w| w[0] + 1 == w[1] && w[1] + 1 == w[2])
}
