//! Password generation and strength assessment
//!
//! The scorer is an additive rubric: each criterion is checked on its own and
//! contributes a fixed number of points, with one feedback message for every
//! criterion the password misses. The generator draws uniformly from a fixed
//! alphabet and makes no strength promise of its own.

use rand::{thread_rng, Rng};

use crate::constants::{
    GENERATED_PASSWORD_LENGTH, PASSWORD_MIN_LENGTH, PASSWORD_RECOMMENDED_LENGTH,
    SECURE_ID_LENGTH,
};

/// Password character sets for generation
pub struct CharacterSets;

impl CharacterSets {
    pub const LOWERCASE: &'static str = "abcdefghijklmnopqrstuvwxyz";
    pub const UPPERCASE: &'static str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    pub const DIGITS: &'static str = "0123456789";
    pub const SYMBOLS: &'static str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

    /// Alphabet used by [`PasswordGenerator`]
    pub fn password_alphabet() -> String {
        [Self::UPPERCASE, Self::LOWERCASE, Self::DIGITS, Self::SYMBOLS].concat()
    }

    /// Alphabet used by [`generate_secure_id`]
    pub fn identifier_alphabet() -> String {
        [Self::UPPERCASE, Self::LOWERCASE, Self::DIGITS].concat()
    }
}

/// Points awarded per criterion
const POINTS_MIN_LENGTH: u8 = 20;
const POINTS_RECOMMENDED_LENGTH: u8 = 10;
const POINTS_LOWERCASE: u8 = 15;
const POINTS_UPPERCASE: u8 = 15;
const POINTS_DIGIT: u8 = 15;
const POINTS_SPECIAL: u8 = 25;
const POINTS_NO_REPEATS: u8 = 10;

const MAX_SCORE: u8 = 100;

/// Coarse strength label shown next to a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    /// Bucket a 0-100 score
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=29 => PasswordStrength::Weak,
            30..=59 => PasswordStrength::Fair,
            60..=79 => PasswordStrength::Good,
            _ => PasswordStrength::Strong,
        }
    }

    /// Get a descriptive name for the strength level
    pub fn name(&self) -> &'static str {
        match self {
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Fair => "Fair",
            PasswordStrength::Good => "Good",
            PasswordStrength::Strong => "Strong",
        }
    }
}

impl std::fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of scoring a password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordAssessment {
    /// Score clamped to 0-100
    pub score: u8,
    /// One message per unmet criterion, in rubric order
    pub feedback: Vec<String>,
}

impl PasswordAssessment {
    pub fn strength(&self) -> PasswordStrength {
        PasswordStrength::from_score(self.score)
    }

    /// True when every criterion was met
    pub fn is_perfect(&self) -> bool {
        self.feedback.is_empty()
    }
}

/// Password analyzer for strength assessment
pub struct PasswordAnalyzer;

impl PasswordAnalyzer {
    /// Score a password against the rubric
    pub fn assess(password: &str) -> PasswordAssessment {
        let mut score = 0u8;
        let mut feedback = Vec::new();

        let length = password.encode_utf16().count();
        score += Self::award(
            length >= PASSWORD_MIN_LENGTH,
            POINTS_MIN_LENGTH,
            "Use at least 8 characters",
            &mut feedback,
        );
        score += Self::award(
            length >= PASSWORD_RECOMMENDED_LENGTH,
            POINTS_RECOMMENDED_LENGTH,
            "Consider using 12+ characters for better security",
            &mut feedback,
        );

        score += Self::award(
            password.chars().any(|c| c.is_ascii_lowercase()),
            POINTS_LOWERCASE,
            "Include lowercase letters",
            &mut feedback,
        );
        score += Self::award(
            password.chars().any(|c| c.is_ascii_uppercase()),
            POINTS_UPPERCASE,
            "Include uppercase letters",
            &mut feedback,
        );
        score += Self::award(
            password.chars().any(|c| c.is_ascii_digit()),
            POINTS_DIGIT,
            "Include numbers",
            &mut feedback,
        );
        score += Self::award(
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
            POINTS_SPECIAL,
            "Include special characters",
            &mut feedback,
        );

        score += Self::award(
            !Self::has_repeated_run(password),
            POINTS_NO_REPEATS,
            "Avoid repeating characters",
            &mut feedback,
        );

        PasswordAssessment {
            score: score.min(MAX_SCORE),
            feedback,
        }
    }

    fn award(met: bool, points: u8, advice: &str, feedback: &mut Vec<String>) -> u8 {
        if met {
            points
        } else {
            feedback.push(advice.to_string());
            0
        }
    }

    /// Three or more identical UTF-16 units in a row
    ///
    /// Line terminators never count toward a run. The halves of a surrogate
    /// pair are separate units, so repeated astral characters do not form a
    /// run on their own.
    fn has_repeated_run(password: &str) -> bool {
        const TERMINATORS: [u16; 4] = [0x000A, 0x000D, 0x2028, 0x2029];

        let units: Vec<u16> = password.encode_utf16().collect();
        units
            .windows(3)
            .any(|w| w[0] == w[1] && w[1] == w[2] && !TERMINATORS.contains(&w[0]))
    }
}

/// Random password generator
pub struct PasswordGenerator;

impl PasswordGenerator {
    /// Generate a 16 character password with the thread-local RNG
    pub fn generate() -> String {
        Self::generate_with(&mut thread_rng())
    }

    /// Generate a 16 character password from the given RNG
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
        random_string(rng, &CharacterSets::password_alphabet(), GENERATED_PASSWORD_LENGTH)
    }
}

/// Generate a random alphanumeric identifier
///
/// A `length` of zero falls back to the default of 16.
pub fn generate_secure_id(length: usize) -> String {
    let length = if length == 0 { SECURE_ID_LENGTH } else { length };
    random_string(&mut thread_rng(), &CharacterSets::identifier_alphabet(), length)
}

fn random_string<R: Rng + ?Sized>(rng: &mut R, alphabet: &str, length: usize) -> String {
    let chars: Vec<char> = alphabet.chars().collect();
    (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}
