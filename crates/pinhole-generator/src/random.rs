use crate::Generator;
use pinhole_core::ShortCode;
use rand::Rng;
use thiserror::Error;

/// URL-safe alphabet: `[A-Za-z0-9_-]`.
pub const URL_SAFE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

pub const DEFAULT_CODE_LENGTH: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("code length must be at least 1")]
    ZeroLength,
    #[error("alphabet must not be empty")]
    EmptyAlphabet,
}

/// Generates fixed-length codes by sampling uniformly from an alphabet.
///
/// With the default settings the code space is 64^5 (about 1.07e9), so
/// collisions are rare but possible; callers retry on conflict.
#[derive(Debug, Clone)]
pub struct RandomGenerator {
    length: usize,
    alphabet: &'static [u8],
}

impl RandomGenerator {
    /// Every generated code is non-empty and drawn only from `alphabet`.
    pub fn new(length: usize, alphabet: &'static [u8]) -> Result<Self, GeneratorError> {
        if length == 0 {
            return Err(GeneratorError::ZeroLength);
        }
        if alphabet.is_empty() {
            return Err(GeneratorError::EmptyAlphabet);
        }

        Ok(Self { length, alphabet })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn alphabet(&self) -> &'static [u8] {
        self.alphabet
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_CODE_LENGTH,
            alphabet: URL_SAFE_ALPHABET,
        }
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let mut rng = rand::rng();
        let code: String = (0..self.length)
            .map(|_| self.alphabet[rng.random_range(0..self.alphabet.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_codes_are_five_url_safe_chars() {
        let generator = RandomGenerator::default();

        for _ in 0..200 {
            let code = generator.generate();
            assert_eq!(code.as_str().len(), 5);
            assert!(code
                .as_str()
                .bytes()
                .all(|b| URL_SAFE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn custom_length_and_alphabet() {
        let generator = RandomGenerator::new(8, b"ab").unwrap();

        let code = generator.generate();
        assert_eq!(code.as_str().len(), 8);
        assert!(code.as_str().chars().all(|c| c == 'a' || c == 'b'));
    }

    #[test]
    fn degenerate_settings_are_rejected() {
        assert_eq!(
            RandomGenerator::new(0, URL_SAFE_ALPHABET).unwrap_err(),
            GeneratorError::ZeroLength
        );
        assert_eq!(
            RandomGenerator::new(5, b"").unwrap_err(),
            GeneratorError::EmptyAlphabet
        );
    }

    #[test]
    fn single_symbol_alphabet() {
        let generator = RandomGenerator::new(1, b"x").unwrap();
        assert_eq!(generator.generate().as_str(), "x");
    }

    #[test]
    fn codes_vary() {
        let generator = RandomGenerator::default();
        let codes: HashSet<_> = (0..100).map(|_| generator.generate()).collect();
        // 100 draws from ~1e9 codes; a handful of duplicates would already be suspicious.
        assert!(codes.len() > 95);
    }
}
