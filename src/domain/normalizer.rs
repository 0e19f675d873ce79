//! Candidate name normalization

use crate::types::DomainKey;

/// Default canonical extension
pub const DEFAULT_EXTENSION: &str = "com";

/// Turns raw candidate text into a [`DomainKey`].
///
/// Lowercases, strips one trailing canonical extension, drops everything
/// outside `[a-z0-9-]` and appends the extension again. Never fails: input
/// with no usable characters yields a key holding only the extension.
#[derive(Debug, Clone)]
pub struct DomainNormalizer {
    extension: String,
    suffix: String,
}

impl DomainNormalizer {
    /// Create a normalizer for the default `.com` extension
    pub fn new() -> Self {
        Self::with_extension(DEFAULT_EXTENSION)
    }

    /// Create a normalizer for another extension (with or without the dot)
    pub fn with_extension(extension: &str) -> Self {
        let extension = extension.trim().trim_start_matches('.').to_lowercase();
        let suffix = format!(".{}", extension);
        Self { extension, suffix }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn normalize(&self, raw: &str) -> DomainKey {
        let lowered = raw.to_lowercase();
        let name = lowered.strip_suffix(&self.suffix).unwrap_or(&lowered);

        let mut key: String = name
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
            .collect();
        key.push_str(&self.suffix);

        DomainKey::from_normalized(key)
    }

    pub fn normalize_all<S: AsRef<str>>(&self, raw: &[S]) -> Vec<DomainKey> {
        raw.iter().map(|s| self.normalize(s.as_ref())).collect()
    }
}

impl Default for DomainNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize with the default `.com` extension
pub fn normalize(raw: &str) -> DomainKey {
    DomainNormalizer::new().normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(normalize("Google").as_str(), "google.com");
        assert_eq!(normalize("google.com").as_str(), "google.com");
        assert_eq!(normalize("GOOGLE.COM").as_str(), "google.com");
        assert_eq!(normalize("my cool_site!").as_str(), "mycoolsite.com");
        assert_eq!(normalize("snag-sight").as_str(), "snag-sight.com");
    }

    #[test]
    fn test_only_one_extension_stripped() {
        assert_eq!(normalize("a.com.com").as_str(), "acom.com");
        assert_eq!(normalize("example.io").as_str(), "exampleio.com");
    }

    #[test]
    fn test_empty_and_invalid_input() {
        assert_eq!(normalize("").as_str(), ".com");
        assert_eq!(normalize("!!!").as_str(), ".com");
        assert_eq!(normalize(".com").as_str(), ".com");
        assert!(!normalize("").has_label());
    }

    #[test]
    fn test_idempotence() {
        let samples = [
            "",
            "Google",
            "a.com.com",
            "ÜBER.com",
            "İstanbul",
            "  spaced out  ",
            "xk3j9q7z1m",
            ".com.com",
            "dots.in.the.middle",
            "--hyphens--",
            "emoji🚀rocket",
        ];
        for raw in samples {
            let once = normalize(raw);
            let twice = normalize(once.as_str());
            assert_eq!(once, twice, "normalization not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_custom_extension() {
        let normalizer = DomainNormalizer::with_extension(".IO");
        assert_eq!(normalizer.extension(), "io");
        assert_eq!(normalizer.normalize("launch.io").as_str(), "launch.io");
        assert_eq!(normalizer.normalize("launch.com").as_str(), "launchcom.io");

        let keys = normalizer.normalize_all(&["a", "b.io"]);
        assert_eq!(keys[0].as_str(), "a.io");
        assert_eq!(keys[1].as_str(), "b.io");
    }
}
