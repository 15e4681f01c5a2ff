//! Headshot generation prompts: style suffixes, request validation and
//! placeholder output.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Shortest accepted user prompt, in characters, after trimming.
pub const MIN_PROMPT_CHARS: usize = 10;

/// Fewest images a single generation may request.
pub const MIN_IMAGES_PER_GENERATION: u32 = 1;

/// Most images a single generation may request.
pub const MAX_IMAGES_PER_GENERATION: u32 = 8;

/// Image count used when a request does not specify one.
pub const DEFAULT_IMAGES_PER_GENERATION: u32 = 4;

/// Base URL of the placeholder images returned when inference fails.
pub const PLACEHOLDER_IMAGE_BASE: &str = "https://placehold.co/512x512/png";

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Visual style appended to the user's prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleType {
    #[default]
    Professional,
    Casual,
    Creative,
}

impl StyleType {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleType::Professional => "professional",
            StyleType::Casual => "casual",
            StyleType::Creative => "creative",
        }
    }

    /// Parse a style name, case-insensitively.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "professional" => Ok(StyleType::Professional),
            "casual" => Ok(StyleType::Casual),
            "creative" => Ok(StyleType::Creative),
            other => Err(CoreError::Validation(format!(
                "Unknown style type '{other}'. Expected professional, casual or creative"
            ))),
        }
    }

    /// Fixed text appended to the user's prompt for this style.
    pub fn suffix(self) -> &'static str {
        match self {
            StyleType::Professional => {
                ", professional corporate headshot, business attire, studio lighting, \
                 neutral background, sharp focus, high resolution"
            }
            StyleType::Casual => {
                ", casual portrait, natural daylight, relaxed expression, outdoor setting, \
                 soft background blur"
            }
            StyleType::Creative => {
                ", creative artistic portrait, dramatic lighting, bold colors, \
                 editorial composition, cinematic style"
            }
        }
    }
}

/// Combine the user's prompt with the style suffix.
pub fn styled_prompt(prompt: &str, style: StyleType) -> String {
    format!("{}{}", prompt.trim(), style.suffix())
}

/// Validate a generation request before any network call is made.
///
/// The prompt must be at least [`MIN_PROMPT_CHARS`] characters after
/// trimming and `num_images` must fall in
/// [`MIN_IMAGES_PER_GENERATION`]..=[`MAX_IMAGES_PER_GENERATION`].
pub fn validate_generation(prompt: &str, num_images: u32) -> Result<(), CoreError> {
    if prompt.trim().chars().count() < MIN_PROMPT_CHARS {
        return Err(CoreError::Validation(format!(
            "Prompt must be at least {MIN_PROMPT_CHARS} characters long"
        )));
    }
    if !(MIN_IMAGES_PER_GENERATION..=MAX_IMAGES_PER_GENERATION).contains(&num_images) {
        return Err(CoreError::Validation(format!(
            "Number of images must be between {MIN_IMAGES_PER_GENERATION} and \
             {MAX_IMAGES_PER_GENERATION}"
        )));
    }
    Ok(())
}

/// Placeholder image URLs substituted for a failed inference call.
pub fn placeholder_image_urls(count: u32, style: StyleType) -> Vec<String> {
    (1..=count)
        .map(|i| format!("{PLACEHOLDER_IMAGE_BASE}?text={}+headshot+{i}", style.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_suffix_is_appended() {
        let p = styled_prompt("  a friendly engineer  ", StyleType::Casual);
        assert!(p.starts_with("a friendly engineer, casual portrait"));
    }

    #[test]
    fn style_parse_is_case_insensitive() {
        assert_eq!(StyleType::parse("Creative").unwrap(), StyleType::Creative);
        assert!(StyleType::parse("vintage").is_err());
        assert_eq!(StyleType::default(), StyleType::Professional);
    }

    #[test]
    fn short_prompt_rejected() {
        assert!(validate_generation("too short", 4).is_err());
        assert!(validate_generation("  123456789  ", 4).is_err());
        assert!(validate_generation("1234567890", 4).is_ok());
    }

    #[test]
    fn image_count_bounds() {
        let prompt = "a confident portrait";
        assert!(validate_generation(prompt, 0).is_err());
        assert!(validate_generation(prompt, 1).is_ok());
        assert!(validate_generation(prompt, 8).is_ok());
        assert!(validate_generation(prompt, 9).is_err());
    }

    #[test]
    fn placeholders_match_count() {
        let urls = placeholder_image_urls(3, StyleType::Professional);
        assert_eq!(urls.len(), 3);
        assert!(urls[2].ends_with("professional+headshot+3"));
    }
}
