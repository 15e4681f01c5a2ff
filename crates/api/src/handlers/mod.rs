pub mod account;
pub mod astria;
pub mod models;
pub mod notifications;
pub mod reactions;

use headshots_core::error::CoreError;
use headshots_core::prompt::{validate_generation, StyleType, DEFAULT_IMAGES_PER_GENERATION};

/// Resolve the optional style and image count of a generation request and
/// validate the prompt, before anything is sent to Astria.
pub(crate) fn generation_params(
    prompt: &str,
    style_type: Option<&str>,
    num_images: Option<u32>,
) -> Result<(StyleType, u32), CoreError> {
    let style = match style_type.map(str::trim).filter(|s| !s.is_empty()) {
        Some(name) => StyleType::parse(name)?,
        None => StyleType::default(),
    };
    let num_images = num_images.unwrap_or(DEFAULT_IMAGES_PER_GENERATION);
    validate_generation(prompt, num_images)?;
    Ok((style, num_images))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn defaults_to_professional_and_four_images() {
        let (style, n) = generation_params("a calm portrait in a studio", None, None).unwrap();
        assert_eq!(style, StyleType::Professional);
        assert_eq!(n, 4);
    }

    #[test]
    fn blank_style_uses_default() {
        let (style, _) = generation_params("a calm portrait in a studio", Some("  "), Some(2)).unwrap();
        assert_eq!(style, StyleType::Professional);
    }

    #[test]
    fn rejects_unknown_style_and_bad_counts() {
        assert_matches!(
            generation_params("a calm portrait in a studio", Some("vintage"), None),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            generation_params("a calm portrait in a studio", None, Some(0)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            generation_params("a calm portrait in a studio", None, Some(9)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            generation_params("short", None, Some(4)),
            Err(CoreError::Validation(_))
        );
    }
}
