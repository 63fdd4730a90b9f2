//! Field limits for items and item payloads

use lazy_static::lazy_static;
use regex::Regex;

use crate::item::{Color, Item};

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_BRAND_LEN: usize = 50;
pub const MAX_COLOR_NAME_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_NOTES_LEN: usize = 1000;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LEN: usize = 30;
pub const MAX_IMAGES: usize = 10;

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap();
}

/// A field that failed validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Maximum {max} {field} allowed")]
    TooMany { field: &'static str, max: usize },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("Invalid hex color code: {0}")]
    InvalidHexColor(String),
}

pub(crate) fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required { field: "name" });
    }
    check_len("name", name, MAX_NAME_LEN)
}

pub(crate) fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

pub(crate) fn check_opt_len(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(v) => check_len(field, v, max),
        None => Ok(()),
    }
}

pub(crate) fn check_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(ValidationError::TooMany {
            field: "tags",
            max: MAX_TAGS,
        });
    }
    for tag in tags {
        check_len("tag", tag, MAX_TAG_LEN)?;
    }
    Ok(())
}

pub(crate) fn check_images(urls: &[String]) -> Result<(), ValidationError> {
    if urls.len() > MAX_IMAGES {
        return Err(ValidationError::TooMany {
            field: "images",
            max: MAX_IMAGES,
        });
    }
    if urls.iter().any(|url| url.trim().is_empty()) {
        return Err(ValidationError::Required { field: "image url" });
    }
    Ok(())
}

pub(crate) fn check_colors(colors: &[Color]) -> Result<(), ValidationError> {
    for color in colors {
        if color.name.trim().is_empty() {
            return Err(ValidationError::Required { field: "color name" });
        }
        check_len("color name", &color.name, MAX_COLOR_NAME_LEN)?;
        if let Some(hex) = &color.hex_code {
            if !HEX_COLOR.is_match(hex) {
                return Err(ValidationError::InvalidHexColor(hex.clone()));
            }
        }
    }
    Ok(())
}

pub(crate) fn check_price(price: Option<f64>) -> Result<(), ValidationError> {
    match price {
        Some(p) if p < 0.0 || p.is_nan() => Err(ValidationError::Negative {
            field: "purchase_price",
        }),
        _ => Ok(()),
    }
}

/// Validate a full item against the field limits.
pub fn validate_item(item: &Item) -> Result<(), ValidationError> {
    check_name(&item.name)?;
    check_opt_len("brand", item.brand.as_deref(), MAX_BRAND_LEN)?;
    check_opt_len("description", item.description.as_deref(), MAX_DESCRIPTION_LEN)?;
    check_opt_len("notes", item.notes.as_deref(), MAX_NOTES_LEN)?;
    check_colors(&item.colors)?;
    check_tags(&item.tags)?;
    check_price(item.purchase_price)?;
    check_images(&item.image_urls)
}
