//! Clothing categories and sizes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Clothing category of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Shoes,
    Accessories,
    Underwear,
    Activewear,
    Formal,
    Casual,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Tops,
        Category::Bottoms,
        Category::Dresses,
        Category::Outerwear,
        Category::Shoes,
        Category::Accessories,
        Category::Underwear,
        Category::Activewear,
        Category::Formal,
        Category::Casual,
    ];

    /// Wire name, as used in query strings and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tops => "tops",
            Category::Bottoms => "bottoms",
            Category::Dresses => "dresses",
            Category::Outerwear => "outerwear",
            Category::Shoes => "shoes",
            Category::Accessories => "accessories",
            Category::Underwear => "underwear",
            Category::Activewear => "activewear",
            Category::Formal => "formal",
            Category::Casual => "casual",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Clothing size. Letter sizes plus even numeric sizes 0 through 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    #[serde(rename = "XS")]
    Xs,
    #[serde(rename = "S")]
    S,
    #[serde(rename = "M")]
    M,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "XL")]
    Xl,
    #[serde(rename = "XXL")]
    Xxl,
    #[serde(rename = "XXXL")]
    Xxxl,
    #[serde(rename = "0")]
    Size0,
    #[serde(rename = "2")]
    Size2,
    #[serde(rename = "4")]
    Size4,
    #[serde(rename = "6")]
    Size6,
    #[serde(rename = "8")]
    Size8,
    #[serde(rename = "10")]
    Size10,
    #[serde(rename = "12")]
    Size12,
    #[serde(rename = "14")]
    Size14,
    #[serde(rename = "16")]
    Size16,
    #[serde(rename = "18")]
    Size18,
    #[serde(rename = "20")]
    Size20,
}

impl Size {
    pub const ALL: [Size; 18] = [
        Size::Xs,
        Size::S,
        Size::M,
        Size::L,
        Size::Xl,
        Size::Xxl,
        Size::Xxxl,
        Size::Size0,
        Size::Size2,
        Size::Size4,
        Size::Size6,
        Size::Size8,
        Size::Size10,
        Size::Size12,
        Size::Size14,
        Size::Size16,
        Size::Size18,
        Size::Size20,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Size::Xs => "XS",
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::Xl => "XL",
            Size::Xxl => "XXL",
            Size::Xxxl => "XXXL",
            Size::Size0 => "0",
            Size::Size2 => "2",
            Size::Size4 => "4",
            Size::Size6 => "6",
            Size::Size8 => "8",
            Size::Size10 => "10",
            Size::Size12 => "12",
            Size::Size14 => "14",
            Size::Size16 => "16",
            Size::Size18 => "18",
            Size::Size20 => "20",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Size {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Size::ALL
            .into_iter()
            .find(|size| size.as_str() == upper)
            .ok_or_else(|| UnknownVariant {
                kind: "size",
                value: s.to_string(),
            })
    }
}

/// Returned when a string names no known category or size.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
