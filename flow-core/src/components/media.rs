//! Image components.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Component, Construct, NodeReader, NodeWriter, Preview, WireContext};
use crate::validation::{DiagnosticCode, Rules, CAROUSEL_IMAGE_RANGE};
use crate::ElementId;

/// How an image is fitted into its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    /// Fit inside, keeping the aspect ratio.
    #[default]
    Contain,
    /// Fill the box, cropping overflow.
    Cover,
}

/// Carousel aspect ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 4:3
    #[default]
    #[serde(rename = "4:3")]
    Standard,
    /// 16:9
    #[serde(rename = "16:9")]
    Wide,
}

/// A single image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    /// Base64 data or URL.
    pub src: String,
    /// Width in pixels.
    pub width: Option<u32>,
    /// Height in pixels.
    pub height: Option<u32>,
    /// Fitting mode.
    pub scale_type: ScaleType,
    /// Width divided by height.
    pub aspect_ratio: Option<f64>,
    /// Alternative text for screen readers.
    pub alt_text: Option<String>,
}

impl Component for Image {
    fn validate(&self, rules: &mut Rules<'_>) {
        if self.src.trim().is_empty() {
            rules.error(DiagnosticCode::MissingField, "src", "Image source is required");
        }
        if self.alt_text.as_deref().map_or(true, |a| a.trim().is_empty()) {
            rules.warning(
                DiagnosticCode::MissingAltText,
                "alt-text",
                "Image has no alternative text",
            );
        }
        if let Some(ratio) = self.aspect_ratio {
            if !(ratio.is_finite() && ratio > 0.0) {
                rules.error(
                    DiagnosticCode::InvalidValue,
                    "aspect-ratio",
                    format!("Aspect ratio {ratio} must be a positive number"),
                );
            }
        }
    }

    fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
        let mut node = NodeWriter::new("Image");
        node.text("src", &self.src)
            .opt_number("width", self.width)
            .opt_number("height", self.height)
            .non_default("scale-type", &self.scale_type, &ScaleType::Contain)
            .opt_text("alt-text", self.alt_text.as_deref());
        if let Some(ratio) = self.aspect_ratio.and_then(serde_json::Number::from_f64) {
            node.value("aspect-ratio", Value::Number(ratio));
        }
        node.build()
    }

    fn render(&self) -> Preview {
        let summary = self.alt_text.clone().unwrap_or_default();
        Preview::new("Image", summary)
    }
}

impl Construct for Image {
    fn seeded(_id: &ElementId) -> Self {
        Self::default()
    }

    fn from_node(node: NodeReader<'_>) -> Self {
        Self {
            src: node.text("src"),
            width: node.opt_u32("width"),
            height: node.opt_u32("height"),
            scale_type: node.parse_or_default("scale-type"),
            aspect_ratio: node.opt_f64("aspect-ratio"),
            alt_text: node.opt_text("alt-text"),
        }
    }
}

/// One image in a carousel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselImage {
    /// Base64 data or URL.
    pub src: String,
    /// Alternative text.
    pub alt_text: String,
}

/// Up to three swipeable images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageCarousel {
    /// Images in display order.
    pub images: Vec<CarouselImage>,
    /// Fitting mode.
    pub scale_type: ScaleType,
    /// Shared aspect ratio.
    pub aspect_ratio: AspectRatio,
}

impl Component for ImageCarousel {
    fn validate(&self, rules: &mut Rules<'_>) {
        rules.count("images", self.images.len(), &CAROUSEL_IMAGE_RANGE, "Image carousel");
        for image in &self.images {
            if image.src.trim().is_empty() {
                rules.error(DiagnosticCode::MissingField, "images", "Carousel image source is required");
            }
            if image.alt_text.trim().is_empty() {
                rules.warning(
                    DiagnosticCode::MissingAltText,
                    "images",
                    "Carousel image has no alternative text",
                );
            }
        }
    }

    fn to_node(&self, _ctx: &WireContext<'_>) -> Value {
        let images = self
            .images
            .iter()
            .map(|image| {
                let mut node = NodeWriter::default();
                node.text("src", &image.src)
                    .opt_text("alt-text", Some(&image.alt_text));
                node.build()
            })
            .collect();
        let mut node = NodeWriter::new("ImageCarousel");
        node.value("images", Value::Array(images))
            .non_default("scale-type", &self.scale_type, &ScaleType::Contain)
            .non_default("aspect-ratio", &self.aspect_ratio, &AspectRatio::Standard);
        node.build()
    }

    fn render(&self) -> Preview {
        Preview::new("Image carousel", format!("{} images", self.images.len()))
    }
}

impl Construct for ImageCarousel {
    fn seeded(_id: &ElementId) -> Self {
        Self::default()
    }

    fn from_node(node: NodeReader<'_>) -> Self {
        let images = node
            .array("images")
            .iter()
            .filter_map(|v| NodeReader::new(v).ok())
            .map(|image| CarouselImage {
                src: image.text("src"),
                alt_text: image.text("alt-text"),
            })
            .collect();
        Self {
            images,
            scale_type: node.parse_or_default("scale-type"),
            aspect_ratio: node.parse_or_default("aspect-ratio"),
        }
    }
}
