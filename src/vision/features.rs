// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Requested feature sets for image analysis

use std::fmt;
use std::str::FromStr;

/// Capability flags understood by the analyze endpoint (`visualFeatures`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualFeature {
    Categories,
    /// Captions and description tags
    Description,
    Tags,
    Faces,
    Adult,
    Color,
    ImageType,
}

impl VisualFeature {
    /// Wire name used in the `visualFeatures` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            VisualFeature::Categories => "Categories",
            VisualFeature::Description => "Description",
            VisualFeature::Tags => "Tags",
            VisualFeature::Faces => "Faces",
            VisualFeature::Adult => "Adult",
            VisualFeature::Color => "Color",
            VisualFeature::ImageType => "ImageType",
        }
    }
}

impl fmt::Display for VisualFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualFeature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "categories" => Ok(VisualFeature::Categories),
            "description" | "captions" => Ok(VisualFeature::Description),
            "tags" => Ok(VisualFeature::Tags),
            "faces" => Ok(VisualFeature::Faces),
            "adult" => Ok(VisualFeature::Adult),
            "color" | "colour" => Ok(VisualFeature::Color),
            "imagetype" | "image_type" | "image-type" => Ok(VisualFeature::ImageType),
            other => Err(format!("unknown visual feature '{}'", other)),
        }
    }
}

/// Domain-specific details attached to categories (`details`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageDetail {
    Celebrities,
    Landmarks,
}

impl ImageDetail {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageDetail::Celebrities => "Celebrities",
            ImageDetail::Landmarks => "Landmarks",
        }
    }
}

impl FromStr for ImageDetail {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "celebrities" => Ok(ImageDetail::Celebrities),
            "landmarks" => Ok(ImageDetail::Landmarks),
            other => Err(format!("unknown image detail '{}'", other)),
        }
    }
}

/// Feature set for one analyze call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub features: Vec<VisualFeature>,
    pub details: Vec<ImageDetail>,
}

impl AnalysisRequest {
    /// The seven features requested for every full analysis
    pub fn standard() -> Self {
        Self {
            features: vec![
                VisualFeature::Description,
                VisualFeature::Categories,
                VisualFeature::Tags,
                VisualFeature::Faces,
                VisualFeature::Adult,
                VisualFeature::Color,
                VisualFeature::ImageType,
            ],
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: &[ImageDetail]) -> Self {
        for detail in details {
            if !self.details.contains(detail) {
                self.details.push(*detail);
            }
        }
        self
    }

    /// Query parameters for the analyze endpoint, in request order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if !self.features.is_empty() {
            let features: Vec<&str> = self.features.iter().map(|f| f.as_str()).collect();
            pairs.push(("visualFeatures", features.join(",")));
        }
        if !self.details.is_empty() {
            let details: Vec<&str> = self.details.iter().map(|d| d.as_str()).collect();
            pairs.push(("details", details.join(",")));
        }
        pairs
    }
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self::standard()
    }
}
