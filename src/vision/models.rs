// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Provider response types
//!
//! Field names mirror the provider's JSON so that an analysis can be relayed
//! back to callers unchanged. Every field is optional on the wire: the
//! provider omits whatever was not requested.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// --- Image analysis ---

/// Structured result of an analyze call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adult: Option<AdultInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<ImageType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<ImageTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<ImageDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faces: Vec<FaceDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl ImageAnalysis {
    /// Captions from the description block, best first as returned
    pub fn captions(&self) -> &[ImageCaption] {
        self.description
            .as_ref()
            .map(|d| d.captions.as_slice())
            .unwrap_or(&[])
    }

    /// All celebrities found in category details
    pub fn celebrities(&self) -> impl Iterator<Item = &Celebrity> {
        self.categories
            .iter()
            .filter_map(|c| c.detail.as_ref())
            .flat_map(|d| d.celebrities.iter())
    }

    /// All landmarks found in category details
    pub fn landmarks(&self) -> impl Iterator<Item = &Landmark> {
        self.categories
            .iter()
            .filter_map(|c| c.detail.as_ref())
            .flat_map(|d| d.landmarks.iter())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<CategoryDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub celebrities: Vec<Celebrity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub landmarks: Vec<Landmark>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Celebrity {
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_rectangle: Option<FaceRectangle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Landmark {
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaceRectangle {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceRectangle {
    pub fn right(&self) -> i32 {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.top.saturating_add(self.height)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdultInfo {
    #[serde(default)]
    pub is_adult_content: bool,
    #[serde(default)]
    pub is_racy_content: bool,
    #[serde(default)]
    pub is_gory_content: bool,
    #[serde(default)]
    pub adult_score: f64,
    #[serde(default)]
    pub racy_score: f64,
    #[serde(default)]
    pub gore_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColorInfo {
    #[serde(default)]
    pub dominant_color_foreground: String,
    #[serde(default)]
    pub dominant_color_background: String,
    #[serde(default)]
    pub dominant_colors: Vec<String>,
    #[serde(default)]
    pub accent_color: String,
    #[serde(default, rename = "isBWImg", alias = "isBwImg")]
    pub is_bw_img: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageType {
    #[serde(default)]
    pub clip_art_type: i32,
    #[serde(default)]
    pub line_drawing_type: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageTag {
    pub name: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageDescription {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub captions: Vec<ImageCaption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageCaption {
    pub text: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FaceDescription {
    #[serde(default)]
    pub age: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub face_rectangle: FaceRectangle,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImageMetadata {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub format: String,
}

// --- Read (OCR) operations ---

/// Status of an asynchronous read job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl ReadStatus {
    /// Succeeded and Failed end polling
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReadStatus::Succeeded | ReadStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadStatus::NotStarted => "notStarted",
            ReadStatus::Running => "running",
            ReadStatus::Succeeded => "succeeded",
            ReadStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ReadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "notstarted" => Ok(ReadStatus::NotStarted),
            "running" => Ok(ReadStatus::Running),
            "succeeded" => Ok(ReadStatus::Succeeded),
            "failed" => Ok(ReadStatus::Failed),
            other => Err(format!("unknown read status '{}'", other)),
        }
    }
}

impl Serialize for ReadStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReadStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Body of a read-result query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadOperationResult {
    pub status: ReadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_date_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyze_result: Option<AnalyzeResults>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderErrorDetail>,
}

impl ReadOperationResult {
    /// Result with only a status, as returned while a job is in flight
    pub fn with_status(status: ReadStatus) -> Self {
        Self {
            status,
            created_date_time: None,
            last_updated_date_time: None,
            analyze_result: None,
            error: None,
        }
    }

    /// Pages in provider order; empty when no result was attached
    pub fn pages(&self) -> &[ReadResult] {
        self.analyze_result
            .as_ref()
            .map(|r| r.read_results.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResults {
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    #[serde(default)]
    pub read_results: Vec<ReadResult>,
}

/// Text recognised on one page
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReadResult {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub text: String,
    #[serde(default)]
    pub bounding_box: Vec<f64>,
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Line {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bounding_box: Vec::new(),
            words: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub text: String,
    #[serde(default)]
    pub bounding_box: Vec<f64>,
    #[serde(default)]
    pub confidence: f64,
}

// --- Provider errors ---

/// `{"error": {"code": ..., "message": ...}}` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderErrorBody {
    pub error: ProviderErrorDetail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProviderErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
