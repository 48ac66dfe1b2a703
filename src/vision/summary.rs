// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Human-readable summaries of an image analysis

use tracing::info;

use super::models::ImageAnalysis;

/// Category names containing this fragment count as people
const PEOPLE_CATEGORY: &str = "people";

/// Whether any category name mentions people (taxonomy prefix `people_`)
pub fn has_people_category(analysis: &ImageAnalysis) -> bool {
    analysis
        .categories
        .iter()
        .any(|c| c.name.to_lowercase().contains(PEOPLE_CATEGORY))
}

/// Log every attribute of an analysis at info level
pub fn log_analysis(analysis: &ImageAnalysis) {
    for caption in analysis.captions() {
        info!("Caption '{}' with confidence {:.4}", caption.text, caption.confidence);
    }
    for category in &analysis.categories {
        info!("Category '{}' with confidence {:.4}", category.name, category.score);
    }
    for tag in &analysis.tags {
        info!("Tag '{}' with confidence {:.4}", tag.name, tag.confidence);
    }
    for face in &analysis.faces {
        let rect = &face.face_rectangle;
        info!(
            "Face '{}' of age {} at location ({}, {}), ({}, {})",
            face.gender.as_deref().unwrap_or("unknown"),
            face.age,
            rect.left,
            rect.top,
            rect.right(),
            rect.bottom()
        );
    }
    if let Some(adult) = &analysis.adult {
        info!(
            "Is adult content: {} with confidence {:.4}",
            adult.is_adult_content, adult.adult_score
        );
        info!(
            "Has racy content: {} with confidence {:.4}",
            adult.is_racy_content, adult.racy_score
        );
    }
    if let Some(color) = &analysis.color {
        info!(
            is_bw = color.is_bw_img,
            accent = %color.accent_color,
            background = %color.dominant_color_background,
            foreground = %color.dominant_color_foreground,
            "Dominant colors: {}",
            color.dominant_colors.join(", ")
        );
    }
    for celebrity in analysis.celebrities() {
        match &celebrity.face_rectangle {
            Some(rect) => info!(
                "Celebrity '{}' with confidence {:.4} at location ({}, {}), ({}, {})",
                celebrity.name,
                celebrity.confidence,
                rect.left,
                rect.top,
                rect.right(),
                rect.bottom()
            ),
            None => info!(
                "Celebrity '{}' with confidence {:.4}",
                celebrity.name, celebrity.confidence
            ),
        }
    }
    for landmark in analysis.landmarks() {
        info!("Landmark '{}' with confidence {:.4}", landmark.name, landmark.confidence);
    }
    if let Some(image_type) = &analysis.image_type {
        info!(
            "Clip art type: {}, line drawing type: {}",
            image_type.clip_art_type, image_type.line_drawing_type
        );
    }
}
