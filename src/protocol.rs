//! Public protocol structs for the HTTP endpoints (serde ready).
//! Field names follow what the frontend already sends (camelCase on the simulated functions).

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    /// Whether a model backend is configured.
    pub model: bool,
}

//
// AI coach
//

#[derive(Debug, Deserialize)]
pub struct CoachIn {
    pub message: String,
    pub context: CoachContext,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachContext {
    pub topic: String,
    #[serde(default)]
    pub course_data: serde_json::Value,
    #[serde(default)]
    pub current_step: String,
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CoachKind {
    Suggestion,
    Improvement,
    GapAnalysis,
    Engagement,
}

#[derive(Debug, Serialize)]
pub struct CoachOut {
    pub response: String,
    #[serde(rename = "type")]
    pub kind: CoachKind,
    pub suggestions: Vec<String>,
    pub confidence: f32,
    pub timestamp: String,
}

//
// Translation
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateIn {
    pub content: String,
    pub from_language: String,
    pub to_language: String,
    /// Free-form label (`title`, `description`, `lesson`, `quiz`, ...), echoed back as given.
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateOut {
    pub translated_content: String,
    pub original_content: String,
    pub from_language: String,
    pub to_language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub confidence: f32,
}

//
// Export
//

/// Lesson row as stored by the editor.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LessonIn {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub learning_objectives: Option<Vec<String>>,
}

/// Course row as stored by the editor.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CourseIn {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
    #[serde(default)]
    pub estimated_duration: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPdfIn {
    pub course_id: String,
    #[serde(default)]
    pub course: CourseIn,
    #[serde(default)]
    pub lessons: Vec<LessonIn>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPptIn {
    pub course_id: String,
    #[serde(default)]
    pub lessons: Vec<LessonIn>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub language: Option<String>,
    pub difficulty: Option<String>,
    pub estimated_duration: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChapter {
    pub chapter_number: usize,
    pub title: Option<String>,
    pub content: Option<String>,
    pub duration: Option<u32>,
    pub objectives: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct PdfDocument {
    pub title: Option<String>,
    pub description: Option<String>,
    pub metadata: DocumentMeta,
    pub chapters: Vec<DocumentChapter>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub slide_number: usize,
    pub title: Option<String>,
    pub content: Option<String>,
    pub duration: Option<u32>,
    pub objectives: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct SlideDeck {
    pub slides: Vec<Slide>,
}

//
// Template course (offline generator)
//

#[derive(Debug, Serialize)]
pub struct TemplateLesson {
    pub title: String,
    pub duration: u32,
    pub objectives: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplateModule {
    pub id: u32,
    pub title: String,
    pub lessons: Vec<TemplateLesson>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOutline {
    pub modules: Vec<TemplateModule>,
    pub total_lessons: usize,
    pub estimated_duration: Option<u32>,
    pub prerequisites: String,
    pub learning_outcomes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AdaptivePath {
    pub beginner: String,
    pub intermediate: String,
    pub advanced: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCourse {
    pub title: String,
    pub description: String,
    pub outline: TemplateOutline,
    pub suggestions: Vec<String>,
    pub adaptive_path: AdaptivePath,
}
