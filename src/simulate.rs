//! Simulated helper functions: AI coach, translation, document export and the offline
//! template course. None of them calls a model; replies are canned and delayed to mimic
//! real latency (see `SimulationDelays`).

use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use crate::domain::CourseRequest;
use crate::protocol::*;

/// Sleep for the configured artificial latency, if any.
pub async fn simulated_delay(ms: u64) {
  if ms > 0 {
    debug!(target: "simulate", delay_ms = ms, "Simulating work");
    tokio::time::sleep(Duration::from_millis(ms)).await;
  }
}

const COACH_SUGGESTIONS: [&str; 5] = [
  "Add interactive elements",
  "Include practical exercises",
  "Create assessment quizzes",
  "Provide real-world examples",
  "Add troubleshooting sections",
];

fn coach_replies(topic: &str) -> Vec<(CoachKind, String)> {
  vec![
    (CoachKind::Suggestion, format!("Based on your course about \"{}\", I recommend adding more interactive elements. Consider including practical exercises after each lesson to improve engagement.", topic)),
    (CoachKind::Improvement, "I notice your course structure is well-organized. To enhance learning outcomes, you might want to add assessment quizzes between modules to reinforce key concepts.".into()),
    (CoachKind::GapAnalysis, "Looking at your course outline, you might want to include a section on common misconceptions or troubleshooting. This helps learners avoid typical pitfalls.".into()),
    (CoachKind::Engagement, "To boost learner engagement, consider adding real-world case studies or examples. This helps connect theoretical concepts to practical applications.".into()),
  ]
}

/// Pick one canned coaching reply at random.
#[instrument(level = "info", target = "simulate", skip(input), fields(topic_len = input.context.topic.len(), message_len = input.message.len(), step = %input.context.current_step, has_course_data = !input.context.course_data.is_null()))]
pub fn coach_reply(input: &CoachIn) -> CoachOut {
  let replies = coach_replies(&input.context.topic);
  let (kind, response) = replies
    .choose(&mut rand::thread_rng())
    .cloned()
    .unwrap_or((CoachKind::Suggestion, String::new()));
  CoachOut {
    response,
    kind,
    suggestions: COACH_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
    confidence: 0.92,
    timestamp: chrono::Utc::now().to_rfc3339(),
  }
}

fn canned_translation(from: &str, to: &str) -> Option<&'static str> {
  match (from, to) {
    ("en", "es") => Some("Contenido traducido al español"),
    ("en", "fr") | ("es", "fr") => Some("Contenu traduit en français"),
    ("en", "de") | ("es", "de") => Some("Ins Deutsche übersetzter Inhalt"),
    ("en", "it") => Some("Contenuto tradotto in italiano"),
    ("en", "pt") => Some("Conteúdo traduzido para português"),
    ("es", "en") => Some("Content translated to English"),
    _ => None,
  }
}

/// Canned phrase for known language pairs, otherwise the content tagged with the pair.
#[instrument(level = "info", target = "simulate", skip(input), fields(from = %input.from_language, to = %input.to_language, content_len = input.content.len()))]
pub fn translate(input: TranslateIn) -> TranslateOut {
  let translated_content = canned_translation(&input.from_language, &input.to_language)
    .map(str::to_string)
    .unwrap_or_else(|| format!("[Translated from {} to {}] {}", input.from_language, input.to_language, input.content));
  TranslateOut {
    translated_content,
    original_content: input.content,
    from_language: input.from_language,
    to_language: input.to_language,
    content_type: input.content_type,
    confidence: 0.95,
  }
}

pub fn pdf_document(input: ExportPdfIn) -> PdfDocument {
  let course = input.course;
  PdfDocument {
    title: course.title,
    description: course.description,
    metadata: DocumentMeta {
      language: course.language,
      difficulty: course.difficulty_level,
      estimated_duration: course.estimated_duration,
    },
    chapters: input.lessons.into_iter().enumerate().map(|(i, l)| DocumentChapter {
      chapter_number: i + 1,
      title: l.title,
      content: l.content,
      duration: l.duration,
      objectives: l.learning_objectives,
    }).collect(),
  }
}

pub fn slide_deck(lessons: Vec<LessonIn>) -> SlideDeck {
  SlideDeck {
    slides: lessons.into_iter().enumerate().map(|(i, l)| Slide {
      slide_number: i + 1,
      title: l.title,
      content: l.content,
      duration: l.duration,
      objectives: l.learning_objectives,
    }).collect(),
  }
}

/// Attachment file name; anything outside [A-Za-z0-9_-] in the id becomes '_'.
pub fn export_filename(course_id: &str, ext: &str) -> String {
  let id: String = course_id
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
    .collect();
  format!("course-{}.{}.json", id, ext)
}

fn lesson(title: &str, duration: u32, objectives: [&str; 2]) -> TemplateLesson {
  TemplateLesson { title: title.into(), duration, objectives: objectives.iter().map(|o| o.to_string()).collect() }
}

/// Offline course skeleton: three modules of two lessons, no model involved.
#[instrument(level = "info", target = "simulate", skip(req), fields(topic_len = req.topic.len()))]
pub fn template_course(req: &CourseRequest) -> TemplateCourse {
  let topic = &req.topic;
  let audience = req.audience.as_deref().unwrap_or("all");
  let modules = vec![
    TemplateModule {
      id: 1,
      title: format!("Introduction to {}", topic),
      lessons: vec![
        lesson("Overview and Fundamentals", 15, ["Understand basic concepts", "Learn key terminology"]),
        lesson("Historical Context and Evolution", 20, ["Explore the development", "Understand current trends"]),
      ],
    },
    TemplateModule {
      id: 2,
      title: format!("Core Concepts of {}", topic),
      lessons: vec![
        lesson("Essential Principles", 25, ["Master fundamental principles", "Apply core concepts"]),
        lesson("Practical Applications", 30, ["Implement real-world solutions", "Analyze case studies"]),
      ],
    },
    TemplateModule {
      id: 3,
      title: format!("Advanced {} Techniques", topic),
      lessons: vec![
        lesson("Advanced Methodologies", 35, ["Explore advanced techniques", "Compare different approaches"]),
        lesson("Best Practices and Optimization", 25, ["Learn industry best practices", "Optimize performance"]),
      ],
    },
  ];
  let total_lessons = modules.iter().map(|m| m.lessons.len()).sum();
  let prerequisites = if req.difficulty.eq_ignore_ascii_case("beginner") {
    "None".to_string()
  } else {
    "Basic understanding of the subject area".to_string()
  };

  TemplateCourse {
    title: format!("{} - Comprehensive Guide", topic),
    description: format!(
      "A {} level course covering {} with a {} approach, designed for {} learners.",
      req.difficulty, topic, req.tone, audience
    ),
    outline: TemplateOutline {
      modules,
      total_lessons,
      estimated_duration: req.duration,
      prerequisites,
      learning_outcomes: vec![
        format!("Complete understanding of {}", topic),
        "Ability to apply concepts in real-world scenarios".into(),
        "Proficiency in advanced techniques and methodologies".into(),
      ],
    },
    suggestions: vec![
      "Consider adding interactive elements to increase engagement".into(),
      "Include practical exercises after each module".into(),
      "Add assessment quizzes to reinforce learning".into(),
      "Provide additional resources for further exploration".into(),
    ],
    adaptive_path: AdaptivePath {
      beginner: "Start with fundamentals and progress gradually".into(),
      intermediate: "Focus on practical applications and case studies".into(),
      advanced: "Emphasize advanced techniques and optimization strategies".into(),
    },
  }
}
