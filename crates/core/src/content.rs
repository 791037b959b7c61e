//! Course Content Store.
//!
//! The course is a static tree of modules, lessons and quiz questions loaded
//! once at startup. Nothing here mutates after construction.

use std::{collections::HashSet, path::Path};

use crate::{
    error::{AcademyError, Result},
    progress::CERTIFICATE_SENTINEL,
    types::{CertificateTemplate, CourseData, LandingPage, Lesson, Module},
};

static BUILTIN_COURSE: &str = include_str!("../data/course.json");

#[derive(Debug, Clone)]
pub struct Course {
    data: CourseData,
    lessons: Vec<Lesson>,
}

impl Course {
    /// The bundled ESG Fundamentals course.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_COURSE)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: CourseData = serde_json::from_str(json)?;
        Self::new(data)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    pub fn new(data: CourseData) -> Result<Self> {
        let lessons: Vec<Lesson> = data
            .course
            .modules
            .iter()
            .flat_map(|m| m.lessons.iter().cloned())
            .collect();

        if lessons.is_empty() {
            return Err(AcademyError::InvalidContent {
                reason: "course has no lessons".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for lesson in &lessons {
            if lesson.id == CERTIFICATE_SENTINEL {
                return Err(AcademyError::InvalidContent {
                    reason: format!("lesson id '{}' is reserved", CERTIFICATE_SENTINEL),
                });
            }
            if !seen.insert(lesson.id.as_str()) {
                return Err(AcademyError::InvalidContent {
                    reason: format!("duplicate lesson id '{}'", lesson.id),
                });
            }
        }

        Ok(Self { data, lessons })
    }

    /// All lessons in course order, across modules.
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn modules(&self) -> &[Module] {
        &self.data.course.modules
    }

    pub fn lesson(&self, id: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.lessons.iter().position(|l| l.id == id)
    }

    pub fn first_lesson(&self) -> &Lesson {
        // non-empty, checked in `new`
        &self.lessons[0]
    }

    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    pub fn landing_page(&self) -> &LandingPage {
        &self.data.landing_page
    }

    pub fn certificate(&self) -> &CertificateTemplate {
        &self.data.certificate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_course_has_five_lessons_in_order() {
        let course = Course::builtin().unwrap();
        let ids: Vec<&str> = course.lessons().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l2", "l3", "l4", "l5"]);
        assert_eq!(course.first_lesson().id, "l1");
        assert!(course.lessons().iter().all(|l| l.quiz.len() == 3));
        assert!(course.certificate().certificate_text.contains("{{NAME}}"));
    }

    #[test]
    fn every_builtin_question_has_exactly_one_correct_option() {
        let course = Course::builtin().unwrap();
        for lesson in course.lessons() {
            for q in &lesson.quiz {
                assert_eq!(q.options.iter().filter(|o| o.correct).count(), 1, "{}", q.question);
            }
        }
    }

    #[test]
    fn rejects_duplicate_and_reserved_ids() {
        let mut data: CourseData = serde_json::from_str(BUILTIN_COURSE).unwrap();
        let dup = data.course.modules[0].lessons[0].clone();
        data.course.modules[0].lessons.push(dup);
        assert!(matches!(
            Course::new(data),
            Err(AcademyError::InvalidContent { .. })
        ));

        let mut data: CourseData = serde_json::from_str(BUILTIN_COURSE).unwrap();
        data.course.modules[0].lessons[1].id = "certificate".to_string();
        assert!(Course::new(data).is_err());
    }

    #[test]
    fn rejects_empty_course() {
        let mut data: CourseData = serde_json::from_str(BUILTIN_COURSE).unwrap();
        data.course.modules.clear();
        assert!(Course::new(data).is_err());
    }
}
