//! Lesson unlocking and sidebar outline, derived from content + progress.

use crate::{
    content::Course,
    error::{AcademyError, Result},
    progress::{Position, UserProgress},
};

/// Lesson `index` is locked iff it is not the first and its predecessor is not completed.
pub fn is_locked(course: &Course, progress: &UserProgress, index: usize) -> bool {
    index > 0
        && course
            .lessons()
            .get(index - 1)
            .is_some_and(|prev| !progress.is_completed(&prev.id))
}

pub fn is_lesson_locked(course: &Course, progress: &UserProgress, lesson_id: &str) -> bool {
    course
        .index_of(lesson_id)
        .is_some_and(|i| is_locked(course, progress, i))
}

pub fn is_course_complete(course: &Course, progress: &UserProgress) -> bool {
    progress.completed_lesson_ids.len() == course.lesson_count()
}

pub fn completion_percent(course: &Course, progress: &UserProgress) -> u8 {
    let total = course.lesson_count();
    ((progress.completed_lesson_ids.len() as f64 / total as f64) * 100.0).round() as u8
}

pub fn current_index(course: &Course, progress: &UserProgress) -> Option<usize> {
    progress
        .current_lesson_id
        .lesson_id()
        .and_then(|id| course.index_of(id))
}

pub fn has_next(course: &Course, progress: &UserProgress) -> bool {
    match current_index(course, progress) {
        Some(i) => i + 1 < course.lesson_count() || is_course_complete(course, progress),
        None => false,
    }
}

pub fn next_position(course: &Course, progress: &UserProgress) -> Option<Position> {
    let i = current_index(course, progress)?;
    if let Some(next) = course.lessons().get(i + 1) {
        return Some(Position::Lesson(next.id.clone()));
    }
    is_course_complete(course, progress).then_some(Position::Certificate)
}

/// Checks that `target` may be opened right now.
pub fn can_navigate(course: &Course, progress: &UserProgress, target: &Position) -> Result<()> {
    match target {
        Position::Certificate => {
            if is_course_complete(course, progress) {
                Ok(())
            } else {
                Err(AcademyError::CertificateLocked)
            }
        }
        Position::Lesson(id) => {
            let Some(index) = course.index_of(id) else {
                return Err(AcademyError::UnknownLesson {
                    lesson_id: id.clone(),
                });
            };
            if is_locked(course, progress, index) {
                return Err(AcademyError::LessonLocked {
                    lesson_id: id.clone(),
                });
            }
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRow {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub active: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSection {
    pub title: String,
    pub lessons: Vec<LessonRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub modules: Vec<ModuleSection>,
    pub certificate_active: bool,
    pub certificate_locked: bool,
    pub percent_complete: u8,
}

pub fn outline(course: &Course, progress: &UserProgress) -> Outline {
    let mut index = 0;
    let modules = course
        .modules()
        .iter()
        .map(|module| ModuleSection {
            title: module.module_title.clone(),
            lessons: module
                .lessons
                .iter()
                .map(|lesson| {
                    let row = LessonRow {
                        id: lesson.id.clone(),
                        title: lesson.title.clone(),
                        completed: progress.is_completed(&lesson.id),
                        active: progress.current_lesson_id.lesson_id() == Some(lesson.id.as_str()),
                        locked: is_locked(course, progress, index),
                    };
                    index += 1;
                    row
                })
                .collect(),
        })
        .collect();

    Outline {
        modules,
        certificate_active: progress.current_lesson_id == Position::Certificate,
        certificate_locked: !is_course_complete(course, progress),
        percent_complete: completion_percent(course, progress),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(completed: &[&str]) -> (Course, UserProgress) {
        let course = Course::builtin().unwrap();
        let mut progress = UserProgress::fresh(&course);
        progress.completed_lesson_ids = completed.iter().map(|s| s.to_string()).collect();
        (course, progress)
    }

    #[test]
    fn lock_rule_holds_for_every_prefix_and_gap() {
        let sets: [&[&str]; 5] = [&[], &["l1"], &["l1", "l2"], &["l2"], &["l1", "l3", "l4"]];
        for completed in sets {
            let (course, progress) = setup(completed);
            for (i, _) in course.lessons().iter().enumerate() {
                let expected = i > 0 && !completed.contains(&course.lessons()[i - 1].id.as_str());
                assert_eq!(is_locked(&course, &progress, i), expected, "{completed:?} at {i}");
            }
        }
    }

    #[test]
    fn certificate_requires_completion() {
        let (course, progress) = setup(&["l1", "l2", "l3", "l4"]);
        assert!(!is_course_complete(&course, &progress));
        assert!(matches!(
            can_navigate(&course, &progress, &Position::Certificate),
            Err(AcademyError::CertificateLocked)
        ));

        let (course, progress) = setup(&["l1", "l2", "l3", "l4", "l5"]);
        assert!(is_course_complete(&course, &progress));
        assert!(can_navigate(&course, &progress, &Position::Certificate).is_ok());
    }

    #[test]
    fn locked_and_unknown_lessons_are_rejected() {
        let (course, progress) = setup(&[]);
        assert!(matches!(
            can_navigate(&course, &progress, &Position::Lesson("l3".into())),
            Err(AcademyError::LessonLocked { .. })
        ));
        assert!(matches!(
            can_navigate(&course, &progress, &Position::Lesson("nope".into())),
            Err(AcademyError::UnknownLesson { .. })
        ));
        assert!(can_navigate(&course, &progress, &Position::Lesson("l1".into())).is_ok());
    }

    #[test]
    fn has_next_on_last_lesson_only_when_complete() {
        let (course, mut progress) = setup(&["l1", "l2", "l3", "l4"]);
        progress.current_lesson_id = Position::Lesson("l5".into());
        assert!(!has_next(&course, &progress));
        assert_eq!(next_position(&course, &progress), None);

        progress.completed_lesson_ids.push("l5".into());
        assert!(has_next(&course, &progress));
        assert_eq!(next_position(&course, &progress), Some(Position::Certificate));

        progress.current_lesson_id = Position::Certificate;
        assert!(!has_next(&course, &progress));
    }

    #[test]
    fn outline_marks_rows() {
        let (course, mut progress) = setup(&["l1"]);
        progress.current_lesson_id = Position::Lesson("l2".into());
        let outline = outline(&course, &progress);
        let rows = &outline.modules[0].lessons;
        assert!(rows[0].completed && !rows[0].locked);
        assert!(rows[1].active && !rows[1].locked);
        assert!(rows[2].locked);
        assert!(outline.certificate_locked);
        assert_eq!(outline.percent_complete, 20);
    }
}
