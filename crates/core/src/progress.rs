//! User progress: the only persisted, mutable entity.
//!
//! Every change goes through [`reduce`], a pure `(state, event) -> state'`
//! function, so the session can persist the whole document after each event.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    content::Course,
    error::{AcademyError, Result},
    quiz::passed,
};

pub const CERTIFICATE_SENTINEL: &str = "certificate";

/// Minimum learner name length, after trimming.
pub const MIN_NAME_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Position {
    Lesson(String),
    Certificate,
}

impl Position {
    pub fn lesson_id(&self) -> Option<&str> {
        match self {
            Position::Lesson(id) => Some(id),
            Position::Certificate => None,
        }
    }

    pub fn parse(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<String> for Position {
    fn from(raw: String) -> Self {
        if raw == CERTIFICATE_SENTINEL {
            Position::Certificate
        } else {
            Position::Lesson(raw)
        }
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        match position {
            Position::Lesson(id) => id,
            Position::Certificate => CERTIFICATE_SENTINEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub name: String,
    pub started: bool,
    pub completed_lesson_ids: Vec<String>,
    pub current_lesson_id: Position,
    pub quiz_scores: BTreeMap<String, u8>,
}

impl UserProgress {
    pub fn fresh(course: &Course) -> Self {
        Self {
            name: String::new(),
            started: false,
            completed_lesson_ids: Vec::new(),
            current_lesson_id: Position::Lesson(course.first_lesson().id.clone()),
            quiz_scores: BTreeMap::new(),
        }
    }

    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed_lesson_ids.iter().any(|id| id == lesson_id)
    }

    /// Drops ids the course does not know and repairs an unresolvable position.
    /// The certificate only resolves once every lesson is completed.
    pub fn normalize(mut self, course: &Course) -> Self {
        self.completed_lesson_ids.retain(|id| course.lesson(id).is_some());
        let mut seen = HashSet::new();
        self.completed_lesson_ids.retain(|id| seen.insert(id.clone()));
        self.quiz_scores
            .retain(|id, score| course.lesson(id).is_some() && *score <= 100);

        let resolvable = match &self.current_lesson_id {
            Position::Lesson(id) => course.lesson(id).is_some(),
            Position::Certificate => course.lessons().iter().all(|l| self.is_completed(&l.id)),
        };
        if !resolvable {
            self.current_lesson_id = Position::Lesson(course.first_lesson().id.clone());
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Started { name: String },
    Navigated { to: Position },
    QuizFinished { lesson_id: String, score: u8 },
    Reset,
}

/// Validates a learner name from the landing page.
pub fn validate_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(AcademyError::InvalidName { min: MIN_NAME_LEN });
    }
    Ok(name.to_string())
}

pub fn reduce(course: &Course, state: UserProgress, event: ProgressEvent) -> UserProgress {
    match event {
        ProgressEvent::Started { name } => UserProgress {
            name,
            started: true,
            ..state
        },
        ProgressEvent::Navigated { to } => UserProgress {
            current_lesson_id: to,
            ..state
        },
        ProgressEvent::QuizFinished { lesson_id, score } => {
            if !passed(score) {
                return state;
            }
            let mut next = state;
            if !next.is_completed(&lesson_id) {
                next.completed_lesson_ids.push(lesson_id.clone());
            }
            next.quiz_scores.insert(lesson_id, score);
            next
        }
        ProgressEvent::Reset => UserProgress::fresh(course),
    }
}
