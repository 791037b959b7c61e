//! Per-lesson quiz state machine.
//!
//! `Answering(i) -> Feedback(i) -> Answering(i + 1) | Finished`, with a retry
//! edge from a failed `Finished` back to `Answering(0)`.

use crate::{
    error::{AcademyError, Result},
    types::QuizQuestion,
};

/// Minimum percentage that counts as a pass.
pub const PASS_THRESHOLD: u8 = 60;

pub fn passed(percent: u8) -> bool {
    percent >= PASS_THRESHOLD
}

/// `round(100 * correct / total)`; an empty quiz counts as 100.
pub fn percentage(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Answering {
        index: usize,
        selected: Option<usize>,
    },
    Feedback {
        index: usize,
        selected: usize,
        correct: bool,
    },
    Finished {
        correct: usize,
        total: usize,
        percent: u8,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub percent: u8,
    pub passed: bool,
}

/// How an option is shown once the answer has been submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    Correct,
    WrongPick,
    Dimmed,
}

#[derive(Debug, Clone)]
pub struct QuizEngine {
    questions: Vec<QuizQuestion>,
    phase: QuizPhase,
    correct_count: usize,
}

impl QuizEngine {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let mut engine = Self {
            questions,
            phase: QuizPhase::Answering {
                index: 0,
                selected: None,
            },
            correct_count: 0,
        };
        if engine.questions.is_empty() {
            engine.phase = engine.finished_phase();
        }
        engine
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    /// The question currently on screen, `None` once finished.
    pub fn current_question(&self) -> Option<(usize, &QuizQuestion)> {
        match self.phase {
            QuizPhase::Answering { index, .. } | QuizPhase::Feedback { index, .. } => {
                self.questions.get(index).map(|q| (index, q))
            }
            QuizPhase::Finished { .. } => None,
        }
    }

    /// Tentatively picks an option; may be changed until submitted.
    pub fn select(&mut self, option: usize) -> Result<()> {
        let QuizPhase::Answering { index, .. } = self.phase else {
            return Err(AcademyError::QuizState {
                reason: "answer already submitted",
            });
        };
        if option >= self.questions[index].options.len() {
            return Err(AcademyError::QuizState {
                reason: "no such option",
            });
        }
        self.phase = QuizPhase::Answering {
            index,
            selected: Some(option),
        };
        Ok(())
    }

    pub fn submit(&mut self) -> Result<bool> {
        let QuizPhase::Answering { index, selected } = self.phase else {
            return Err(AcademyError::QuizState {
                reason: "not answering a question",
            });
        };
        let Some(selected) = selected else {
            return Err(AcademyError::QuizState {
                reason: "select an option first",
            });
        };

        let correct = self.questions[index].options[selected].correct;
        if correct {
            self.correct_count += 1;
        }
        self.phase = QuizPhase::Feedback {
            index,
            selected,
            correct,
        };
        Ok(correct)
    }

    /// Moves past the feedback screen. Returns the outcome when the quiz ends.
    pub fn advance(&mut self) -> Result<Option<QuizOutcome>> {
        let QuizPhase::Feedback { index, .. } = self.phase else {
            return Err(AcademyError::QuizState {
                reason: "submit an answer first",
            });
        };

        if index + 1 < self.questions.len() {
            self.phase = QuizPhase::Answering {
                index: index + 1,
                selected: None,
            };
            return Ok(None);
        }

        self.phase = self.finished_phase();
        Ok(self.outcome())
    }

    pub fn outcome(&self) -> Option<QuizOutcome> {
        match self.phase {
            QuizPhase::Finished { percent, .. } => Some(QuizOutcome {
                percent,
                passed: passed(percent),
            }),
            _ => None,
        }
    }

    /// Starts over after a failed attempt.
    pub fn retry(&mut self) -> Result<()> {
        match self.outcome() {
            Some(outcome) if !outcome.passed => {
                self.correct_count = 0;
                self.phase = QuizPhase::Answering {
                    index: 0,
                    selected: None,
                };
                Ok(())
            }
            Some(_) => Err(AcademyError::QuizState {
                reason: "quiz already passed",
            }),
            None => Err(AcademyError::QuizState {
                reason: "quiz not finished",
            }),
        }
    }

    /// Per-option marks while on the feedback screen.
    pub fn feedback_marks(&self) -> Option<Vec<OptionMark>> {
        let QuizPhase::Feedback {
            index, selected, ..
        } = self.phase
        else {
            return None;
        };
        let marks = self.questions[index]
            .options
            .iter()
            .enumerate()
            .map(|(i, opt)| {
                if opt.correct {
                    OptionMark::Correct
                } else if i == selected {
                    OptionMark::WrongPick
                } else {
                    OptionMark::Dimmed
                }
            })
            .collect();
        Some(marks)
    }

    fn finished_phase(&self) -> QuizPhase {
        let total = self.questions.len();
        QuizPhase::Finished {
            correct: self.correct_count,
            total,
            percent: percentage(self.correct_count, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestionOption;

    fn question(correct: usize) -> QuizQuestion {
        QuizQuestion {
            question: format!("q{correct}"),
            options: (0..3)
                .map(|i| QuestionOption {
                    answer: format!("option {i}"),
                    correct: i == correct,
                })
                .collect(),
        }
    }

    fn answer_all(engine: &mut QuizEngine, picks: &[usize]) -> Option<QuizOutcome> {
        let mut outcome = None;
        for &pick in picks {
            engine.select(pick).unwrap();
            engine.submit().unwrap();
            outcome = engine.advance().unwrap();
        }
        outcome
    }

    #[test]
    fn percentage_rounds_like_the_score_display() {
        assert_eq!(percentage(3, 3), 100);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(0, 3), 0);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 0), 100);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(passed(60));
        assert!(!passed(59));
    }

    #[test]
    fn all_correct_passes_with_100() {
        let mut engine = QuizEngine::new(vec![question(1), question(0), question(2)]);
        let outcome = answer_all(&mut engine, &[1, 0, 2]).unwrap();
        assert_eq!(
            outcome,
            QuizOutcome {
                percent: 100,
                passed: true
            }
        );
        assert!(engine.retry().is_err());
    }

    #[test]
    fn one_of_three_fails_and_retry_resets() {
        let mut engine = QuizEngine::new(vec![question(1), question(1), question(1)]);
        let outcome = answer_all(&mut engine, &[1, 0, 2]).unwrap();
        assert_eq!(outcome.percent, 33);
        assert!(!outcome.passed);

        engine.retry().unwrap();
        assert_eq!(
            engine.phase(),
            QuizPhase::Answering {
                index: 0,
                selected: None
            }
        );
        assert_eq!(engine.correct_count(), 0);
    }

    #[test]
    fn selection_is_tentative_until_submitted() {
        let mut engine = QuizEngine::new(vec![question(2)]);
        engine.select(0).unwrap();
        engine.select(2).unwrap();
        assert!(engine.submit().unwrap());
        assert!(engine.select(1).is_err());
    }

    #[test]
    fn submit_requires_selection_and_advance_requires_feedback() {
        let mut engine = QuizEngine::new(vec![question(0)]);
        assert!(engine.submit().is_err());
        assert!(engine.advance().is_err());
        assert!(engine.select(7).is_err());
    }

    #[test]
    fn feedback_reveals_correct_and_wrong_pick() {
        let mut engine = QuizEngine::new(vec![question(1)]);
        engine.select(2).unwrap();
        assert!(!engine.submit().unwrap());
        assert_eq!(
            engine.feedback_marks().unwrap(),
            vec![OptionMark::Dimmed, OptionMark::Correct, OptionMark::WrongPick]
        );
    }

    #[test]
    fn empty_quiz_is_finished_and_passed() {
        let engine = QuizEngine::new(Vec::new());
        assert_eq!(
            engine.outcome(),
            Some(QuizOutcome {
                percent: 100,
                passed: true
            })
        );
    }
}
