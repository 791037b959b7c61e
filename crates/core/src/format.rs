use crate::{
    navigation::Outline,
    quiz::{OptionMark, QuizEngine, QuizPhase},
    types::{LandingPage, Lesson},
};

pub fn format_landing_page(page: &LandingPage) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {}\n\n", page.title));
    output.push_str(&format!("{}\n\n", page.short_description));
    for feature in &page.key_features {
        output.push_str(&format!("• {}\n", feature));
    }
    output
}

/// Summary tab: summary paragraph and key takeaways.
pub fn format_lesson_summary(lesson: &Lesson) -> String {
    let mut output = String::new();
    output.push_str("## Summary\n\n");
    output.push_str(&lesson.summary);
    output.push_str("\n\n");

    output.push_str("## Key takeaways\n\n");
    for takeaway in &lesson.key_takeaways {
        output.push_str(&format!("• {}\n", takeaway));
    }
    output
}

pub fn format_outline(outline: &Outline) -> String {
    let mut output = String::new();
    output.push_str(&format!("Progress: {}%\n", outline.percent_complete));
    for module in &outline.modules {
        output.push_str(&format!("\n{}\n", module.title));
        for row in &module.lessons {
            let marker = if row.completed {
                "✓"
            } else if row.locked {
                "🔒"
            } else {
                "○"
            };
            let active = if row.active { ">" } else { " " };
            output.push_str(&format!("{} {} [{}] {}\n", active, marker, row.id, row.title));
        }
    }
    let active = if outline.certificate_active { ">" } else { " " };
    let marker = if outline.certificate_locked { "🔒" } else { "★" };
    output.push_str(&format!("\n{} {} [certificate] Certificate\n", active, marker));
    output
}

/// The quiz screen for the current phase.
pub fn format_quiz(engine: &QuizEngine) -> String {
    let mut output = String::new();
    match engine.phase() {
        QuizPhase::Answering { selected, .. } => {
            let Some((index, question)) = engine.current_question() else {
                return output;
            };
            output.push_str(&format!(
                "Question {} of {}: {}\n",
                index + 1,
                engine.total(),
                question.question
            ));
            for (i, option) in question.options.iter().enumerate() {
                let pick = if selected == Some(i) { "(•)" } else { "( )" };
                output.push_str(&format!("  {} {}. {}\n", pick, i + 1, option.answer));
            }
        }
        QuizPhase::Feedback { correct, .. } => {
            let Some((index, question)) = engine.current_question() else {
                return output;
            };
            let marks = engine.feedback_marks().unwrap_or_default();
            output.push_str(&format!(
                "Question {} of {}: {}\n",
                index + 1,
                engine.total(),
                question.question
            ));
            for ((i, option), mark) in question.options.iter().enumerate().zip(marks) {
                let tag = match mark {
                    OptionMark::Correct => "✓",
                    OptionMark::WrongPick => "✗",
                    OptionMark::Dimmed => " ",
                };
                output.push_str(&format!("  {} {}. {}\n", tag, i + 1, option.answer));
            }
            output.push_str(if correct { "Correct!\n" } else { "Incorrect.\n" });
        }
        QuizPhase::Finished {
            correct,
            total,
            percent,
        } => {
            output.push_str(&format!(
                "You scored {}% ({} of {} correct).\n",
                percent, correct, total
            ));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{content::Course, navigation::outline, progress::UserProgress};

    #[test]
    fn outline_marks_locked_and_active_rows() {
        let course = Course::builtin().unwrap();
        let text = format_outline(&outline(&course, &UserProgress::fresh(&course)));
        assert!(text.starts_with("Progress: 0%\n"));
        assert!(text.contains("> ○ [l1]"));
        assert!(text.contains("  🔒 [l2]"));
        assert!(text.contains("🔒 [certificate]"));
    }

    #[test]
    fn feedback_screen_marks_options() {
        let course = Course::builtin().unwrap();
        let lesson = course.first_lesson();
        let mut engine = QuizEngine::new(lesson.quiz.clone());
        let correct = lesson.quiz[0].correct_index().unwrap();
        engine.select(correct).unwrap();
        engine.submit().unwrap();

        let text = format_quiz(&engine);
        assert!(text.contains(&format!("  ✓ {}.", correct + 1)));
        assert!(text.ends_with("Correct!\n"));
    }

    #[test]
    fn summary_lists_takeaways() {
        let course = Course::builtin().unwrap();
        let text = format_lesson_summary(course.first_lesson());
        assert!(text.contains("• ESG stands for Environmental, Social, and Governance.\n"));
    }
}
