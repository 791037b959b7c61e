use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub answer: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<QuestionOption>,
}

impl QuizQuestion {
    /// Index of the first option marked correct, if any.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.correct)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub video_script: String,
    pub visual_guidance: String,
    pub summary: String,
    pub key_takeaways: Vec<String>,
    pub quiz: Vec<QuizQuestion>,
}

impl Lesson {
    /// Context handed to the AI tutor for questions about this lesson.
    pub fn tutor_context(&self) -> String {
        format!(
            "Title: {}\nScript: {}\nSummary: {}",
            self.title, self.video_script, self.summary
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub module_title: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStructure {
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingPage {
    pub title: String,
    pub short_description: String,
    pub key_features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateTemplate {
    pub certificate_title: String,
    pub certificate_text: String,
    pub shareable_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseData {
    pub landing_page: LandingPage,
    pub course: CourseStructure,
    pub certificate: CertificateTemplate,
}
