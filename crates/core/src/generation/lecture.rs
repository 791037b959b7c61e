//! Audio lecture: a written lecture script, read aloud by the speech model.

use tokio_util::sync::CancellationToken;

use crate::{
    client::GenerativeClient,
    document::notes,
    error::{AcademyError, Result},
    types::Lesson,
    wav::{PcmSpec, pcm16_to_wav},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureAudio {
    pub wav: Vec<u8>,
    /// The script that was read, kept for the notes export.
    pub transcript: String,
}

pub fn lecture_script_prompt(lesson: &Lesson) -> String {
    let takeaways = lesson
        .key_takeaways
        .iter()
        .map(|t| format!("- {t}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an engaging ESG (Environmental, Social, and Governance) lecturer.
Write a short audio lecture (about 250 words) for the lesson "{title}".

Lesson script:
{script}

Summary:
{summary}

Key takeaways:
{takeaways}

Format the lecture as study notes:
- Start each section with a heading line beginning with '#'.
- Use lines beginning with '-' for bullet points.
- Write everything else as short plain paragraphs.
Do not include stage directions or speaker labels."#,
        title = lesson.title,
        script = lesson.video_script,
        summary = lesson.summary,
    )
}

/// Two sequential calls: script generation, then speech synthesis of that script.
pub async fn generate_lecture(
    client: &dyn GenerativeClient,
    lesson: &Lesson,
    voice: &str,
    cancel: &CancellationToken,
) -> Result<LectureAudio> {
    let prompt = lecture_script_prompt(lesson);
    let transcript = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(AcademyError::Cancelled),
        text = client.generate_text(&prompt) => text?,
    };
    if transcript.is_empty() {
        return Err(AcademyError::InvalidResponse {
            reason: "empty lecture script".to_string(),
        });
    }

    let spoken = notes::plain_text(&transcript);
    let pcm = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(AcademyError::Cancelled),
        pcm = client.synthesize_speech(&spoken, voice) => pcm?,
    };

    Ok(LectureAudio {
        wav: pcm16_to_wav(&pcm, PcmSpec::default())?,
        transcript,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{content::Course, generation::testing::MockClient};

    #[tokio::test]
    async fn script_then_speech() {
        let lesson = Course::builtin().unwrap().first_lesson().clone();
        let client = MockClient::default().with_text("# Intro\n- **E** is Environmental");
        let lecture = generate_lecture(&client, &lesson, "Kore", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(lecture.transcript, "# Intro\n- **E** is Environmental");
        assert_eq!(&lecture.wav[0..4], b"RIFF");
        assert_eq!(client.text_calls(), 1);
        assert_eq!(client.speech_calls(), 1);
        assert_eq!(client.last_speech_text().unwrap(), "Intro\nE is Environmental");
    }

    #[tokio::test]
    async fn failed_script_skips_speech() {
        let lesson = Course::builtin().unwrap().first_lesson().clone();
        let client = MockClient::default().failing();
        assert!(
            generate_lecture(&client, &lesson, "Kore", &CancellationToken::new())
                .await
                .is_err()
        );
        assert_eq!(client.speech_calls(), 0);
    }

    #[test]
    fn prompt_lists_takeaways() {
        let lesson = Course::builtin().unwrap().first_lesson().clone();
        let prompt = lecture_script_prompt(&lesson);
        assert!(prompt.contains("- ESG stands for Environmental, Social, and Governance."));
    }
}
