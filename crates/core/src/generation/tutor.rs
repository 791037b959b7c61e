//! AI tutor: text and voice question answering about the current lesson.
//!
//! Never fails outward. Every error collapses to one of the fixed messages
//! below so the lesson stays usable.

use tracing::warn;

use crate::{
    client::{AudioClip, GenerativeClient},
    types::Lesson,
    wav::{PcmSpec, pcm16_to_wav},
};

pub const TUTOR_MISSING_KEY: &str =
    "To use the AI Tutor, please configure a valid API key (GEMINI_API_KEY or API_KEY).";
pub const TUTOR_CONNECTION_ISSUE: &str =
    "Sorry, the AI Tutor is currently experiencing connection issues.";
pub const TUTOR_EMPTY_ANSWER: &str = "I couldn't generate an answer at this moment.";
pub const VOICE_APOLOGY: &str = "Sorry, I couldn't process your voice question right now.";

pub fn tutor_prompt(context: &str, question: &str) -> String {
    format!(
        r#"You are an expert ESG (Environmental, Social, and Governance) Tutor.
The student is currently learning from the following lesson content:
"{context}"

The student asks: "{question}"

Answer concisely (under 100 words), encouragingly, and strictly based on ESG principles."#
    )
}

pub fn voice_instruction(context: &str) -> String {
    format!(
        r#"You are an expert ESG (Environmental, Social, and Governance) Tutor.
The attached audio is a spoken question from a student who is learning this lesson:
"{context}"

Answer the spoken question concisely (under 100 words), encouragingly, and strictly based on ESG principles.
Reply with plain text suitable for reading aloud."#
    )
}

/// Answers a typed question. Returns `None` for a blank question (nothing is sent).
pub async fn ask(
    client: Option<&dyn GenerativeClient>,
    lesson: &Lesson,
    question: &str,
) -> Option<String> {
    let question = question.trim();
    if question.is_empty() {
        return None;
    }
    let Some(client) = client else {
        return Some(TUTOR_MISSING_KEY.to_string());
    };

    let prompt = tutor_prompt(&lesson.tutor_context(), question);
    let answer = match client.generate_text(&prompt).await {
        Ok(text) if text.is_empty() => TUTOR_EMPTY_ANSWER.to_string(),
        Ok(text) => text,
        Err(e) => {
            warn!(lesson = %lesson.id, error = %e, "tutor request failed");
            TUTOR_CONNECTION_ISSUE.to_string()
        }
    };
    Some(answer)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceReply {
    pub text: String,
    /// Spoken answer as a WAV file, absent when anything failed.
    pub speech_wav: Option<Vec<u8>>,
}

impl VoiceReply {
    fn apology() -> Self {
        Self {
            text: VOICE_APOLOGY.to_string(),
            speech_wav: None,
        }
    }
}

/// Answers a recorded question and synthesizes the spoken reply. No retry.
pub async fn ask_by_voice(
    client: Option<&dyn GenerativeClient>,
    lesson: &Lesson,
    clip: &AudioClip,
    voice: &str,
) -> VoiceReply {
    let Some(client) = client else {
        return VoiceReply {
            text: TUTOR_MISSING_KEY.to_string(),
            speech_wav: None,
        };
    };

    let instruction = voice_instruction(&lesson.tutor_context());
    let text = match client.generate_text_with_audio(&instruction, clip).await {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => return VoiceReply::apology(),
        Err(e) => {
            warn!(lesson = %lesson.id, error = %e, "voice tutor request failed");
            return VoiceReply::apology();
        }
    };

    let speech = match client.synthesize_speech(&text, voice).await {
        Ok(pcm) => pcm16_to_wav(&pcm, PcmSpec::default()),
        Err(e) => Err(e),
    };
    match speech {
        Ok(wav) => VoiceReply {
            text,
            speech_wav: Some(wav),
        },
        Err(e) => {
            warn!(lesson = %lesson.id, error = %e, "voice reply synthesis failed");
            VoiceReply::apology()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{content::Course, generation::testing::MockClient};

    fn lesson() -> Lesson {
        Course::builtin().unwrap().first_lesson().clone()
    }

    #[tokio::test]
    async fn missing_client_gives_instructional_message() {
        let answer = ask(None, &lesson(), "What is ESG?").await;
        assert_eq!(answer.as_deref(), Some(TUTOR_MISSING_KEY));
    }

    #[tokio::test]
    async fn blank_question_sends_nothing() {
        let client = MockClient::default();
        assert_eq!(ask(Some(&client), &lesson(), "   ").await, None);
        assert_eq!(client.text_calls(), 0);
    }

    #[tokio::test]
    async fn answer_includes_lesson_context_in_prompt() {
        let client = MockClient::default().with_text("ESG means...");
        let answer = ask(Some(&client), &lesson(), "What is ESG?").await;
        assert_eq!(answer.as_deref(), Some("ESG means..."));
        let prompt = client.last_prompt().unwrap();
        assert!(prompt.contains("Title: 1. What is ESG?"));
        assert!(prompt.contains("The student asks: \"What is ESG?\""));
    }

    #[tokio::test]
    async fn provider_failure_and_empty_answer_use_fixed_strings() {
        let failing = MockClient::default().failing();
        assert_eq!(
            ask(Some(&failing), &lesson(), "q").await.as_deref(),
            Some(TUTOR_CONNECTION_ISSUE)
        );
        let empty = MockClient::default().with_text("");
        assert_eq!(
            ask(Some(&empty), &lesson(), "q").await.as_deref(),
            Some(TUTOR_EMPTY_ANSWER)
        );
    }

    #[tokio::test]
    async fn voice_reply_carries_wav_audio() {
        let client = MockClient::default().with_text("Governance is oversight.");
        let clip = AudioClip::wav(vec![0; 8]);
        let reply = ask_by_voice(Some(&client), &lesson(), &clip, "Kore").await;
        assert_eq!(reply.text, "Governance is oversight.");
        assert_eq!(&reply.speech_wav.unwrap()[0..4], b"RIFF");
    }

    #[tokio::test]
    async fn voice_failure_apologizes() {
        let client = MockClient::default().failing();
        let reply = ask_by_voice(Some(&client), &lesson(), &AudioClip::wav(vec![]), "Kore").await;
        assert_eq!(reply, VoiceReply::apology());
    }
}
