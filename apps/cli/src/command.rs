use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Outline,
    Open(String),
    Next,
    Lesson,
    Video,
    Summary,
    RetryVideo,
    Audio,
    PlayAudio,
    Notes(Option<PathBuf>),
    Quiz,
    /// Zero-based option index.
    Select(usize),
    Submit,
    Continue,
    Retry,
    Ask(String),
    Voice,
    Certificate(Option<PathBuf>),
    Share,
    Reset,
    Quit,
}

impl Command {
    /// Parses one REPL line. `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let path = || (!rest.is_empty()).then(|| PathBuf::from(rest));

        let command = match word.to_lowercase().as_str() {
            "help" | "?" => Command::Help,
            "outline" | "menu" => Command::Outline,
            "open" | "go" => {
                if rest.is_empty() {
                    return Err("usage: open <lesson id|certificate>".to_string());
                }
                Command::Open(rest.to_string())
            }
            "next" => Command::Next,
            "lesson" => Command::Lesson,
            "video" => Command::Video,
            "summary" => Command::Summary,
            "retry-video" => Command::RetryVideo,
            "audio" => Command::Audio,
            "play-audio" => Command::PlayAudio,
            "notes" => Command::Notes(path()),
            "quiz" => Command::Quiz,
            "select" => {
                let n: usize = rest
                    .parse()
                    .map_err(|_| "usage: select <option number>".to_string())?;
                if n == 0 {
                    return Err("options are numbered from 1".to_string());
                }
                Command::Select(n - 1)
            }
            "submit" => Command::Submit,
            "continue" => Command::Continue,
            "retry" => Command::Retry,
            "ask" => {
                if rest.is_empty() {
                    return Err("usage: ask <question>".to_string());
                }
                Command::Ask(rest.to_string())
            }
            "voice" => Command::Voice,
            "certificate" => Command::Certificate(path()),
            "share" => Command::Share,
            "reset" => Command::Reset,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command '{other}', type help")),
        };
        Ok(Some(command))
    }
}

pub const HELP: &[(&str, &str)] = &[
    ("outline", "show lessons and progress"),
    ("open <id|certificate>", "go to a lesson or the certificate"),
    ("next", "go to the next lesson"),
    ("lesson", "show the current lesson again"),
    ("video", "video tab (generates the lecture video)"),
    ("summary", "summary and key takeaways tab"),
    ("retry-video", "retry a failed video generation"),
    ("audio", "audio lecture status"),
    ("play-audio", "play the audio lecture"),
    ("notes [path]", "export lecture notes"),
    ("quiz", "start (or review) the lesson quiz"),
    ("select <n>", "pick an answer"),
    ("submit", "check the picked answer"),
    ("continue", "next question / finish"),
    ("retry", "retake a failed quiz"),
    ("ask <question>", "ask the AI tutor"),
    ("voice", "ask the AI tutor by voice"),
    ("certificate [path]", "view and download the certificate"),
    ("share", "show the shareable message"),
    ("reset", "erase all progress"),
    ("quit", "leave"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arguments() {
        assert_eq!(Command::parse("  "), Ok(None));
        assert_eq!(Command::parse("select 2"), Ok(Some(Command::Select(1))));
        assert_eq!(
            Command::parse("ask  what is scope 3? "),
            Ok(Some(Command::Ask("what is scope 3?".into())))
        );
        assert_eq!(
            Command::parse("certificate out/cert.pdf"),
            Ok(Some(Command::Certificate(Some(PathBuf::from("out/cert.pdf")))))
        );
        assert_eq!(Command::parse("notes"), Ok(Some(Command::Notes(None))));
        assert_eq!(Command::parse("OPEN l2"), Ok(Some(Command::Open("l2".into()))));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Command::parse("select 0").is_err());
        assert!(Command::parse("select x").is_err());
        assert!(Command::parse("open").is_err());
        assert!(Command::parse("dance").is_err());
    }
}
