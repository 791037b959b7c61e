pub mod assets;
pub mod dispatcher;
pub mod guard;
pub mod lecture;
pub mod tutor;
pub mod video;

#[cfg(test)]
pub(crate) mod testing;

pub use assets::{GenerationCache, LectureAsset};
pub use dispatcher::{GenerationDispatcher, GenerationEvent, GenerationEvents, GenerationOutput};
pub use guard::{AssetKind, GenerationGuard, SlotState};
pub use lecture::{LectureAudio, generate_lecture};
pub use tutor::VoiceReply;
pub use video::{VideoSettings, generate_lesson_video};
