pub mod question;
pub mod suggestion;

pub use question::{ItemType, Question, QuestionOption};
pub use suggestion::{Comment, Suggestion, SuggestionStatus};
