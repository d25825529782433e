use std::fmt;
use std::str::FromStr;

/// The submission categories that govern how form fields map onto a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    InterviewBased,
    ScenarioBased,
    MultipleChoice,
    LiveInterview,
    CommunityDriven,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 5] = [
        QuestionKind::InterviewBased,
        QuestionKind::ScenarioBased,
        QuestionKind::MultipleChoice,
        QuestionKind::LiveInterview,
        QuestionKind::CommunityDriven,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::InterviewBased => "interview_based",
            QuestionKind::ScenarioBased => "scenario_based",
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::LiveInterview => "live_interview",
            QuestionKind::CommunityDriven => "community_driven",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown question kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownKind {}

/// Exact, case-sensitive match: submissions carry the canonical lower-case names.
impl FromStr for QuestionKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
