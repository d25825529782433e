use super::record::{StoredRow, TYPE_HEADER};
use serde::Serialize;

/// Type label assumed for rows without a `Type` cell. It matches no bucket.
pub const MISSING_TYPE: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    InterviewBased,
    Scenario,
    LiveInterview,
    CommunityDriven,
}

impl Bucket {
    /// Case-insensitive exact match on the stored type label.
    pub fn for_type(type_label: &str) -> Option<Bucket> {
        match type_label.to_lowercase().as_str() {
            "interview_based" | "multiple_choice" => Some(Bucket::InterviewBased),
            "scenario_based" => Some(Bucket::Scenario),
            "live_interview" => Some(Bucket::LiveInterview),
            "community_driven" => Some(Bucket::CommunityDriven),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Buckets {
    pub interview_based_questions: Vec<StoredRow>,
    pub scenario_questions: Vec<StoredRow>,
    pub live_interview_questions: Vec<StoredRow>,
    pub community_driven_questions: Vec<StoredRow>,
}

impl Buckets {
    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<StoredRow> {
        match bucket {
            Bucket::InterviewBased => &mut self.interview_based_questions,
            Bucket::Scenario => &mut self.scenario_questions,
            Bucket::LiveInterview => &mut self.live_interview_questions,
            Bucket::CommunityDriven => &mut self.community_driven_questions,
        }
    }

    pub fn len(&self) -> usize {
        self.interview_based_questions.len()
            + self.scenario_questions.len()
            + self.live_interview_questions.len()
            + self.community_driven_questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition rows into display buckets, keeping source order and dropping unknown types.
pub fn categorize(rows: impl IntoIterator<Item = StoredRow>) -> Buckets {
    let mut buckets = Buckets::default();
    for row in rows {
        let label = row
            .get(TYPE_HEADER)
            .map(String::as_str)
            .unwrap_or(MISSING_TYPE);
        if let Some(bucket) = Bucket::for_type(label) {
            buckets.bucket_mut(bucket).push(row);
        }
    }
    buckets
}
