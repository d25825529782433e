use super::kind::QuestionKind;
use super::record::QuestionRecord;
use std::collections::HashMap;
use tracing::warn;

/// Flat form input, as decoded from an `application/x-www-form-urlencoded` body.
pub type FormFields = HashMap<String, String>;

/// Decode a urlencoded body. When a field name repeats, its first value wins.
pub fn parse_form(body: &[u8]) -> FormFields {
    let mut fields = FormFields::new();
    for (name, value) in url::form_urlencoded::parse(body) {
        fields
            .entry(name.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    fields
}

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_DIFFICULTY: &str = "Medium";

fn field(form: &FormFields, name: &str) -> String {
    form.get(name).cloned().unwrap_or_default()
}

fn field_or(form: &FormFields, name: &str, default: &str) -> String {
    form.get(name)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

/// Build the record for a submission of the declared `kind`.
///
/// Defaults apply only to absent fields; a present-but-empty field stays empty.
/// An unrecognized kind yields a record whose kind-specific fields are all empty,
/// with the declared kind still written to the `type` column.
pub fn shape(kind: &str, form: &FormFields) -> QuestionRecord {
    let mut record = QuestionRecord {
        category: field_or(form, "category", DEFAULT_CATEGORY),
        difficulty: field_or(form, "difficulty", DEFAULT_DIFFICULTY),
        kind: kind.to_string(),
        author_name: field(form, "author_name"),
        ..Default::default()
    };

    match kind.parse::<QuestionKind>() {
        Ok(
            QuestionKind::InterviewBased
            | QuestionKind::LiveInterview
            | QuestionKind::CommunityDriven,
        ) => {
            record.question = field(form, "question");
            record.answer = field(form, "answer");
        }
        Ok(QuestionKind::ScenarioBased) => {
            record.question = field(form, "scenario_question");
            record.context = field(form, "context");
            record.troubleshoot_step = field(form, "troubleshoot_step");
            record.root_cause = field(form, "root_cause");
            record.things_to_avoid = field(form, "things_to_avoid");
            record.answer = format!(
                "Context: {}\nTroubleshoot: {}\nRoot Cause: {}\nAvoid: {}",
                record.context, record.troubleshoot_step, record.root_cause, record.things_to_avoid
            );
        }
        Ok(QuestionKind::MultipleChoice) => {
            record.question = field(form, "mcq_question");
            record.option_a = field(form, "option_a");
            record.option_b = field(form, "option_b");
            record.option_c = field(form, "option_c");
            record.option_d = field(form, "option_d");
            record.correct_answer = field(form, "correct_answer");
            record.answer = record.correct_answer.clone();
        }
        Err(e) => {
            warn!(error = %e, "submission kind not recognized; kind-specific fields left empty");
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::record::COLUMN_COUNT;

    fn form(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn shared_fields_fall_back_to_defaults_for_every_kind() {
        for kind in QuestionKind::ALL {
            let record = shape(kind.as_str(), &FormFields::new());
            assert_eq!(record.author_name, "");
            assert_eq!(record.category, "General");
            assert_eq!(record.difficulty, "Medium");
            assert_eq!(record.kind, kind.as_str());
            assert_eq!(record.into_row().len(), COLUMN_COUNT);
        }
    }

    #[test]
    fn shared_fields_are_taken_from_input() {
        let input = form(&[
            ("author_name", "Ada"),
            ("category", "Kubernetes"),
            ("difficulty", "Hard"),
        ]);
        for kind in QuestionKind::ALL {
            let record = shape(kind.as_str(), &input);
            assert_eq!(record.author_name, "Ada");
            assert_eq!(record.category, "Kubernetes");
            assert_eq!(record.difficulty, "Hard");
        }
    }

    #[test]
    fn present_but_empty_category_is_kept_empty() {
        let record = shape("interview_based", &form(&[("category", "")]));
        assert_eq!(record.category, "");
    }

    #[test]
    fn scenario_answer_is_synthesized_from_labeled_parts() {
        let input = form(&[
            ("scenario_question", "Pod keeps restarting"),
            ("context", "C"),
            ("troubleshoot_step", "T"),
            ("root_cause", "R"),
            ("things_to_avoid", "A"),
        ]);
        let record = shape("scenario_based", &input);
        assert_eq!(record.question, "Pod keeps restarting");
        assert_eq!(
            record.answer,
            "Context: C\nTroubleshoot: T\nRoot Cause: R\nAvoid: A"
        );

        let row = record.into_row();
        assert_eq!(row[11], "C");
        assert_eq!(row[12], "T");
        assert_eq!(row[13], "R");
        assert_eq!(row[14], "A");
    }

    #[test]
    fn multiple_choice_answer_mirrors_correct_answer() {
        let input = form(&[
            ("mcq_question", "Which port does HTTPS use?"),
            ("option_a", "80"),
            ("option_b", "443"),
            ("option_c", "22"),
            ("option_d", "21"),
            ("correct_answer", "B"),
        ]);
        let row = shape("multiple_choice", &input).into_row();
        assert_eq!(row[0], "Which port does HTTPS use?");
        assert_eq!(row[1], "B");
        assert_eq!(row[10], "B");
        assert_eq!(&row[6..10], ["80", "443", "22", "21"]);
    }

    #[test]
    fn plain_kinds_take_question_and_answer_directly() {
        let input = form(&[
            ("question", "What is a VPC?"),
            ("answer", "A virtual network"),
            ("mcq_question", "ignored"),
        ]);
        for kind in ["interview_based", "live_interview", "community_driven"] {
            let record = shape(kind, &input);
            assert_eq!(record.question, "What is a VPC?");
            assert_eq!(record.answer, "A virtual network");
            assert_eq!(record.correct_answer, "");
        }
    }

    #[test]
    fn repeated_fields_keep_their_first_value() {
        let fields =
            parse_form(b"question_type=live_interview&question=first&question=second&answer=a+b");
        assert_eq!(fields["question"], "first");
        assert_eq!(fields["answer"], "a b");
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn unknown_kind_leaves_kind_specific_fields_empty() {
        let input = form(&[("question", "q"), ("answer", "a"), ("category", "Linux")]);
        let record = shape("trivia", &input);
        assert_eq!(record.kind, "trivia");
        assert_eq!(record.category, "Linux");
        assert_eq!(record.question, "");
        assert_eq!(record.answer, "");
    }
}
