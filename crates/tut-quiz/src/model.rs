use serde::{Deserialize, Serialize};

/// A generated quiz: three difficulty tiers, each an ordered list of
/// multiple-choice questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// Easy questions
    pub easy: Vec<Question>,
    /// Medium questions
    pub medium: Vec<Question>,
    /// Hard questions
    pub hard: Vec<Question>,
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question text. The generation wire format abbreviates this as `q`.
    #[serde(alias = "q")]
    pub prompt: String,
    /// Ordered answer options.
    pub options: Vec<String>,
    /// Index into `options` marking the correct one.
    pub answer: usize,
}

impl Question {
    /// A question survives repair when it has a prompt, at least two options,
    /// and an answer index that points at one of them.
    pub fn is_well_formed(&self) -> bool {
        !self.prompt.trim().is_empty()
            && self.options.len() >= 2
            && self.answer < self.options.len()
    }
}

impl Quiz {
    /// Drop malformed questions from every tier.
    pub fn retain_well_formed(&mut self) {
        self.easy.retain(Question::is_well_formed);
        self.medium.retain(Question::is_well_formed);
        self.hard.retain(Question::is_well_formed);
    }

    /// Name of the first tier with no questions left, if any.
    pub fn empty_tier(&self) -> Option<&'static str> {
        if self.easy.is_empty() {
            Some("easy")
        } else if self.medium.is_empty() {
            Some("medium")
        } else if self.hard.is_empty() {
            Some("hard")
        } else {
            None
        }
    }

    /// Total number of questions across all tiers.
    pub fn question_count(&self) -> usize {
        self.easy.len() + self.medium.len() + self.hard.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(prompt: &str, options: usize, answer: usize) -> Question {
        Question {
            prompt: prompt.to_string(),
            options: (0..options).map(|i| format!("option {i}")).collect(),
            answer,
        }
    }

    #[test]
    fn test_question_well_formed() {
        assert!(question("What is a loop?", 4, 0).is_well_formed());
        assert!(question("Last option correct", 4, 3).is_well_formed());

        // Answer index past the options
        assert!(!question("Bad index", 4, 4).is_well_formed());
        // A single option is not a choice
        assert!(!question("One option", 1, 0).is_well_formed());
        // Blank prompt
        assert!(!question("   ", 4, 0).is_well_formed());
    }

    #[test]
    fn test_retain_well_formed_drops_broken_questions() {
        let mut quiz = Quiz {
            easy: vec![question("good", 4, 1), question("bad", 4, 9)],
            medium: vec![question("good", 3, 2)],
            hard: vec![question("good", 2, 0), question("", 4, 0)],
        };

        quiz.retain_well_formed();

        assert_eq!(quiz.easy.len(), 1);
        assert_eq!(quiz.medium.len(), 1);
        assert_eq!(quiz.hard.len(), 1);
        assert_eq!(quiz.question_count(), 3);
        assert_eq!(quiz.empty_tier(), None);
    }

    #[test]
    fn test_empty_tier_reports_first_gap() {
        let quiz = Quiz {
            easy: vec![question("good", 4, 0)],
            medium: vec![],
            hard: vec![],
        };
        assert_eq!(quiz.empty_tier(), Some("medium"));
    }

    #[test]
    fn test_wire_format_accepts_q_alias() {
        let json = r#"{"q": "What repeats code?", "options": ["a loop", "a constant"], "answer": 0}"#;
        let parsed: Question = serde_json::from_str(json).expect("question should parse");
        assert_eq!(parsed.prompt, "What repeats code?");
        assert_eq!(parsed.answer, 0);

        // Our own serialization uses the full field name.
        let out = serde_json::to_string(&parsed).expect("question should serialize");
        assert!(out.contains("\"prompt\""));
    }
}
