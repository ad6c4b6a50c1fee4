//! The fixed question catalogue.
//!
//! The bank is built once and shared read-only. A question's position in the
//! bank is its identifier everywhere in the pipeline.

use std::sync::{Arc, OnceLock};

use crate::model::Question;

/// Ordered, immutable sequence of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

/// A structural problem found by [`QuestionBank::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankViolation {
    pub question: usize,
    pub message: String,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// The standard 15-question catalogue, built on first use.
    pub fn standard() -> Arc<QuestionBank> {
        static BANK: OnceLock<Arc<QuestionBank>> = OnceLock::new();
        BANK.get_or_init(|| Arc::new(QuestionBank::new(standard_questions())))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Index of the correct (maximum-score) option for question `index`.
    pub fn correct_index(&self, index: usize) -> Option<usize> {
        self.get(index).map(Question::correct_index)
    }

    /// Correct option index for every question, in bank order.
    pub fn correct_indices(&self) -> Vec<usize> {
        self.questions.iter().map(Question::correct_index).collect()
    }

    /// Highest total any answer vector can reach.
    pub fn max_total(&self) -> i32 {
        self.questions.iter().map(Question::max_score).sum()
    }

    /// Check that every question has at least two options and one score per option.
    pub fn validate(&self) -> Vec<BankViolation> {
        let mut violations = Vec::new();
        for (i, q) in self.questions.iter().enumerate() {
            if q.options.len() < 2 {
                violations.push(BankViolation {
                    question: i,
                    message: format!("needs at least 2 options, has {}", q.options.len()),
                });
            }
            if q.options.len() != q.scores.len() {
                violations.push(BankViolation {
                    question: i,
                    message: format!(
                        "{} options but {} scores",
                        q.options.len(),
                        q.scores.len()
                    ),
                });
            }
        }
        violations
    }
}

fn standard_questions() -> Vec<Question> {
    vec![
        Question::new(
            "Which of the following best describes a 'for' loop?",
            &[
                "A conditional statement",
                "A way to store multiple values",
                "A control flow statement for iterating",
                "A function that calls itself",
            ],
            &[2, 3, 10, 1],
        ),
        Question::new(
            "How would you efficiently create a new list of only even numbers from an existing list?",
            &[
                "Series of 'if-else' statements",
                "A loop that checks each number",
                "A function for every possible number",
                "Store numbers in separate variables",
            ],
            &[3, 10, 1, 2],
        ),
        Question::new(
            "What is the primary purpose of a function in programming?",
            &[
                "To stop the program",
                "To store data",
                "To group reusable code",
                "To create comments",
            ],
            &[1, 3, 10, 2],
        ),
        Question::new(
            "If a coin is flipped twice, what is the probability of getting two heads?",
            &["1/2", "1/3", "1/4", "1"],
            &[3, 2, 10, 1],
        ),
        Question::new(
            "What does the 'mean' of a dataset represent?",
            &[
                "The middle value",
                "The most frequent value",
                "The average of all values",
                "The range of values",
            ],
            &[4, 3, 10, 2],
        ),
        Question::new(
            "An upward trend in a graph where both variables increase together is called:",
            &[
                "Negative correlation",
                "Positive correlation",
                "No correlation",
                "A statistical error",
            ],
            &[1, 10, 2, 1],
        ),
        Question::new(
            "What is the role of a server in a client-server relationship?",
            &[
                "To request information",
                "To provide resources or services",
                "The user's main computer",
                "To protect from viruses",
            ],
            &[3, 10, 2, 4],
        ),
        Question::new(
            "Which of the following best describes 'the cloud'?",
            &[
                "A single, massive computer",
                "A network of servers accessed via internet",
                "A personal storage device",
                "Software for documents",
            ],
            &[2, 10, 1, 1],
        ),
        Question::new(
            "What is an API (Application Programming Interface)?",
            &[
                "A visual user interface",
                "A set of rules for app communication",
                "A database for storage",
                "A security protocol",
            ],
            &[3, 10, 2, 4],
        ),
        Question::new(
            "When designing a website, what is the most important consideration?",
            &[
                "Using many colors",
                "Intuitive user navigation",
                "Complex animations",
                "Smallest font size",
            ],
            &[2, 10, 1, 1],
        ),
        Question::new(
            "What's the best way to create visual hierarchy on a poster?",
            &[
                "Make all text the same",
                "Make important info larger/bolder",
                "Put least important info at top",
                "Fill every empty space",
            ],
            &[1, 10, 1, 2],
        ),
        Question::new(
            "What is the primary goal of UX (User Experience) design?",
            &[
                "Making a product look appealing",
                "Focusing on branding/logo",
                "Enhancing usability and accessibility",
                "Writing the application code",
            ],
            &[4, 2, 10, 1],
        ),
        Question::new(
            "What's a constructive way to handle disagreement with a teammate?",
            &[
                "Ignore their idea",
                "Publicly criticize them",
                "Discuss pros and cons together",
                "Complain to someone else",
            ],
            &[1, 1, 10, 1],
        ),
        Question::new(
            "What is the main purpose of version control software like Git?",
            &[
                "To write code automatically",
                "To track changes and manage collaboration",
                "To design the UI",
                "To store only the final version",
            ],
            &[1, 10, 1, 2],
        ),
        Question::new(
            "When presenting to stakeholders, it's most important to:",
            &[
                "Use highly technical jargon",
                "Focus only on what went wrong",
                "Clearly communicate progress and challenges",
                "Make the presentation as long as possible",
            ],
            &[1, 1, 10, 1],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bank_has_fifteen_valid_questions() {
        let bank = QuestionBank::standard();
        assert_eq!(bank.len(), 15);
        assert!(bank.validate().is_empty());
        assert_eq!(bank.max_total(), 150);
    }

    #[test]
    fn standard_bank_is_shared() {
        let a = QuestionBank::standard();
        let b = QuestionBank::standard();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn correct_indices_match_best_answers() {
        let bank = QuestionBank::standard();
        assert_eq!(
            bank.correct_indices(),
            vec![2, 1, 2, 2, 2, 1, 1, 1, 1, 1, 1, 2, 2, 1, 2]
        );
        assert_eq!(bank.correct_index(0), Some(2));
        assert_eq!(bank.correct_index(15), None);
    }

    #[test]
    fn validate_flags_broken_questions() {
        let bank = QuestionBank::new(vec![
            Question::new("one option", &["only"], &[1]),
            Question::new("mismatch", &["a", "b"], &[1, 2, 3]),
        ]);
        let violations = bank.validate();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].question, 0);
        assert!(violations[1].message.contains("2 options but 3 scores"));
    }
}
