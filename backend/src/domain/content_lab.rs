//! Content lab: generative drafts of phishing templates and training quizzes.
//!
//! Each content type pairs a fixed system prompt with the operator's prompt.
//! Failures are returned as [`ContentOutcome::Failed`] carrying the message
//! shown to the operator.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{ContentGenerator, ContentLabCommand, ContentOutcome};

pub const NOT_CONFIGURED_MESSAGE: &str = "Error: Gemini AI model is not configured. Check API key.";
pub const INVALID_TYPE_MESSAGE: &str = "Error: Invalid content type specified.";

const PHISHING_EMAIL_PROMPT: &str = "You are a cybersecurity expert specializing in creating \
realistic phishing email templates for security awareness training.
Your task is to generate a complete, well-formatted HTML email based on the user's prompt.
The email must contain a clear call-to-action link. For the link's href, you MUST use the exact \
placeholder '{{.URL}}'.
Do not add any explanations. Only output the raw HTML code.";

const QUIZ_PROMPT: &str = "You are an expert in instructional design for cybersecurity.
Your task is to create a set of multiple-choice quiz questions based on the user's prompt.
Format the output in a clean, human-readable text format. For each question, provide the \
question, four options (A, B, C, D), and clearly indicate the correct answer.
Do not add any explanations. Only output the formatted quiz questions and answers.";

/// Kinds of content the lab can draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    /// HTML phishing email template using the `{{.URL}}` link placeholder.
    PhishingEmail,
    /// Multiple-choice quiz for a remedial course.
    MoodleQuiz,
}

impl ContentType {
    /// Instructions prepended to the operator's prompt.
    pub const fn system_prompt(self) -> &'static str {
        match self {
            Self::PhishingEmail => PHISHING_EMAIL_PROMPT,
            Self::MoodleQuiz => QUIZ_PROMPT,
        }
    }

    /// Assemble the full prompt sent to the generator.
    ///
    /// # Examples
    /// ```
    /// use dashboard::domain::ContentType;
    ///
    /// let prompt = ContentType::MoodleQuiz.full_prompt("password reuse");
    /// assert!(prompt.ends_with("\n\nUser Prompt: password reuse"));
    /// ```
    pub fn full_prompt(self, prompt: &str) -> String {
        format!("{}\n\nUser Prompt: {prompt}", self.system_prompt())
    }
}

impl FromStr for ContentType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "phishing_email" => Ok(Self::PhishingEmail),
            "moodle_quiz" => Ok(Self::MoodleQuiz),
            _ => Err(()),
        }
    }
}

/// Implements [`ContentLabCommand`]; the generator is absent when no API key
/// was configured.
#[derive(Clone)]
pub struct ContentLabService {
    generator: Option<Arc<dyn ContentGenerator>>,
}

impl ContentLabService {
    pub fn new(generator: Option<Arc<dyn ContentGenerator>>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl ContentLabCommand for ContentLabService {
    async fn generate(&self, content_type: &str, prompt: &str) -> ContentOutcome {
        let Some(generator) = &self.generator else {
            return ContentOutcome::Failed(NOT_CONFIGURED_MESSAGE.to_owned());
        };
        let Ok(kind) = content_type.parse::<ContentType>() else {
            return ContentOutcome::Failed(INVALID_TYPE_MESSAGE.to_owned());
        };

        match generator.generate(&kind.full_prompt(prompt)).await {
            Ok(text) => {
                info!(content_type, chars = text.len(), "content generated");
                ContentOutcome::Generated(text)
            }
            Err(error) => {
                warn!(content_type, error = %error, "content generation failed");
                ContentOutcome::Failed(format!(
                    "An error occurred while generating content: {error}"
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{ContentGeneratorError, MockContentGenerator};
    use rstest::rstest;

    fn service(generator: MockContentGenerator) -> ContentLabService {
        ContentLabService::new(Some(Arc::new(generator)))
    }

    #[rstest]
    #[case("phishing_email", Some(ContentType::PhishingEmail))]
    #[case("moodle_quiz", Some(ContentType::MoodleQuiz))]
    #[case("newsletter", None)]
    #[case("", None)]
    fn content_types_parse(#[case] raw: &str, #[case] expected: Option<ContentType>) {
        assert_eq!(raw.parse::<ContentType>().ok(), expected);
    }

    #[rstest]
    fn phishing_prompt_demands_url_placeholder() {
        assert!(ContentType::PhishingEmail.system_prompt().contains("'{{.URL}}'"));
    }

    #[tokio::test]
    async fn dispatches_full_prompt_to_generator() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt| {
                prompt.starts_with("You are a cybersecurity expert")
                    && prompt.ends_with("\n\nUser Prompt: payroll update")
            })
            .times(1)
            .return_once(|_| Ok("<html></html>".to_owned()));

        let outcome = service(generator)
            .generate("phishing_email", "payroll update")
            .await;

        assert_eq!(outcome, ContentOutcome::Generated("<html></html>".to_owned()));
    }

    #[tokio::test]
    async fn unknown_type_never_reaches_generator() {
        let mut generator = MockContentGenerator::new();
        generator.expect_generate().never();

        let outcome = service(generator).generate("poster", "anything").await;

        assert_eq!(outcome.text(), INVALID_TYPE_MESSAGE);
    }

    #[tokio::test]
    async fn missing_generator_reports_configuration() {
        let outcome = ContentLabService::new(None)
            .generate("moodle_quiz", "phishing signs")
            .await;

        assert_eq!(outcome, ContentOutcome::Failed(NOT_CONFIGURED_MESSAGE.to_owned()));
    }

    #[tokio::test]
    async fn generator_errors_are_wrapped() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate()
            .return_once(|_| Err(ContentGeneratorError::empty_response()));

        let outcome = service(generator).generate("moodle_quiz", "mfa").await;

        assert_eq!(
            outcome.text(),
            "An error occurred while generating content: content generator returned no text"
        );
    }
}
