use anyhow::Result;
use inquire::list_option::ListOption;
use inquire::validator::Validation;
use inquire::{Confirm, InquireError, MultiSelect, Select, Text};
use std::cell::RefCell;
use std::collections::VecDeque;

/// A question for the user. Each variant carries its own validation contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptRequest {
    /// Pick exactly one of `options`
    Select {
        message: String,
        options: Vec<String>,
    },
    /// Pick at least `min_items` of `options`; answers keep menu order
    MultiSelect {
        message: String,
        options: Vec<String>,
        min_items: usize,
    },
    /// Free text of at least `min_length` characters, `default` pre-filled when non-empty
    TextInput {
        message: String,
        default: String,
        min_length: usize,
    },
    /// Yes or no
    Confirm { message: String, default: bool },
}

impl PromptRequest {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            PromptRequest::Select { message, .. }
            | PromptRequest::MultiSelect { message, .. }
            | PromptRequest::TextInput { message, .. }
            | PromptRequest::Confirm { message, .. } => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Selected(String),
    MultiSelected(Vec<String>),
    Text(String),
    Confirmed(bool),
}

/// Result of asking: an answer, or the user backed out (Esc / Ctrl-C)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Answered(PromptResponse),
    Cancelled,
}

/// Trait for asking the user questions
/// This allows us to drive the workflow without a terminal in tests
pub trait Prompter {
    /// Ask `request` and wait for the answer
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be used for prompting.
    /// Cancellation is not an error, it is reported as [`PromptOutcome::Cancelled`].
    fn prompt(&self, request: &PromptRequest) -> Result<PromptOutcome>;
}

/// Error for an answer whose kind doesn't match the question
#[must_use]
pub fn unexpected_response(request: &PromptRequest, response: &PromptResponse) -> anyhow::Error {
    anyhow::anyhow!(
        "Unexpected answer {:?} to prompt '{}'",
        response,
        request.message()
    )
}

fn min_items_error(selected: usize, min_items: usize) -> Option<String> {
    (selected < min_items).then(|| format!("Select at least {} item(s)", min_items))
}

fn min_length_error(input: &str, min_length: usize) -> Option<String> {
    (input.chars().count() < min_length)
        .then(|| format!("Must be at least {} characters long", min_length))
}

/// Real implementation using inquire for production use
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn prompt(&self, request: &PromptRequest) -> Result<PromptOutcome> {
        let answer = match request {
            PromptRequest::Select { message, options } => Select::new(message, options.clone())
                .with_page_size(10)
                .with_vim_mode(true)
                .prompt()
                .map(PromptResponse::Selected),
            PromptRequest::MultiSelect {
                message,
                options,
                min_items,
            } => {
                let min_items = *min_items;
                MultiSelect::new(message, options.clone())
                    .with_page_size(15)
                    .with_keep_filter(true)
                    .with_validator(move |selected: &[ListOption<&String>]| {
                        Ok(match min_items_error(selected.len(), min_items) {
                            Some(error) => Validation::Invalid(error.into()),
                            None => Validation::Valid,
                        })
                    })
                    .prompt()
                    .map(PromptResponse::MultiSelected)
            }
            PromptRequest::TextInput {
                message,
                default,
                min_length,
            } => {
                let min_length = *min_length;
                let mut text = Text::new(message).with_validator(move |input: &str| {
                    Ok(match min_length_error(input, min_length) {
                        Some(error) => Validation::Invalid(error.into()),
                        None => Validation::Valid,
                    })
                });
                if !default.is_empty() {
                    text = text.with_default(default);
                }
                text.prompt().map(PromptResponse::Text)
            }
            PromptRequest::Confirm { message, default } => Confirm::new(message)
                .with_default(*default)
                .prompt()
                .map(PromptResponse::Confirmed),
        };

        match answer {
            Ok(response) => Ok(PromptOutcome::Answered(response)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Ok(PromptOutcome::Cancelled)
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to prompt for input")),
        }
    }
}

/// Mock implementation for testing that replays scripted answers in order
///
/// Answers must fit the question they are given to: same kind, and picked
/// values must be among the offered options. Length and count minimums are
/// left to the caller so its own checks can be exercised.
#[derive(Default)]
pub struct MockPrompter {
    answers: RefCell<VecDeque<PromptOutcome>>,
    requests: RefCell<Vec<PromptRequest>>,
}

impl MockPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn answer(self, response: PromptResponse) -> Self {
        self.answers
            .borrow_mut()
            .push_back(PromptOutcome::Answered(response));
        self
    }

    #[must_use]
    pub fn cancel(self) -> Self {
        self.answers.borrow_mut().push_back(PromptOutcome::Cancelled);
        self
    }

    /// Every question asked so far
    #[must_use]
    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.borrow().clone()
    }
}

impl Prompter for MockPrompter {
    fn prompt(&self, request: &PromptRequest) -> Result<PromptOutcome> {
        self.requests.borrow_mut().push(request.clone());

        let Some(outcome) = self.answers.borrow_mut().pop_front() else {
            anyhow::bail!("No scripted answer for prompt '{}'", request.message());
        };

        if let PromptOutcome::Answered(response) = &outcome {
            let fits = match (request, response) {
                (PromptRequest::Select { options, .. }, PromptResponse::Selected(choice)) => {
                    options.contains(choice)
                }
                (
                    PromptRequest::MultiSelect { options, .. },
                    PromptResponse::MultiSelected(choices),
                ) => choices.iter().all(|choice| options.contains(choice)),
                (PromptRequest::TextInput { .. }, PromptResponse::Text(_))
                | (PromptRequest::Confirm { .. }, PromptResponse::Confirmed(_)) => true,
                _ => false,
            };
            if !fits {
                return Err(unexpected_response(request, response));
            }
        }

        Ok(outcome)
    }
}
