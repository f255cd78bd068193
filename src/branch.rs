use anyhow::Result;

use crate::commits::Commit;
use crate::error::PickError;
use crate::prompt::{PromptOutcome, PromptRequest, PromptResponse, Prompter, unexpected_response};
use crate::slug::slugify;

pub const MIN_BRANCH_NAME_LENGTH: usize = 3;

/// Checks the minimum branch name length, counted in characters
///
/// # Errors
/// Returns [`PickError::BranchNameTooShort`] for names under [`MIN_BRANCH_NAME_LENGTH`]
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.chars().count() < MIN_BRANCH_NAME_LENGTH {
        return Err(PickError::BranchNameTooShort {
            name: name.to_string(),
            min: MIN_BRANCH_NAME_LENGTH,
        }
        .into());
    }
    Ok(())
}

/// Default branch name: the slugged message of a lone commit, otherwise empty
#[must_use]
pub fn suggest_branch_name(commits: &[Commit]) -> String {
    match commits {
        [single] => slugify(single.message()),
        _ => String::new(),
    }
}

/// Picks the branch name, from `--branch` if given, otherwise by asking
///
/// # Errors
/// Returns an error if:
/// - The name is too short (no second chance is given)
/// - The user cancels the prompt
/// - The prompt fails
pub fn choose_branch_name(
    explicit: Option<&str>,
    commits: &[Commit],
    prompter: &dyn Prompter,
) -> Result<String> {
    let name = match explicit {
        Some(name) => name.to_string(),
        None => {
            let request = PromptRequest::TextInput {
                message: "Branch name:".to_string(),
                default: suggest_branch_name(commits),
                min_length: MIN_BRANCH_NAME_LENGTH,
            };
            match prompter.prompt(&request)? {
                PromptOutcome::Answered(PromptResponse::Text(name)) => name,
                PromptOutcome::Answered(other) => {
                    return Err(unexpected_response(&request, &other));
                }
                PromptOutcome::Cancelled => return Err(PickError::Cancelled.into()),
            }
        }
    };

    validate_branch_name(&name)?;
    Ok(name)
}
