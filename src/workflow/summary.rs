use anyhow::Result;
use console::{Style, measure_text_width, style};

use crate::error::PickError;
use crate::prompt::{PromptOutcome, PromptRequest, PromptResponse, Prompter, unexpected_response};
use crate::workflow::PickSettings;

const HORIZONTAL: &str = "─";
const PREFIX: &str = "│  ";
const SUFFIX: &str = "  │";

/// Draws a box around `message`, one row per line.
///
/// Widths ignore ANSI escape sequences so colored lines line up.
#[must_use]
pub fn format_in_box(message: &str) -> String {
    let border = Style::new().cyan();
    let lines: Vec<&str> = message.split('\n').collect();
    let width = lines
        .iter()
        .map(|line| measure_text_width(line))
        .max()
        .unwrap_or(0);
    let horizontal_line =
        HORIZONTAL.repeat(width + measure_text_width(PREFIX) + measure_text_width(SUFFIX) - 2);

    let mut out = format!("{}\n", border.apply_to(format!("┌{}┐", horizontal_line)));
    for line in lines {
        let padding = " ".repeat(width - measure_text_width(line));
        out.push_str(&format!(
            "{}{}{}{}\n",
            border.apply_to(PREFIX),
            line,
            padding,
            border.apply_to(SUFFIX)
        ));
    }
    out.push_str(&border.apply_to(format!("└{}┘", horizontal_line)).to_string());
    out
}

/// What is about to happen, one fact per line
#[must_use]
pub fn render_summary(settings: &PickSettings) -> String {
    let info = style("ℹ ").green().bright();
    let mut commit_lines = String::new();
    for commit in settings.commits() {
        commit_lines.push_str(&format!(
            "\n   └▷ {} {}",
            style(commit.sha()).magenta(),
            style(commit.message()).cyan()
        ));
    }

    [
        format!("{}About to cherry pick commits:{}", info, commit_lines),
        format!(
            "{}Base branch: {}/{}",
            info,
            style(settings.pull_remote()).cyan(),
            style(settings.upstream_branch()).cyan()
        ),
        format!("{}Branch name: {}", info, style(settings.branch_name()).cyan()),
    ]
    .join("\n")
}

/// Shows the summary and asks whether to go on
///
/// With `assume_yes` the summary is still shown but nothing is asked.
///
/// # Errors
/// Returns [`PickError::Cancelled`] if the prompt is interrupted, or an error if prompting fails
pub fn confirm_settings(
    settings: &PickSettings,
    prompter: &dyn Prompter,
    assume_yes: bool,
) -> Result<bool> {
    println!("{}", format_in_box(&render_summary(settings)));
    if assume_yes {
        return Ok(true);
    }

    let request = PromptRequest::Confirm {
        message: "Continue?".to_string(),
        default: false,
    };
    match prompter.prompt(&request)? {
        PromptOutcome::Answered(PromptResponse::Confirmed(answer)) => Ok(answer),
        PromptOutcome::Answered(other) => Err(unexpected_response(&request, &other)),
        PromptOutcome::Cancelled => Err(PickError::Cancelled.into()),
    }
}
