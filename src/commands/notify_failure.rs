//! Send CI failure notification command.
//!
//! This command posts an adaptive-card message to an incoming-webhook URL
//! when a workflow fails, so the team chat shows which repository and
//! workflow broke along with a button linking to the failed run. It is meant
//! to run from an `if: failure()` step at the end of a workflow.
//!
//! The webhook endpoint acknowledges a delivered card with HTTP 200 and the
//! literal response body `1`. Anything else means the card was not shown,
//! and the command fails so the notification problem itself is visible in
//! the run log.
//!
//! # Examples
//!
//! ```bash
//! # Inside a workflow step: repository, workflow and run number come from
//! # the GitHub-provided environment
//! WEBHOOK_URL=https://example.webhook.office.com/... gha-build-tools notify-failure
//!
//! # Locally, with explicit values
//! gha-build-tools notify-failure \
//!     --webhook-url https://example.webhook.office.com/... \
//!     --repo acme/widgets \
//!     --workflow-name CI \
//!     --run-number 17
//! ```

use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use serde_json::{
    Value,
    json,
};

use super::common::{
    exit_for_errors,
    normalize_input,
};
use crate::error::{
    NotificationError,
    ValidationError,
};

/// Arguments for the `notify-failure` command.
#[derive(Parser, Debug)]
pub struct NotifyFailureArgs {
    /// Incoming-webhook URL the failure card is posted to.
    ///
    /// Defaults to the `WEBHOOK_URL` environment variable, usually provided
    /// through a repository secret.
    #[arg(long = "webhook-url", env = "WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Repository the failed run belongs to, as `owner/name`.
    ///
    /// Defaults to the `GITHUB_REPOSITORY` environment variable.
    #[arg(long = "repo", env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Name of the workflow that failed.
    ///
    /// Defaults to the `GITHUB_WORKFLOW` environment variable.
    #[arg(long = "workflow-name", env = "GITHUB_WORKFLOW")]
    pub workflow_name: Option<String>,

    /// Number of the failed run, used for the "Show Run" link.
    ///
    /// Defaults to the `GITHUB_RUN_NUMBER` environment variable.
    #[arg(long = "run-number", env = "GITHUB_RUN_NUMBER")]
    pub run_number: Option<String>,
}

/// Build the adaptive-card document announcing a failed run.
///
/// The card is a single bold text block `<repo>: <workflow> Failed!` plus a
/// `Show Run` button opening the run on GitHub. Values are JSON-encoded, so
/// names containing quotes cannot corrupt the document.
fn failure_card(repo: &str, workflow_name: &str, run_number: &str) -> Value {
    json!({
        "type": "message",
        "attachments": [
            {
                "contentType": "application/vnd.microsoft.card.adaptive",
                "contentUrl": null,
                "content": {
                    "type": "AdaptiveCard",
                    "$schema": "http://adaptivecards.io/schemas/adaptive-card.json",
                    "version": "1.2",
                    "body": [
                        {
                            "type": "TextBlock",
                            "text": format!("{}: {} Failed!", repo, workflow_name),
                            "wrap": true,
                            "weight": "bolder"
                        },
                        {
                            "type": "ActionSet",
                            "actions": [
                                {
                                    "type": "Action.OpenUrl",
                                    "title": "Show Run",
                                    "url": format!(
                                        "https://github.com/{}/actions/runs/{}",
                                        repo, run_number
                                    )
                                }
                            ]
                        }
                    ]
                }
            }
        ]
    })
}

/// Decide whether the webhook accepted the card.
///
/// The endpoint signals success with status 200 and the literal body `1`;
/// every other combination counts as a rejected notification.
fn check_webhook_response(status: u16, body: &str) -> Result<(), NotificationError> {
    if status != 200 || body != "1" {
        return Err(NotificationError::UnexpectedResponse {
            status,
            body: body.to_string(),
        });
    }
    Ok(())
}

/// POST the card and hand back the raw status and body for checking.
async fn post_card(webhook_url: &str, card: &Value) -> Result<(u16, String), NotificationError> {
    let client = reqwest::Client::builder().build()?;

    let response = client
        .post(webhook_url)
        .header("Content-Type", "application/json")
        .body(card.to_string())
        .send()
        .await?;

    let status = response.status().as_u16();
    let body = response.text().await?;

    Ok((status, body))
}

/// Post a failure notification card for the current run to the webhook.
///
/// Performs a single HTTP POST with no retries. On success nothing is
/// printed; a rejected response prints the status and body before the error
/// propagates, so the run log shows what the endpoint actually answered.
///
/// # Errors
///
/// Returns an error after annotating every problem when any of the four
/// inputs is missing or empty, and without annotations when the HTTP request
/// fails or the webhook answers with anything other than 200 / `1`.
///
/// # Examples
///
/// ```no_run
/// use gha_build_tools::commands::{
///     NotifyFailureArgs,
///     notify_failure,
/// };
///
/// # fn main() -> anyhow::Result<()> {
/// let args = NotifyFailureArgs {
///     webhook_url: Some("https://example.webhook.office.com/...".to_string()),
///     repo: Some("acme/widgets".to_string()),
///     workflow_name: Some("CI".to_string()),
///     run_number: Some("17".to_string()),
/// };
/// notify_failure(args)?;
/// # Ok(())
/// # }
/// ```
pub fn notify_failure(args: NotifyFailureArgs) -> Result<()> {
    let webhook_url = normalize_input(args.webhook_url);
    let repo = normalize_input(args.repo);
    let workflow_name = normalize_input(args.workflow_name);
    let run_number = normalize_input(args.run_number);

    let mut errors = Vec::new();
    if webhook_url.is_none() {
        errors.push(ValidationError::missing("WEBHOOK_URL"));
    }
    if repo.is_none() {
        errors.push(ValidationError::missing("GITHUB_REPOSITORY"));
    }
    if workflow_name.is_none() {
        errors.push(ValidationError::missing("GITHUB_WORKFLOW"));
    }
    if run_number.is_none() {
        errors.push(ValidationError::missing("GITHUB_RUN_NUMBER"));
    }

    let (Some(webhook_url), Some(repo), Some(workflow_name), Some(run_number)) =
        (webhook_url, repo, workflow_name, run_number)
    else {
        return Err(exit_for_errors(&errors));
    };

    let card = failure_card(&repo, &workflow_name, &run_number);

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let (status, body) = rt.block_on(post_card(&webhook_url, &card))?;

    if let Err(error) = check_webhook_response(status, &body) {
        println!("Response code: {}", status);
        println!("Response body: {}", body);
        return Err(error.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_args() -> NotifyFailureArgs {
        NotifyFailureArgs {
            webhook_url: Some("http://127.0.0.1:1/webhook".to_string()),
            repo: Some("acme/widgets".to_string()),
            workflow_name: Some("CI".to_string()),
            run_number: Some("17".to_string()),
        }
    }

    #[test]
    fn test_failure_card_shape() {
        let card = failure_card("acme/widgets", "CI", "17");

        assert_eq!(card["type"], "message");
        let attachment = &card["attachments"][0];
        assert_eq!(
            attachment["contentType"],
            "application/vnd.microsoft.card.adaptive"
        );
        assert_eq!(attachment["contentUrl"], Value::Null);

        let content = &attachment["content"];
        assert_eq!(content["type"], "AdaptiveCard");
        assert_eq!(content["version"], "1.2");

        let text_block = &content["body"][0];
        assert_eq!(text_block["text"], "acme/widgets: CI Failed!");
        assert_eq!(text_block["weight"], "bolder");
        assert_eq!(text_block["wrap"], true);

        let action = &content["body"][1]["actions"][0];
        assert_eq!(action["type"], "Action.OpenUrl");
        assert_eq!(action["title"], "Show Run");
        assert_eq!(
            action["url"],
            "https://github.com/acme/widgets/actions/runs/17"
        );
    }

    #[test]
    fn test_failure_card_encodes_quotes() {
        let card = failure_card("acme/widgets", "a \"quoted\" workflow", "17");
        let text = card["attachments"][0]["content"]["body"][0]["text"]
            .as_str()
            .unwrap();
        assert_eq!(text, "acme/widgets: a \"quoted\" workflow Failed!");
        // The serialized document must survive the round trip intact.
        let reparsed: Value = serde_json::from_str(&card.to_string()).unwrap();
        assert_eq!(reparsed, card);
    }

    #[test]
    fn test_check_webhook_response_accepts_exact_ack() {
        assert!(check_webhook_response(200, "1").is_ok());
    }

    #[test]
    fn test_check_webhook_response_rejects_other_bodies() {
        let error = check_webhook_response(200, "ok").unwrap_err();
        assert_eq!(
            error.to_string(),
            "webhook rejected the notification (status 200)"
        );
    }

    #[test]
    fn test_check_webhook_response_rejects_other_statuses() {
        assert!(check_webhook_response(500, "1").is_err());
        assert!(check_webhook_response(404, "").is_err());
        assert!(check_webhook_response(204, "1").is_err());
    }

    #[test]
    fn test_notify_failure_requires_all_inputs() {
        let args = NotifyFailureArgs {
            webhook_url: None,
            repo: None,
            workflow_name: None,
            run_number: None,
        };
        let result = notify_failure(args);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Exiting due to previous errors."
        );
    }

    #[test]
    fn test_notify_failure_treats_empty_inputs_as_missing() {
        let mut args = full_args();
        args.webhook_url = Some(String::new());
        let result = notify_failure(args);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Exiting due to previous errors."
        );
    }

    #[test]
    fn test_notify_failure_propagates_transport_errors() {
        // Nothing listens on port 1, so the POST fails at connect time.
        let result = notify_failure(full_args());
        let message = result.unwrap_err().to_string();
        assert!(message.starts_with("webhook request failed:"), "{message}");
    }

    #[test]
    #[serial_test::serial]
    fn test_notify_failure_args_bind_to_environment() {
        use std::env;

        unsafe {
            env::set_var("WEBHOOK_URL", "https://example.test/hook");
            env::set_var("GITHUB_REPOSITORY", "acme/widgets");
            env::set_var("GITHUB_WORKFLOW", "CI");
            env::set_var("GITHUB_RUN_NUMBER", "17");
        }
        let args = NotifyFailureArgs::parse_from(["notify-failure"]);
        unsafe {
            env::remove_var("WEBHOOK_URL");
            env::remove_var("GITHUB_REPOSITORY");
            env::remove_var("GITHUB_WORKFLOW");
            env::remove_var("GITHUB_RUN_NUMBER");
        }

        assert_eq!(args.webhook_url.as_deref(), Some("https://example.test/hook"));
        assert_eq!(args.repo.as_deref(), Some("acme/widgets"));
        assert_eq!(args.workflow_name.as_deref(), Some("CI"));
        assert_eq!(args.run_number.as_deref(), Some("17"));
    }
}
