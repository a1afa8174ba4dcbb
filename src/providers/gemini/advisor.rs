use log::{info, warn};

use super::client::GeminiClient;
use super::prompts;
use crate::error::{CommitLensError, Result};
use crate::models::{Commit, FeedbackKind, FeedbackResult};

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CommitLensError::InvalidInput(format!("{what} must not be empty")));
    }
    Ok(())
}

impl GeminiClient {
    /// Feedback on a single commit message.
    pub async fn critique(&self, message: &str) -> Result<String> {
        require(message, "Commit message")?;
        self.generate(&prompts::critique(message.trim())).await
    }

    /// Critique each commit in turn. The first failure aborts the rest.
    ///
    /// Commits with an empty message are skipped.
    pub async fn critique_commits(&self, commits: &[Commit]) -> Result<Vec<FeedbackResult>> {
        let mut results = Vec::with_capacity(commits.len());

        for (index, commit) in commits.iter().enumerate() {
            if commit.message.trim().is_empty() {
                warn!("Skipping commit {} with an empty message", commit.sha);
                continue;
            }
            info!(
                "Critiquing commit {}/{}: {}",
                index + 1,
                commits.len(),
                commit.sha
            );
            let feedback = self.critique(&commit.message).await?;
            results.push(FeedbackResult {
                kind: FeedbackKind::Critique,
                source: Some(commit.sha.clone()),
                feedback,
            });
        }

        Ok(results)
    }

    /// One summary of habits across a batch of commits.
    pub async fn review_history(&self, commits: &[Commit]) -> Result<String> {
        let subjects: Vec<&str> = commits
            .iter()
            .map(Commit::subject)
            .filter(|subject| !subject.is_empty())
            .collect();

        if subjects.is_empty() {
            return Err(CommitLensError::InvalidInput(
                "No commit messages to review".to_string(),
            ));
        }

        info!("Reviewing {} commit messages", subjects.len());
        self.generate(&prompts::review_history(&subjects)).await
    }

    /// Rewrite a message as a Conventional Commit.
    pub async fn rewrite(&self, message: &str) -> Result<String> {
        require(message, "Commit message")?;
        self.generate(&prompts::rewrite(message.trim())).await
    }

    /// Write a commit message from a plain description of the changes.
    pub async fn compose(&self, description: &str) -> Result<String> {
        require(description, "Description")?;
        self.generate(&prompts::compose(description.trim())).await
    }

    /// Write a commit message from the code before and after a change.
    pub async fn compose_from_diff(&self, old_code: &str, new_code: &str) -> Result<String> {
        if old_code.trim().is_empty() && new_code.trim().is_empty() {
            return Err(CommitLensError::InvalidInput(
                "Old and new code must not both be empty".to_string(),
            ));
        }
        self.generate(&prompts::compose_from_diff(old_code, new_code))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Token;
    use chrono::Utc;
    use mockito::{Matcher, Server, ServerGuard};
    use pretty_assertions::assert_eq;

    const PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

    fn reply(text: &str) -> String {
        serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] }, "finishReason": "STOP" }]
        })
        .to_string()
    }

    fn commit(sha: &str, message: &str) -> Commit {
        Commit {
            sha: sha.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
            author: "alice".to_string(),
        }
    }

    fn client(server: &ServerGuard) -> GeminiClient {
        GeminiClient::new(&server.url(), "gemini-2.5-flash", Token::from("AIza-test")).unwrap()
    }

    /// A client pointed at a closed port, so any request would fail with a network error.
    fn offline_client() -> GeminiClient {
        GeminiClient::new("http://127.0.0.1:1", "gemini-2.5-flash", Token::from("k")).unwrap()
    }

    #[tokio::test]
    async fn test_critique_sends_message_in_prompt() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::Regex("fixed stuff".to_string()))
            .with_status(200)
            .with_body(reply("Too vague: say what was fixed."))
            .create_async()
            .await;

        let feedback = client(&server).critique("fixed stuff").await.unwrap();

        mock.assert_async().await;
        assert_eq!(feedback, "Too vague: say what was fixed.");
    }

    #[tokio::test]
    async fn test_blank_inputs_are_rejected_before_any_request() {
        let client = offline_client();

        for err in [
            client.critique("   ").await.unwrap_err(),
            client.rewrite("").await.unwrap_err(),
            client.compose("\n").await.unwrap_err(),
            client.compose_from_diff(" ", "").await.unwrap_err(),
            client.review_history(&[]).await.unwrap_err(),
        ] {
            assert!(matches!(err, CommitLensError::InvalidInput(_)), "{err:?}");
        }
    }

    #[tokio::test]
    async fn test_critique_commits_keeps_order_and_sources() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PATH)
            .match_body(Matcher::Regex("add login".to_string()))
            .with_status(200)
            .with_body(reply("Clear subject."))
            .create_async()
            .await;
        server
            .mock("POST", PATH)
            .match_body(Matcher::Regex("wip 7731".to_string()))
            .with_status(200)
            .with_body(reply("Describe the change."))
            .create_async()
            .await;

        let results = client(&server)
            .critique_commits(&[commit("aaa", "feat: add login"), commit("bbb", "wip 7731")])
            .await
            .unwrap();

        assert_eq!(
            results,
            vec![
                FeedbackResult {
                    kind: FeedbackKind::Critique,
                    source: Some("aaa".to_string()),
                    feedback: "Clear subject.".to_string(),
                },
                FeedbackResult {
                    kind: FeedbackKind::Critique,
                    source: Some("bbb".to_string()),
                    feedback: "Describe the change.".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_critique_commits_skips_empty_messages() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(reply("Name the module."))
            .expect(1)
            .create_async()
            .await;

        let results = client(&server)
            .critique_commits(&[
                commit("aaa", ""),
                commit("bbb", "refactor parser"),
                commit("ccc", " \n"),
            ])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            results,
            vec![FeedbackResult {
                kind: FeedbackKind::Critique,
                source: Some("bbb".to_string()),
                feedback: "Name the module.".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_critique_commits_stops_at_first_failure() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .with_status(429)
            .with_body(r#"{"error": {"code": 429, "message": "quota", "status": "RESOURCE_EXHAUSTED"}}"#)
            .expect(1)
            .create_async()
            .await;

        let err = client(&server)
            .critique_commits(&[commit("aaa", "one"), commit("bbb", "two")])
            .await
            .unwrap_err();

        assert!(matches!(err, CommitLensError::AiQuota(_)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_review_history_uses_subject_lines() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r"- feat: add chart\\n- docs".to_string()),
                Matcher::Regex("Strengths".to_string()),
            ]))
            .with_status(200)
            .with_body(reply("**Strengths:**\n- consistent types"))
            .create_async()
            .await;

        let review = client(&server)
            .review_history(&[
                commit("aaa", "feat: add chart\n\nlong body"),
                commit("bbb", "docs"),
            ])
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(review.starts_with("**Strengths:**"));
    }

    #[tokio::test]
    async fn test_compose_from_diff_sends_both_sides() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("retries = 3".to_string()),
                Matcher::Regex("retries = 5".to_string()),
            ]))
            .with_status(200)
            .with_body(reply("chore: raise retry count"))
            .create_async()
            .await;

        let message = client(&server)
            .compose_from_diff("retries = 3", "retries = 5")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(message, "chore: raise retry count");
    }
}
