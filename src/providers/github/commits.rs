use chrono::{DateTime, Utc};
use log::{info, warn};
use reqwest::StatusCode;
use serde::Deserialize;

use super::client::GitHubClient;
use super::repositories::AccountDto;
use crate::error::{CommitLensError, Result};
use crate::models::{Commit, Repository};

#[derive(Debug, Deserialize)]
struct CommitDto {
    sha: String,
    commit: CommitDetailDto,
    author: Option<AccountDto>,
}

#[derive(Debug, Deserialize)]
struct CommitDetailDto {
    message: String,
    author: Option<SignatureDto>,
}

#[derive(Debug, Deserialize)]
struct SignatureDto {
    name: Option<String>,
    date: Option<DateTime<Utc>>,
}

impl CommitDto {
    fn into_commit(self) -> Option<Commit> {
        let signature = self.commit.author?;
        let timestamp = signature.date?;
        let author = signature
            .name
            .filter(|name| !name.is_empty())
            .or_else(|| self.author.map(|account| account.login))
            .unwrap_or_default();

        Some(Commit {
            sha: self.sha,
            message: self.commit.message,
            timestamp,
            author,
        })
    }
}

impl GitHubClient {
    /// Commits of `repository`, newest first as GitHub returns them.
    ///
    /// An empty repository yields an empty list rather than an error.
    pub async fn list_commits(&self, repository: &Repository) -> Result<Vec<Commit>> {
        let full_name = repository.full_name();
        info!("Fetching commits for repository: {full_name}");

        let url = self.endpoint(&[
            "repos",
            repository.owner.as_str(),
            repository.name.as_str(),
            "commits",
        ])?;
        let resource = format!("repository '{full_name}'");

        let dtos: Vec<CommitDto> = match self.get_list(url, &resource).await {
            Ok(dtos) => dtos,
            Err(CommitLensError::Api { status, .. }) if status == StatusCode::CONFLICT => {
                warn!("Repository {full_name} is empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let total = dtos.len();
        let commits: Vec<Commit> = dtos.into_iter().filter_map(CommitDto::into_commit).collect();

        if commits.len() < total {
            warn!(
                "Skipped {} commits without an author date in {full_name}",
                total - commits.len()
            );
        }
        if commits.is_empty() {
            warn!("No commits found for repository: {full_name}");
        }

        Ok(commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Token;
    use chrono::TimeZone;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;

    const COMMITS_JSON: &str = r#"[
        {
            "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
            "commit": {
                "message": "feat: add activity chart\n\nShows commits per month.",
                "author": {"name": "Alice Example", "email": "alice@example.com", "date": "2024-02-15T10:30:00Z"}
            },
            "author": {"login": "alice"}
        },
        {
            "sha": "a1b2c3",
            "commit": {
                "message": "fix typo",
                "author": {"name": "", "date": "2024-01-01T08:00:00Z"}
            },
            "author": {"login": "alice"}
        },
        {
            "sha": "d4e5f6",
            "commit": {"message": "imported", "author": null},
            "author": null
        }
    ]"#;

    fn notes() -> Repository {
        Repository::parse("alice/notes").unwrap()
    }

    #[tokio::test]
    async fn test_list_commits() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/alice/notes/commits")
            .match_query(Matcher::UrlEncoded("per_page".into(), "30".into()))
            .match_header("authorization", "Bearer ghp_test")
            .with_status(200)
            .with_body(COMMITS_JSON)
            .create_async()
            .await;
        let client = GitHubClient::new(&server.url(), Token::from("ghp_test")).unwrap();

        let commits = client.list_commits(&notes()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            commits,
            vec![
                Commit {
                    sha: "6dcb09b5b57875f334f61aebed695e2e4193db5e".to_string(),
                    message: "feat: add activity chart\n\nShows commits per month.".to_string(),
                    timestamp: Utc.with_ymd_and_hms(2024, 2, 15, 10, 30, 0).unwrap(),
                    author: "Alice Example".to_string(),
                },
                Commit {
                    sha: "a1b2c3".to_string(),
                    message: "fix typo".to_string(),
                    timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
                    author: "alice".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_repository_returns_no_commits() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/alice/notes/commits")
            .match_query(Matcher::Any)
            .with_status(409)
            .with_body(r#"{"message": "Git Repository is empty.", "status": "409"}"#)
            .create_async()
            .await;
        let client = GitHubClient::new(&server.url(), Token::from("ghp_test")).unwrap();

        let commits = client.list_commits(&notes()).await.unwrap();

        assert!(commits.is_empty());
    }

    #[tokio::test]
    async fn test_empty_page_returns_no_commits() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/alice/notes/commits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let client = GitHubClient::new(&server.url(), Token::from("ghp_test")).unwrap();

        assert!(client.list_commits(&notes()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_repository_is_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/alice/notes/commits")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;
        let client = GitHubClient::new(&server.url(), Token::from("ghp_test")).unwrap();

        let err = client.list_commits(&notes()).await.unwrap_err();

        match err {
            CommitLensError::NotFound(what) => assert!(what.contains("alice/notes")),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/repos/alice/notes/commits")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;
        let client = GitHubClient::new(&server.url(), Token::from("ghp_test")).unwrap();

        let err = client.list_commits(&notes()).await.unwrap_err();

        assert!(matches!(err, CommitLensError::Json(_)));
    }
}
