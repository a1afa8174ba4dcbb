use log::{info, warn};
use serde::Deserialize;

use super::client::GitHubClient;
use crate::error::Result;
use crate::models::{Profile, Repository};

#[derive(Debug, Deserialize)]
pub(super) struct AccountDto {
    pub login: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepositoryDto {
    name: String,
    owner: AccountDto,
    #[serde(default)]
    private: bool,
    default_branch: Option<String>,
}

impl From<RepositoryDto> for Repository {
    fn from(dto: RepositoryDto) -> Self {
        Self {
            name: dto.name,
            owner: dto.owner.login,
            private: dto.private,
            default_branch: dto.default_branch,
        }
    }
}

impl GitHubClient {
    /// The account the access token belongs to. Doubles as a connection check.
    pub async fn authenticated_user(&self) -> Result<Profile> {
        let url = self.endpoint(&["user"])?;
        let account: AccountDto = self.get_json(url, "authenticated user").await?;

        info!("Authenticated as {}", account.login);
        Ok(Profile {
            login: account.login,
            avatar_url: account.avatar_url,
        })
    }

    /// Public repositories of `user`.
    pub async fn list_repositories(&self, user: &str) -> Result<Vec<Repository>> {
        info!("Fetching repositories for user: {user}");

        let url = self.endpoint(&["users", user, "repos"])?;
        let resource = format!("repositories of user '{user}'");
        let repositories = self.collect_repositories(url, &resource).await?;

        if repositories.is_empty() {
            warn!("No repositories found for user: {user}");
        }
        Ok(repositories)
    }

    /// Repositories visible to the token owner, private ones included.
    pub async fn list_own_repositories(&self) -> Result<Vec<Repository>> {
        info!("Fetching repositories of the authenticated user");

        let url = self.endpoint(&["user", "repos"])?;
        self.collect_repositories(url, "own repositories").await
    }

    async fn collect_repositories(&self, url: url::Url, resource: &str) -> Result<Vec<Repository>> {
        let dtos: Vec<RepositoryDto> = self.get_list(url, resource).await?;
        Ok(dtos.into_iter().map(Repository::from).collect())
    }
}
