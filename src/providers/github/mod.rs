mod client;
mod commits;
mod pagination;
mod repositories;

pub use client::GitHubClient;
pub use pagination::Paging;
