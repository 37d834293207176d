use async_trait::async_trait;

use crate::error::Result;
use crate::types::PullRequest;

#[async_trait]
pub trait Forge: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;
    fn web_url(&self, owner: &str, repo: &str, kind: &str, id: &str) -> String;

    /// `Ok(None)` when the forge answered but had no pull request to give.
    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Option<PullRequest>>;

    async fn merge_pull_request(&self, owner: &str, repo: &str, number: u64) -> Result<()>;
}
