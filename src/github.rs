use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::Deserialize;

use crate::config::GitHubConfig;
use crate::error::{PrviewError, Result};
use crate::forge::Forge;
use crate::types::{Comment, CommitRef, MergeMethod, PullRequest, ReactionKind};

const PULL_REQUEST_QUERY: &str = r#"
query PullRequest($owner: String!, $repo: String!, $number: Int!, $comments: Int!, $commits: Int!) {
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $number) {
      number
      title
      body
      state
      author { login }
      reactionGroups {
        content
        reactors { totalCount }
      }
      comments(first: $comments) {
        nodes { id body createdAt author { login } }
      }
      commits(first: $commits) {
        nodes {
          commit {
            id
            oid
            messageHeadline
            author { name user { login } }
          }
        }
      }
    }
  }
}
"#;

pub struct GitHub {
    client: Octocrab,
    token: String,
    api_url: String,
    web_url: String,
    merge_method: MergeMethod,
    comments_limit: u32,
    commits_limit: u32,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl From<octocrab::Error> for PrviewError {
    fn from(err: octocrab::Error) -> Self {
        PrviewError::Api(err.to_string())
    }
}

impl GitHub {
    pub fn new(config: &GitHubConfig, token: String) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.clone())
            .base_uri(config.api_url.as_str())
            .map_err(|e| PrviewError::Auth(e.to_string()))?
            .build()
            .map_err(|e| PrviewError::Auth(e.to_string()))?;

        Ok(Self {
            client,
            token,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            web_url: config.web_url.trim_end_matches('/').to_string(),
            merge_method: config.merge_method,
            comments_limit: config.comments_limit,
            commits_limit: config.commits_limit,
        })
    }
}

#[async_trait]
impl Forge for GitHub {
    fn name(&self) -> &str {
        "GitHub"
    }

    fn web_url(&self, owner: &str, repo: &str, kind: &str, id: &str) -> String {
        match kind {
            "commit" => format!("{}/{}/{}/commit/{}", self.web_url, owner, repo, id),
            _ => format!("{}/{}/{}", self.web_url, owner, repo),
        }
    }

    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Option<PullRequest>> {
        let payload = serde_json::json!({
            "query": PULL_REQUEST_QUERY,
            "variables": {
                "owner": owner,
                "repo": repo,
                "number": number,
                "comments": self.comments_limit,
                "commits": self.commits_limit,
            },
        });

        let response: serde_json::Value = self.client.graphql(&payload).await?;
        parse_pull_request(response)
    }

    async fn merge_pull_request(&self, owner: &str, repo: &str, number: u64) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/merge",
            self.api_url, owner, repo, number
        );
        let client = reqwest::Client::new();
        let body = serde_json::json!({ "merge_method": self.merge_method.as_api_str() });
        let response = client
            .put(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "prview")
            .json(&body)
            .send()
            .await
            .map_err(|e| PrviewError::Api(e.to_string()))?;

        if !response.status().is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(PrviewError::Api(format!("Merge failed: {}", text)));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct ResponseData {
    repository: Option<RepositoryNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    pull_request: Option<PullRequestNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    number: u64,
    title: String,
    #[serde(default)]
    body: String,
    state: String,
    author: Option<Actor>,
    #[serde(default)]
    reaction_groups: Option<Vec<ReactionGroupNode>>,
    comments: Connection<CommentNode>,
    commits: Connection<PullRequestCommitNode>,
}

#[derive(Deserialize)]
struct Actor {
    login: String,
}

#[derive(Deserialize)]
struct ReactionGroupNode {
    content: ReactionKind,
    reactors: TotalCount,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: u64,
}

#[derive(Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    nodes: Vec<Option<T>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentNode {
    id: String,
    body: String,
    created_at: DateTime<Utc>,
    author: Option<Actor>,
}

#[derive(Deserialize)]
struct PullRequestCommitNode {
    commit: CommitNode,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitNode {
    id: String,
    oid: String,
    message_headline: String,
    author: Option<GitActor>,
}

#[derive(Deserialize)]
struct GitActor {
    name: Option<String>,
    user: Option<Actor>,
}

fn login_or_ghost(actor: Option<Actor>) -> String {
    actor
        .map(|a| a.login)
        .unwrap_or_else(|| "ghost".to_string())
}

impl From<PullRequestNode> for PullRequest {
    fn from(node: PullRequestNode) -> Self {
        let mut reactions = BTreeMap::new();
        for group in node.reaction_groups.unwrap_or_default() {
            if group.reactors.total_count > 0 {
                *reactions.entry(group.content).or_insert(0) += group.reactors.total_count;
            }
        }

        // Connections may contain null entries; they are skipped, order is kept.
        let comments = node
            .comments
            .nodes
            .into_iter()
            .flatten()
            .map(|c| Comment {
                id: c.id,
                author: login_or_ghost(c.author),
                body: c.body,
                created_at: c.created_at,
            })
            .collect();

        let commits = node
            .commits
            .nodes
            .into_iter()
            .flatten()
            .map(|node| {
                let c = node.commit;
                let author = c
                    .author
                    .and_then(|a| a.user.map(|u| u.login).or(a.name))
                    .unwrap_or_else(|| "unknown".to_string());
                CommitRef {
                    id: c.id,
                    oid: c.oid,
                    message: c.message_headline,
                    author,
                }
            })
            .collect();

        PullRequest {
            number: node.number,
            title: node.title,
            body: node.body,
            state: node.state,
            author: login_or_ghost(node.author),
            reactions,
            comments,
            commits,
        }
    }
}

/// Decode the GraphQL response. GraphQL `errors` become an API error even
/// when partial data came along with them.
fn parse_pull_request(response: serde_json::Value) -> Result<Option<PullRequest>> {
    let response: GraphQlResponse = serde_json::from_value(response)
        .map_err(|e| PrviewError::Api(format!("Unexpected response: {}", e)))?;

    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(PrviewError::Api(messages.join("; ")));
    }

    Ok(response
        .data
        .and_then(|d| d.repository)
        .and_then(|r| r.pull_request)
        .map(PullRequest::from))
}
