use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::error::{PrviewError, Result};
use crate::fetch::PrParams;
use crate::forge::Forge;
use crate::navigate::Navigator;
use crate::types::{Comment, CommitRef, PullRequest, ReactionKind};

pub fn sample_pr(comments: usize, commits: usize) -> PullRequest {
    let mut reactions = BTreeMap::new();
    reactions.insert(ReactionKind::ThumbsUp, 3);
    reactions.insert(ReactionKind::Rocket, 1);

    PullRequest {
        number: 42,
        title: "Add widget frobnication".to_string(),
        body: "Frobnicates widgets.\nSecond line.".to_string(),
        state: "open".to_string(),
        author: "octocat".to_string(),
        reactions,
        comments: (0..comments)
            .map(|i| Comment {
                id: format!("IC_{}", i),
                author: format!("reviewer{}", i),
                body: format!("comment number {}", i),
                created_at: Utc.with_ymd_and_hms(2024, 1, 1 + i as u32, 9, 30, 0).unwrap(),
            })
            .collect(),
        commits: (0..commits)
            .map(|i| CommitRef {
                id: format!("C_{}", i),
                oid: format!("{:x}{:039x}", i + 1, 0),
                message: format!("commit message {}", i),
                author: "octocat".to_string(),
            })
            .collect(),
    }
}

/// Forge double: fetches pop queued responses, every call is recorded.
#[derive(Debug, Default)]
pub struct MockForge {
    fetch_responses: Mutex<VecDeque<Result<Option<PullRequest>>>>,
    fetch_calls: Mutex<Vec<PrParams>>,
    merge_calls: Mutex<Vec<PrParams>>,
    merge_error: Option<String>,
}

impl MockForge {
    pub fn failing_merge(mut self, message: &str) -> Self {
        self.merge_error = Some(message.to_string());
        self
    }

    pub fn push_fetch(&self, response: Result<Option<PullRequest>>) {
        self.fetch_responses.lock().unwrap().push_back(response);
    }

    pub fn fetch_calls(&self) -> Vec<PrParams> {
        self.fetch_calls.lock().unwrap().clone()
    }

    pub fn merge_calls(&self) -> Vec<PrParams> {
        self.merge_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &str {
        "Mock"
    }

    fn web_url(&self, owner: &str, repo: &str, kind: &str, id: &str) -> String {
        format!("mock://{}/{}/{}/{}", owner, repo, kind, id)
    }

    async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Option<PullRequest>> {
        self.fetch_calls
            .lock()
            .unwrap()
            .push(PrParams::new(owner, repo, number));
        self.fetch_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PrviewError::Api("no response queued".to_string())))
    }

    async fn merge_pull_request(&self, owner: &str, repo: &str, number: u64) -> Result<()> {
        self.merge_calls
            .lock()
            .unwrap()
            .push(PrParams::new(owner, repo, number));
        match &self.merge_error {
            Some(msg) => Err(PrviewError::Api(msg.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    calls: Mutex<Vec<(String, String, String)>>,
}

impl RecordingNavigator {
    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn show_commit(&self, owner: &str, repo: &str, oid: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((owner.to_string(), repo.to_string(), oid.to_string()));
    }
}
