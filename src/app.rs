use std::cell::Cell;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::event::Event;
use crate::fetch::{Confirmation, FetchController, FetchState, PrParams};
use crate::forge::Forge;
use crate::navigate::Navigator;
use crate::tabs::PrTab;
use crate::ui;

/// Non-blocking message shown in the status bar until the next user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

pub struct App {
    pub fetch: FetchController,
    pub confirm: Confirmation,
    pub tab: PrTab,
    pub scroll_offset: usize,
    pub commit_index: usize,
    pub spinner_frame: usize,
    pub notice: Option<Notice>,
    pub merging: bool,
    pub should_quit: bool,
    /// Inner height of the overview pane as of the last draw.
    overview_viewport: Cell<usize>,
    forge: Arc<dyn Forge>,
    navigator: Arc<dyn Navigator>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        params: PrParams,
        forge: Arc<dyn Forge>,
        navigator: Arc<dyn Navigator>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            fetch: FetchController::new(params),
            confirm: Confirmation::default(),
            tab: PrTab::default(),
            scroll_offset: 0,
            commit_index: 0,
            spinner_frame: 0,
            notice: None,
            merging: false,
            should_quit: false,
            overview_viewport: Cell::new(0),
            forge,
            navigator,
            action_tx,
        }
    }

    pub fn forge_name(&self) -> &str {
        self.forge.name()
    }

    pub fn set_overview_viewport(&self, height: usize) {
        self.overview_viewport.set(height);
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Load,
            Event::Tick => Action::Tick,
            Event::Key(key) => self.handle_key(key),
            Event::Render | Event::Resize => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        // The dialog swallows everything except its own answers.
        if self.confirm.is_open() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Action::ConfirmYes,
                KeyCode::Char('n') | KeyCode::Esc => Action::ConfirmNo,
                _ => Action::None,
            };
        }

        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            return Action::Quit;
        }

        match self.fetch.state() {
            FetchState::Loading => Action::None,
            FetchState::Error(_) | FetchState::Success(None) => match key.code {
                KeyCode::Char('r') => Action::Retry,
                _ => Action::None,
            },
            FetchState::Success(Some(_)) => self.handle_detail_key(key),
        }
    }

    fn handle_detail_key(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => Action::NextTab,
            KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => Action::PrevTab,
            KeyCode::Char('1') => Action::SwitchTab(PrTab::Overview),
            KeyCode::Char('2') => Action::SwitchTab(PrTab::Commits),
            KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
            KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
            KeyCode::Char('g') | KeyCode::Home => Action::GoToTop,
            KeyCode::Char('G') | KeyCode::End => Action::GoToBottom,
            KeyCode::Enter => Action::Select,
            KeyCode::Char('m') if self.tab == PrTab::Overview => Action::ShowConfirm,
            KeyCode::Char('r') => Action::Retry,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        if self.notice.is_some()
            && !matches!(
                action,
                Action::Tick
                    | Action::None
                    | Action::PullRequestLoaded(..)
                    | Action::PullRequestFailed(..)
            )
        {
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Tick => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
            }
            Action::ScrollUp => match self.tab {
                PrTab::Overview => self.scroll_offset = self.scroll_offset.saturating_sub(1),
                PrTab::Commits => self.commit_index = self.commit_index.saturating_sub(1),
            },
            Action::ScrollDown => match self.tab {
                PrTab::Overview => {
                    if self.scroll_offset < self.last_overview_line() {
                        self.scroll_offset += 1;
                    }
                }
                PrTab::Commits => {
                    if self.commit_index < self.last_commit_index() {
                        self.commit_index += 1;
                    }
                }
            },
            Action::GoToTop => match self.tab {
                PrTab::Overview => self.scroll_offset = 0,
                PrTab::Commits => self.commit_index = 0,
            },
            Action::GoToBottom => match self.tab {
                PrTab::Overview => self.scroll_offset = self.last_overview_line(),
                PrTab::Commits => self.commit_index = self.last_commit_index(),
            },
            Action::Select => self.open_selected_commit(),
            Action::NextTab => self.tab = self.tab.next(),
            Action::PrevTab => self.tab = self.tab.prev(),
            Action::SwitchTab(tab) => self.tab = tab,

            Action::Load | Action::Retry => self.initiate(),
            Action::PullRequestLoaded(pr, generation) => {
                self.fetch.complete(generation, Ok(pr.map(|pr| *pr)));
            }
            Action::PullRequestFailed(cause, generation) => {
                self.fetch.complete(generation, Err(cause));
            }

            Action::ShowConfirm => {
                if self.merging {
                    tracing::debug!("merge already in flight");
                } else if self.fetch.state().resource().is_some() {
                    self.confirm.open();
                } else {
                    tracing::debug!("ignoring merge request without a loaded pull request");
                }
            }
            Action::ConfirmYes => {
                if self.confirm.confirm() && !self.merging {
                    self.notice = Some(Notice::Info(format!("Merging {}...", self.fetch.params())));
                    self.spawn_merge();
                }
            }
            Action::ConfirmNo => self.confirm.cancel(),
            Action::PrMerged => {
                self.merging = false;
                tracing::info!(pr = %self.fetch.params(), "pull request merged");
                let message = format!("Merged {}", self.fetch.params());
                self.initiate();
                self.notice = Some(Notice::Info(message));
            }
            Action::MergeFailed(msg) => {
                self.merging = false;
                tracing::warn!(pr = %self.fetch.params(), error = %msg, "merge failed");
                self.notice = Some(Notice::Error(msg));
            }
            Action::None => {}
        }
    }

    /// Start (or restart) fetching. Closes the dialog before entering Loading
    /// and spawns exactly one fetch tagged with the new generation.
    pub fn initiate(&mut self) {
        self.confirm.reset();
        self.scroll_offset = 0;
        self.commit_index = 0;
        let generation = self.fetch.begin();
        self.spawn_fetch(generation);
    }

    /// Largest offset that still fills the pane. Before the first draw the
    /// viewport is unknown and the last line is the limit.
    fn last_overview_line(&self) -> usize {
        let viewport = self.overview_viewport.get().max(1);
        self.fetch
            .state()
            .resource()
            .map_or(0, |pr| ui::overview_line_count(pr).saturating_sub(viewport))
    }

    fn last_commit_index(&self) -> usize {
        self.fetch
            .state()
            .resource()
            .map_or(0, |pr| pr.commits.len().saturating_sub(1))
    }

    fn open_selected_commit(&self) {
        if self.tab != PrTab::Commits {
            return;
        }
        let Some(pr) = self.fetch.state().resource() else {
            return;
        };
        if let Some(commit) = pr.commits.get(self.commit_index) {
            let params = self.fetch.params();
            self.navigator
                .show_commit(&params.owner, &params.repo, &commit.oid);
        }
    }

    fn spawn_fetch(&self, generation: u64) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        let params = self.fetch.params().clone();
        tokio::spawn(async move {
            match forge
                .get_pull_request(&params.owner, &params.repo, params.number)
                .await
            {
                Ok(pr) => {
                    tx.send(Action::PullRequestLoaded(pr.map(Box::new), generation))
                        .ok();
                }
                Err(e) => {
                    tx.send(Action::PullRequestFailed(e.to_string(), generation))
                        .ok();
                }
            }
        });
    }

    fn spawn_merge(&mut self) {
        self.merging = true;
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        let params = self.fetch.params().clone();
        tokio::spawn(async move {
            match forge
                .merge_pull_request(&params.owner, &params.repo, params.number)
                .await
            {
                Ok(()) => {
                    tx.send(Action::PrMerged).ok();
                }
                Err(e) => {
                    tx.send(Action::MergeFailed(e.to_string())).ok();
                }
            }
        });
    }
}
