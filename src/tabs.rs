use ratatui::style::Color;

use crate::error::Result;
use crate::fetch::FetchState;
use crate::types::{PrState, PullRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrTab {
    #[default]
    Overview,
    Commits,
}

impl PrTab {
    pub const ALL: [PrTab; 2] = [PrTab::Overview, PrTab::Commits];

    pub fn index(self) -> usize {
        match self {
            PrTab::Overview => 0,
            PrTab::Commits => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Self {
        match self {
            PrTab::Overview => PrTab::Commits,
            PrTab::Commits => PrTab::Overview,
        }
    }

    pub fn prev(self) -> Self {
        // Two tabs, so cycling either way lands on the other one.
        self.next()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabDescriptor {
    pub index: usize,
    pub title: String,
    pub is_dynamic: bool,
}

/// Tab strip entries. Always two, in fixed order; only the commits title
/// depends on the fetch state.
pub fn derive_tabs(state: &FetchState) -> [TabDescriptor; 2] {
    let commits = state
        .resource()
        .map_or_else(|| "0".to_string(), |pr| pr.commits.len().to_string());

    [
        TabDescriptor {
            index: PrTab::Overview.index(),
            title: "Overview".to_string(),
            is_dynamic: false,
        },
        TabDescriptor {
            index: PrTab::Commits.index(),
            title: commits,
            is_dynamic: true,
        },
    ]
}

/// Title drawn above the active tab's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabTitle {
    Plain(String),
    Counted { label: &'static str, count: usize },
}

pub fn active_title(tab: &TabDescriptor, pr: Option<&PullRequest>) -> TabTitle {
    match (PrTab::from_index(tab.index), pr) {
        (Some(PrTab::Commits), Some(pr)) => TabTitle::Counted {
            label: "Commits",
            count: pr.commits.len(),
        },
        _ => TabTitle::Plain(tab.title.clone()),
    }
}

pub fn state_color(state: &str) -> Result<Color> {
    let color = match state.parse::<PrState>()? {
        PrState::Open => Color::Green,
        PrState::Merged => Color::Magenta,
        PrState::Closed => Color::Red,
    };
    Ok(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::error::PrviewError;
    use crate::test_support::sample_pr;

    #[test]
    fn tabs_while_loading_use_placeholder_count() {
        let tabs = derive_tabs(&FetchState::Loading);
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[0].title, "Overview");
        assert!(!tabs[0].is_dynamic);
        assert_eq!(tabs[1].title, "0");
        assert!(tabs[1].is_dynamic);
    }

    #[test]
    fn tabs_on_error_use_placeholder_count() {
        let tabs = derive_tabs(&FetchState::Error("boom".to_string()));
        assert_eq!(tabs[1].title, "0");
    }

    #[test]
    fn tabs_on_success_show_commit_count() {
        let state = FetchState::Success(Some(Arc::new(sample_pr(3, 5))));
        let tabs = derive_tabs(&state);
        assert_eq!(tabs[0].index, 0);
        assert_eq!(tabs[1].index, 1);
        assert_eq!(tabs[1].title, "5");
    }

    #[test]
    fn active_commits_title_has_label_and_badge() {
        let pr = sample_pr(0, 5);
        let state = FetchState::Success(Some(Arc::new(pr.clone())));
        let tabs = derive_tabs(&state);
        assert_eq!(
            active_title(&tabs[1], Some(&pr)),
            TabTitle::Counted {
                label: "Commits",
                count: 5
            }
        );
        assert_eq!(
            active_title(&tabs[0], Some(&pr)),
            TabTitle::Plain("Overview".to_string())
        );
    }

    #[test]
    fn active_commits_title_without_resource_is_plain() {
        let tabs = derive_tabs(&FetchState::Loading);
        assert_eq!(active_title(&tabs[1], None), TabTitle::Plain("0".to_string()));
    }

    #[test]
    fn state_colors() {
        assert_eq!(state_color("open").unwrap(), Color::Green);
        assert_eq!(state_color("OPEN").unwrap(), Color::Green);
        assert_eq!(state_color("merged").unwrap(), Color::Magenta);
        assert_eq!(state_color("closed").unwrap(), Color::Red);
    }

    #[test]
    fn unknown_state_has_no_color() {
        assert!(matches!(
            state_color("frobnicated"),
            Err(PrviewError::UnknownState(_))
        ));
    }

    #[test]
    fn tab_cycling() {
        assert_eq!(PrTab::Overview.next(), PrTab::Commits);
        assert_eq!(PrTab::Commits.next(), PrTab::Overview);
        assert_eq!(PrTab::Overview.prev(), PrTab::Commits);
        assert_eq!(PrTab::from_index(1), Some(PrTab::Commits));
        assert_eq!(PrTab::from_index(2), None);
    }
}
