use crate::tabs::PrTab;
use crate::types::PullRequest;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Tick,
    ScrollUp,
    ScrollDown,
    GoToTop,
    GoToBottom,
    Select,
    NextTab,
    PrevTab,
    SwitchTab(PrTab),

    // Fetch lifecycle; the u64 is the generation token of the attempt
    Load,
    Retry,
    PullRequestLoaded(Option<Box<PullRequest>>, u64),
    PullRequestFailed(String, u64),

    // Merge confirmation
    ShowConfirm,
    ConfirmYes,
    ConfirmNo,
    PrMerged,
    MergeFailed(String),

    None,
}
