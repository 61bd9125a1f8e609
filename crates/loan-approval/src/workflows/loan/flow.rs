use serde::{Deserialize, Serialize};

/// Tab recorded as active for the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActiveTab {
    #[default]
    Applicant,
    Result,
}

impl ActiveTab {
    pub fn as_str(self) -> &'static str {
        match self {
            ActiveTab::Applicant => "Applicant",
            ActiveTab::Result => "Result",
        }
    }
}

/// Which top-level screen a session sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    /// Both tabs render; the result panel carries a report once a
    /// prediction has been requested.
    Workspace { show_result: bool },
}

/// Per-session navigation flags.
///
/// Flags only ever move forward: there is no way back to the welcome screen
/// and no way to clear a requested prediction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UiFlowState {
    started: bool,
    predict_clicked: bool,
    active_tab: ActiveTab,
}

impl UiFlowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn predict_clicked(&self) -> bool {
        self.predict_clicked
    }

    pub fn active_tab(&self) -> ActiveTab {
        self.active_tab
    }

    pub fn start(&mut self) {
        self.started = true;
    }

    pub fn record_prediction(&mut self) -> Result<(), FlowError> {
        if !self.started {
            return Err(FlowError::NotStarted);
        }
        self.predict_clicked = true;
        self.active_tab = ActiveTab::Result;
        Ok(())
    }

    pub fn screen(&self) -> Screen {
        if self.started {
            Screen::Workspace {
                show_result: self.predict_clicked,
            }
        } else {
            Screen::Welcome
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("the application form is not open yet; press Start first")]
    NotStarted,
}
