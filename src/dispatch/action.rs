//! The four actions and the dashboard group each one sits in

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Mint,
    Burn,
    Deposit,
    Withdraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Minting,
    Spending,
}

impl Group {
    pub fn as_str(&self) -> &'static str {
        match self {
            Group::Minting => "Minting",
            Group::Spending => "Spending",
        }
    }

    pub fn actions(&self) -> [Action; 2] {
        match self {
            Group::Minting => [Action::Mint, Action::Burn],
            Group::Spending => [Action::Deposit, Action::Withdraw],
        }
    }
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Mint, Action::Burn, Action::Deposit, Action::Withdraw];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Mint => "mint",
            Action::Burn => "burn",
            Action::Deposit => "deposit",
            Action::Withdraw => "withdraw",
        }
    }

    /// Button caption.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Mint => "Mint",
            Action::Burn => "Burn",
            Action::Deposit => "Deposit",
            Action::Withdraw => "Withdraw",
        }
    }

    pub fn group(&self) -> Group {
        match self {
            Action::Mint | Action::Burn => Group::Minting,
            Action::Deposit | Action::Withdraw => Group::Spending,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mint" => Some(Action::Mint),
            "burn" => Some(Action::Burn),
            "deposit" => Some(Action::Deposit),
            "withdraw" => Some(Action::Withdraw),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
