//! Dispatch: four actions against a connected session
//!
//! # Components
//!
//! - **Session**: the consumed wallet/provider interface
//! - **Dispatcher**: builds requests and drives complete → sign → submit
//! - **Reporter**: receives exactly one outcome per action
//!
//! # Actions
//!
//! | Action | Group | Request |
//! |--------|-------|---------|
//! | mint | Minting | +1000 unit, Void redeemer, CIP-25 metadata |
//! | burn | Minting | collect wallet UTxOs with unit, −1000 unit |
//! | deposit | Spending | pay 1000 unit to the contract, inline Void datum |
//! | withdraw | Spending | collect contract UTxOs, Void redeemer, signer = user |

mod action;
mod dispatcher;
mod error;
mod reporter;
mod session;

pub use action::{Action, Group};
pub use dispatcher::{Dispatcher, Scripts};
pub use error::ActionError;
pub use reporter::{Callbacks, Outcome, Recorder, Reporter};
pub use session::Session;
