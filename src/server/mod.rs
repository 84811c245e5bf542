//! Server: axum surface over an emulator-backed dispatcher
//!
//! | Route | Method | Description |
//! |-------|--------|-------------|
//! | `/` | GET | Dashboard page |
//! | `/health` | GET | Health check |
//! | `/actions` | GET | Dashboard layout JSON |
//! | `/actions/{action}` | POST | Run mint, burn, deposit or withdraw |
//! | `/wallet` | GET | UTxOs and balance at the user's address |
//! | `/contract` | GET | UTxOs and balance at the contract address |

mod routes;

pub use routes::{create_router, create_router_with_name, AppState};
