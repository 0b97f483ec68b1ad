// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod apply;
pub mod environment;
pub mod filter;
pub mod ids;
pub mod listing;
pub mod login;
pub mod model;
pub mod monitoring;
pub mod pagination;
pub mod session;
pub mod state;

pub use apply::*;
pub use environment::*;
pub use filter::*;
pub use ids::*;
pub use listing::*;
pub use login::*;
pub use model::*;
pub use monitoring::*;
pub use pagination::*;
pub use session::*;
pub use state::*;
