// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod controller;
pub mod filter;
pub mod host;
pub mod ids;
pub mod ingest;
pub mod model;
pub mod portals;
pub mod state;
pub mod view;

pub use controller::*;
pub use filter::*;
pub use host::*;
pub use ids::*;
pub use ingest::*;
pub use model::*;
pub use portals::*;
pub use state::*;
pub use view::*;
