// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod badge;
pub mod error;
pub mod fallback;
pub mod filter;
pub mod ids;
pub mod kpi;
pub mod model;
pub mod render;
pub mod screens;
pub mod state;
pub mod view;

pub use badge::*;
pub use error::*;
pub use filter::*;
pub use ids::*;
pub use kpi::*;
pub use model::*;
pub use render::*;
pub use state::*;
pub use view::*;
