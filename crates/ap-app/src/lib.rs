//! # ap-app
//!
//! Application layer of Astra Phoenix: collection stream adapters, use
//! cases and the view-model that ties them to the UI.

pub mod deps;
pub mod streams;
pub mod usecases;
pub mod view_model;

pub use deps::{AppDeps, AppSettings};
pub use view_model::{AppViewModel, Frame, Screen, ViewModelSession};
