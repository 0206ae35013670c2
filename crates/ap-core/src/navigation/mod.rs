//! View routing.

mod state_machine;

pub use state_machine::{RouteAction, RouteEvent, RouteState, View, ViewRouter};
