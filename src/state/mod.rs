// State management module
// Holds the view state the poller writes and the renderer reads

pub mod app_state;

pub use app_state::ViewState;
