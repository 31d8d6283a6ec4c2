// UI module
// Text rendering of the workflow view

pub mod components;
pub mod layout;

pub use components::EventLog;
pub use layout::render_view;
