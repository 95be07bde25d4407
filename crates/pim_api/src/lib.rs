//! Request surface for the personal info manager.
//!
//! Each entry point takes key/value form input and returns a [`Response`]:
//! a view to render or a route to redirect to, plus an optional notice.

mod app;
mod error;
mod form;
mod response;

pub use app::App;
pub use error::ApiError;
pub use form::{Form, FormError};
pub use response::{Notice, NoticeLevel, Outcome, Response, Route, View};
