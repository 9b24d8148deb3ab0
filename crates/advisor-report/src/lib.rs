//! Rendering, storage and email delivery of analysis reports.
//!
//! Rendering is pure string templating; [`save_report`] and
//! [`EmailSender::send_report`] are the only side effects.

#![warn(missing_docs)]

mod email;
mod error;
mod html;
mod save;
mod text;

pub use email::{EmailSender, MailTransport, SmtpMailer};
pub use error::{EmailError, ReportError};
pub use html::{html_escape, render};
pub use save::{report_filename, save_report};
pub use text::plain_text;
