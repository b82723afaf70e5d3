//! Collaborator seams: email delivery and invoice rendering

pub mod email;
pub mod invoice;

pub use email::{EmailError, EmailSender, LogMailer, SharedMailer};
pub use invoice::{InvoiceRenderer, invoice_data};
