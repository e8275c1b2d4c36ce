// Library root
// -----------
// This crate exposes the pieces the `pastebiner` binary is built from.
//
// Module responsibilities:
// - `config`: credentials, endpoints and paste defaults read from the
//   environment (and `.env` files merged into it).
// - `paste`: paste records and the decoder for the `list` response.
// - `upload`: turns a local file (or piped stdin) into an upload request.
// - `user`: account details from the `userdetails` call.
// - `api`: form-encoded calls to the paste API behind a `Transport` seam.
// - `workflow`: list, confirm-and-delete, then upload.
// - `ui`: terminal prompt, spinner and output.
pub mod api;
pub mod config;
pub mod error;
pub mod paste;
pub mod ui;
pub mod upload;
pub mod user;
pub mod workflow;

pub use error::{PastebinError, Result};
