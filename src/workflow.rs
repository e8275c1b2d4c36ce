// Upload workflow: list the user's pastes, offer to delete the ones that
// share the new paste's name, then create the new paste.
//
// Listing -> ConfirmingDelete (only when a title matches) -> Uploading -> Done
//
// A failed delete is reported in the `UploadReport` and does not stop the
// remaining confirmations or the upload. Nothing is rolled back if the
// upload fails after a delete.

use tracing::{info, warn};

use crate::api::{FormResponse, PastebinClient, Transport};
use crate::error::Result;
use crate::upload::UploadRequest;

/// Yes/no question asked before each delete.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// `y` or `yes` in any case; everything else, including nothing, is a no.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

/// What happened to one paste that shared the new paste's name.
#[derive(Debug)]
pub enum DeleteOutcome {
    Skipped,
    Deleted(FormResponse),
    /// The API answered with an in-band error.
    Refused(FormResponse),
    /// The delete request itself failed.
    Failed(String),
}

impl DeleteOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, DeleteOutcome::Refused(_) | DeleteOutcome::Failed(_))
    }
}

#[derive(Debug)]
pub struct Deletion {
    pub paste_key: String,
    pub outcome: DeleteOutcome,
}

#[derive(Debug)]
pub struct UploadReport {
    pub deletions: Vec<Deletion>,
    /// Raw response of the create call.
    pub response: FormResponse,
}

pub fn delete_prompt(name: &str) -> String {
    format!("paste of the name {name} exists already, delete it? [yes/No]")
}

/// Run the whole upload for an already logged-in user.
pub fn run_upload<T, C>(
    client: &PastebinClient<T>,
    user_key: &str,
    request: &UploadRequest,
    confirm: &mut C,
) -> Result<UploadReport>
where
    T: Transport,
    C: Confirm + ?Sized,
{
    let pastes = client.list_pastes(user_key)?;

    let mut deletions = Vec::new();
    for paste in pastes.iter().filter(|p| p.title == request.name) {
        if !confirm.confirm(&delete_prompt(&request.name)) {
            info!(paste_key = %paste.key, "keeping existing paste");
            deletions.push(Deletion {
                paste_key: paste.key.clone(),
                outcome: DeleteOutcome::Skipped,
            });
            continue;
        }

        let outcome = match client.delete_paste(user_key, &paste.key) {
            Ok(res) if res.is_bad_request() => {
                warn!(paste_key = %paste.key, body = %res.body.trim(), "delete refused");
                DeleteOutcome::Refused(res)
            }
            Ok(res) => {
                info!(paste_key = %paste.key, "deleted existing paste");
                DeleteOutcome::Deleted(res)
            }
            Err(e) => {
                warn!(paste_key = %paste.key, error = %e, "failed to delete");
                DeleteOutcome::Failed(e.to_string())
            }
        };
        deletions.push(Deletion {
            paste_key: paste.key.clone(),
            outcome,
        });
    }

    let response = client.create_paste(user_key, request)?;
    info!(status = response.status, "upload finished");

    Ok(UploadReport {
        deletions,
        response,
    })
}
