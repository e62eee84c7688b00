use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::entities::{Quote, QuoteRequest, Readiness};
use crate::error::Error;
use crate::pricing::SubmissionForm;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    #[serde(flatten)]
    request: QuoteRequest,
    #[serde(default)]
    form: Option<SubmissionForm>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    #[serde(flatten)]
    quote: Quote,
    /// Present when the caller sent form fields to check along with the quote.
    #[serde(skip_serializing_if = "Option::is_none")]
    submission: Option<Readiness>,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<CreateResponse>, Error> {
    let quote = api
        .create_quote(params.request.with_normalized_addresses())
        .await?;
    let submission = params.form.map(|form| form.check(&quote));

    Ok(CreateResponse { quote, submission }.into())
}
