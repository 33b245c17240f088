//! Request handlers for the three service endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use signet_core::{codec, SignatureObject, SigningIdentity};
use signet_registry::{DigestResolver, RegistryCredential, SignatureEnumerator, SignatureStore};

use crate::error::ApiError;
use crate::routes::AppState;

/// Query parameters shared by the check and signed endpoints.
#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    image: Option<String>,
}

/// Response body of `GET /check`.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    digest: String,
}

/// Request body of `POST /sign`.
#[derive(Debug, Deserialize)]
pub struct SignRequest {
    /// Image reference.
    image: String,

    /// Chain name.
    blockchain: String,

    /// Public wallet address.
    address: String,

    /// Hash of the authorizing transaction.
    txn: String,

    /// Network name.
    network: String,

    /// Chain id of the network.
    #[serde(rename = "chainID")]
    chain_id: u64,

    /// Base64 signature produced by the signer's wallet.
    signature: String,
}

/// Response body of `GET /signed`.
#[derive(Debug, Serialize)]
pub struct SignedResponse {
    digest: String,
    signers: Vec<SignerEntry>,
}

/// One signer in the signed response.
#[derive(Debug, Serialize)]
pub struct SignerEntry {
    signer: String,
    signature: String,
    txn: String,
    time: String,
}

/// Extracts the bearer token from the Authorization header.
///
/// Fails the request before any registry traffic when the header is absent
/// or carries no token.
fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match value.split_once("Bearer") {
        Some((_, token)) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(ApiError::BadRequest(
            "could not find bearer token in Authorization header".to_string(),
        )),
    }
}

fn image_param(query: ImageQuery) -> Result<String, ApiError> {
    query
        .image
        .ok_or_else(|| ApiError::BadRequest("image query not found".to_string()))
}

/// `GET /check`: resolves a reference to its current digest.
pub async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ImageQuery>,
) -> Result<Json<CheckResponse>, ApiError> {
    let credential = RegistryCredential::bearer(bearer_token(&headers)?);
    let image = image_param(query)?;

    let digest = DigestResolver::new(state.registry())
        .resolve(&image, &credential)
        .await?;

    Ok(Json(CheckResponse {
        digest: digest.digest_str(),
    }))
}

/// `POST /sign`: attaches a wallet signature to the referenced image.
pub async fn sign(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<SignRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let credential = RegistryCredential::bearer(bearer_token(&headers)?);
    let Json(request) =
        body.map_err(|e| ApiError::BadRequest(format!("error reading request body: {e}")))?;

    let digest = DigestResolver::new(state.registry())
        .resolve(&request.image, &credential)
        .await?;

    let payload = codec::build_payload(&digest)?;
    let identity = SigningIdentity::new(
        request.address,
        request.blockchain,
        request.network,
        request.chain_id,
        request.txn,
    );
    let signature = SignatureObject::new(payload, request.signature, identity, None);

    SignatureStore::new(state.registry())
        .attach(&digest, &signature, &credential)
        .await?;

    Ok(StatusCode::CREATED)
}

/// `GET /signed`: lists every valid signature attached to the referenced
/// image. The credential is optional on this read path; anonymous access is
/// used when no bearer token is supplied.
pub async fn signed(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ImageQuery>,
) -> Result<Json<SignedResponse>, ApiError> {
    let credential = bearer_token(&headers)
        .map_or(RegistryCredential::Anonymous, RegistryCredential::bearer);
    let image = image_param(query)?;

    let resolver = DigestResolver::new(state.registry());
    let digest = resolver.resolve(&image, &credential).await?;

    let list = SignatureEnumerator::new(state.registry())
        .list(&digest, &credential)
        .await?;

    let signers = list
        .entries
        .into_iter()
        .map(|entry| SignerEntry {
            signer: entry.identity.address,
            signature: entry.signature,
            txn: entry.identity.txn,
            time: chrono::DateTime::from_timestamp(entry.timestamp, 0)
                .map_or_else(|| entry.timestamp.to_string(), |dt| dt.to_string()),
        })
        .collect();

    Ok(Json(SignedResponse {
        digest: digest.digest_str(),
        signers,
    }))
}

/// Fallback for unsupported methods on the sign route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::BadRequest("only POST is allowed".to_string())
}
