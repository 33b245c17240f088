//! Integration tests for the signature protocol against a mock registry.
//!
//! Uses wiremock for HTTP mocking. The signature tag is backed by a small
//! stateful responder so attach-then-list exercises the same read-merge-write
//! path a real registry would see.

use std::sync::{Arc, Mutex};

use signet_core::{codec, Digest, SignatureObject, SigningIdentity};
use signet_registry::{
    DigestResolver, RegistryClient, RegistryConfig, RegistryCredential, RegistryError,
    SignatureEnumerator, SignatureStore,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const IMAGE_DIGEST_HEX: &str =
    "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

fn test_client() -> RegistryClient {
    RegistryClient::new(RegistryConfig::new().with_plain_http(true)).expect("client")
}

/// Registry host:port of the mock server, usable inside reference strings.
fn registry_host(server: &MockServer) -> String {
    server
        .uri()
        .strip_prefix("http://")
        .expect("mock server uri")
        .to_string()
}

fn test_identity() -> SigningIdentity {
    SigningIdentity::new("0xABC", "ethereum", "mainnet", 1, "0xdead")
}

fn signed_object(digest: &Digest, identity: SigningIdentity) -> SignatureObject {
    let payload = codec::build_payload(digest).expect("payload");
    SignatureObject::new(payload, "c2lnbmVk", identity, Some(1_700_000_000))
}

/// Shared state of one signature tag on the mock registry.
#[derive(Clone, Default)]
struct SignatureTag(Arc<Mutex<Option<Vec<u8>>>>);

/// GET side: serves the stored manifest, 404 until one is pushed.
struct ServeTag(SignatureTag);

impl Respond for ServeTag {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        match self.0 .0.lock().unwrap().as_ref() {
            Some(body) => ResponseTemplate::new(200)
                .set_body_raw(body.clone(), "application/vnd.oci.image.manifest.v1+json"),
            None => ResponseTemplate::new(404),
        }
    }
}

/// PUT side: stores the pushed manifest body.
struct AcceptTag(SignatureTag);

impl Respond for AcceptTag {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        *self.0 .0.lock().unwrap() = Some(request.body.clone());
        ResponseTemplate::new(201)
    }
}

/// Mounts a signature tag plus the blob-upload endpoints for `app`.
async fn mount_signature_tag(server: &MockServer, tag: &str) -> SignatureTag {
    let state = SignatureTag::default();

    Mock::given(method("GET"))
        .and(path(format!("/v2/app/manifests/{tag}")))
        .respond_with(ServeTag(state.clone()))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/v2/app/manifests/{tag}")))
        .respond_with(AcceptTag(state.clone()))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/app/blobs/uploads/"))
        .respond_with(
            ResponseTemplate::new(202).insert_header("location", "/v2/app/blobs/uploads/session"),
        )
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v2/app/blobs/uploads/session"))
        .respond_with(ResponseTemplate::new(201))
        .mount(server)
        .await;

    state
}

#[tokio::test]
async fn resolve_tag_reads_content_digest_header() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/v2/app/manifests/v1"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Docker-Content-Digest", format!("sha256:{IMAGE_DIGEST_HEX}")),
        )
        .mount(&server)
        .await;

    let client = test_client();
    let resolver = DigestResolver::new(&client);
    let reference = format!("{}/app:v1", registry_host(&server));

    let digest = resolver
        .resolve(&reference, &RegistryCredential::bearer("test-token"))
        .await
        .expect("resolve failed");

    assert_eq!(digest.digest_str(), format!("sha256:{IMAGE_DIGEST_HEX}"));
    assert_eq!(digest.repository(), "app");
}

#[tokio::test]
async fn resolve_falls_back_to_hashing_the_manifest_body() {
    let server = MockServer::start().await;
    let manifest_body = br#"{"schemaVersion":2}"#;

    Mock::given(method("HEAD"))
        .and(path("/v2/app/manifests/v1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/app/manifests/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            manifest_body.to_vec(),
            "application/vnd.oci.image.manifest.v1+json",
        ))
        .mount(&server)
        .await;

    let client = test_client();
    let resolver = DigestResolver::new(&client);
    let reference = format!("{}/app:v1", registry_host(&server));

    let digest = resolver
        .resolve(&reference, &RegistryCredential::Anonymous)
        .await
        .expect("resolve failed");

    assert_eq!(
        digest.digest_str(),
        RegistryClient::compute_digest(manifest_body)
    );
}

#[tokio::test]
async fn resolve_missing_manifest_is_resolution_failure() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/v2/app/manifests/v1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client();
    let resolver = DigestResolver::new(&client);
    let reference = format!("{}/app:v1", registry_host(&server));

    let result = resolver
        .resolve(&reference, &RegistryCredential::Anonymous)
        .await;

    assert!(matches!(
        result,
        Err(RegistryError::ResolutionFailed { .. })
    ));
}

#[tokio::test]
async fn resolve_rejected_credential_is_resolution_failure() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/v2/app/manifests/v1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = test_client();
    let resolver = DigestResolver::new(&client);
    let reference = format!("{}/app:v1", registry_host(&server));

    let result = resolver
        .resolve(&reference, &RegistryCredential::bearer("expired"))
        .await;

    assert!(matches!(
        result,
        Err(RegistryError::ResolutionFailed { .. })
    ));
}

#[tokio::test]
async fn attach_then_list_returns_the_attached_identity() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/v2/app/manifests/v1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Docker-Content-Digest", format!("sha256:{IMAGE_DIGEST_HEX}")),
        )
        .mount(&server)
        .await;

    let tag = format!("sha256-{IMAGE_DIGEST_HEX}.eth");
    mount_signature_tag(&server, &tag).await;

    let client = test_client();
    let credential = RegistryCredential::bearer("test-token");
    let reference = format!("{}/app:v1", registry_host(&server));

    let digest = DigestResolver::new(&client)
        .resolve(&reference, &credential)
        .await
        .expect("resolve failed");

    let signature = signed_object(&digest, test_identity());
    SignatureStore::new(&client)
        .attach(&digest, &signature, &credential)
        .await
        .expect("attach failed");

    let list = SignatureEnumerator::new(&client)
        .list(&digest, &credential)
        .await
        .expect("list failed");

    assert_eq!(list.entries.len(), 1);
    assert_eq!(list.skipped, 0);

    let entry = &list.entries[0];
    assert_eq!(entry.identity.address, "0xABC");
    assert_eq!(entry.identity.txn, "0xdead");
    assert_eq!(entry.identity.blockchain, "ethereum");
    assert_eq!(entry.identity.chain_id, 1);
    assert_eq!(entry.signature, "c2lnbmVk");
    assert_eq!(entry.payload, codec::build_payload(&digest).unwrap());
}

#[tokio::test]
async fn attaching_two_signers_sequentially_lists_both() {
    let server = MockServer::start().await;
    let tag = format!("sha256-{IMAGE_DIGEST_HEX}.eth");
    mount_signature_tag(&server, &tag).await;

    let client = test_client();
    let credential = RegistryCredential::bearer("test-token");
    let digest = Digest::new(registry_host(&server), "app", "sha256", IMAGE_DIGEST_HEX);

    let store = SignatureStore::new(&client);
    store
        .attach(&digest, &signed_object(&digest, test_identity()), &credential)
        .await
        .expect("first attach failed");
    store
        .attach(
            &digest,
            &signed_object(
                &digest,
                SigningIdentity::new("0xDEF", "ethereum", "mainnet", 1, "0xbeef"),
            ),
            &credential,
        )
        .await
        .expect("second attach failed");

    let list = SignatureEnumerator::new(&client)
        .list(&digest, &credential)
        .await
        .expect("list failed");

    let mut signers: Vec<&str> = list
        .entries
        .iter()
        .map(|s| s.identity.address.as_str())
        .collect();
    signers.sort_unstable();
    assert_eq!(signers, ["0xABC", "0xDEF"]);
}

#[tokio::test]
async fn list_with_no_signature_entity_is_no_signatures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/v2/app/manifests/sha256-{IMAGE_DIGEST_HEX}.eth"
        )))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client();
    let digest = Digest::new(registry_host(&server), "app", "sha256", IMAGE_DIGEST_HEX);

    let result = SignatureEnumerator::new(&client)
        .list(&digest, &RegistryCredential::Anonymous)
        .await;

    assert!(matches!(result, Err(RegistryError::NoSignatures { .. })));
}

#[tokio::test]
async fn list_with_unreachable_entity_is_entity_access_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/v2/app/manifests/sha256-{IMAGE_DIGEST_HEX}.eth"
        )))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client();
    let digest = Digest::new(registry_host(&server), "app", "sha256", IMAGE_DIGEST_HEX);

    let result = SignatureEnumerator::new(&client)
        .list(&digest, &RegistryCredential::Anonymous)
        .await;

    assert!(matches!(
        result,
        Err(RegistryError::EntityAccessFailed { .. })
    ));
}

#[tokio::test]
async fn list_skips_undecodable_entries_and_counts_them() {
    let server = MockServer::start().await;

    let manifest = serde_json::json!({
        "schemaVersion": 2,
        "mediaType": "application/vnd.oci.image.manifest.v1+json",
        "config": {
            "mediaType": "application/vnd.oci.image.config.v1+json",
            "digest": "sha256:cfg",
            "size": 2
        },
        "layers": [
            {
                "mediaType": "application/vnd.dev.cosign.simplesigning.v1+json",
                "digest": "sha256:valid",
                "size": 10,
                "annotations": {
                    "dev.cosignproject.cosign/signature": "c2lnbmVk",
                    "dev.cosignproject.cosign/signer": "0xABC",
                    "dev.cosignproject.cosign/transaction": "0xdead",
                    "dev.cosignproject.cosign/timestamp": "1700000000"
                }
            },
            {
                "mediaType": "application/vnd.dev.cosign.simplesigning.v1+json",
                "digest": "sha256:no-signer",
                "size": 10,
                "annotations": {
                    "dev.cosignproject.cosign/signature": "c2ln",
                    "dev.cosignproject.cosign/timestamp": "1700000000"
                }
            },
            {
                "mediaType": "application/vnd.oci.image.layer.v1.tar",
                "digest": "sha256:foreign",
                "size": 10
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path(format!(
            "/v2/app/manifests/sha256-{IMAGE_DIGEST_HEX}.eth"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(manifest))
        .mount(&server)
        .await;

    let client = test_client();
    let digest = Digest::new(registry_host(&server), "app", "sha256", IMAGE_DIGEST_HEX);

    let list = SignatureEnumerator::new(&client)
        .list(&digest, &RegistryCredential::Anonymous)
        .await
        .expect("list failed");

    assert_eq!(list.entries.len(), 1);
    assert_eq!(list.skipped, 2);
    assert_eq!(list.entries[0].identity.address, "0xABC");
}

#[tokio::test]
async fn attach_with_unreadable_entity_is_entity_access_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/v2/app/manifests/sha256-{IMAGE_DIGEST_HEX}.eth"
        )))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client();
    let digest = Digest::new(registry_host(&server), "app", "sha256", IMAGE_DIGEST_HEX);
    let signature = signed_object(&digest, test_identity());

    let result = SignatureStore::new(&client)
        .attach(&digest, &signature, &RegistryCredential::Anonymous)
        .await;

    assert!(matches!(
        result,
        Err(RegistryError::EntityAccessFailed { .. })
    ));
}

#[tokio::test]
async fn attach_with_rejected_upload_is_write_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!(
            "/v2/app/manifests/sha256-{IMAGE_DIGEST_HEX}.eth"
        )))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/app/blobs/uploads/"))
        .respond_with(ResponseTemplate::new(507))
        .mount(&server)
        .await;

    let client = test_client();
    let digest = Digest::new(registry_host(&server), "app", "sha256", IMAGE_DIGEST_HEX);
    let signature = signed_object(&digest, test_identity());

    let result = SignatureStore::new(&client)
        .attach(&digest, &signature, &RegistryCredential::Anonymous)
        .await;

    assert!(matches!(result, Err(RegistryError::WriteFailed { .. })));
}

#[tokio::test]
async fn attach_forwards_the_caller_credential() {
    let server = MockServer::start().await;
    let tag = format!("sha256-{IMAGE_DIGEST_HEX}.eth");
    mount_signature_tag(&server, &tag).await;

    let client = test_client();
    let digest = Digest::new(registry_host(&server), "app", "sha256", IMAGE_DIGEST_HEX);
    let signature = signed_object(&digest, test_identity());

    SignatureStore::new(&client)
        .attach(&digest, &signature, &RegistryCredential::bearer("push-token"))
        .await
        .expect("attach failed");

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(!requests.is_empty());
    assert!(requests.iter().all(|r| {
        r.headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer push-token")
    }));
}
