//! Amazon Cognito user-pool provider over the JSON 1.1 HTTP API.
//!
//! `SignUp` is a public operation authenticated by the app client id alone.
//! `AdminDeleteUser` needs AWS credentials and is signed with Signature
//! Version 4.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use sha2::{Digest, Sha256};

use crate::identity::{IdentityError, IdentityProvider, IdentitySettings, SignUpRequest};

type HmacSha256 = Hmac<Sha256>;

const SERVICE: &str = "cognito-idp";
const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Static AWS credentials used to sign admin calls.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl core::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Where and as whom to reach Cognito.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CognitoOptions {
    pub region: String,
    /// Overrides the regional endpoint (local emulators, tests).
    pub endpoint: Option<String>,
    pub credentials: Option<AwsCredentials>,
}

impl Default for CognitoOptions {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
            credentials: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CognitoIdentityProvider {
    client: reqwest::Client,
    endpoint: Url,
    region: String,
    settings: IdentitySettings,
    credentials: Option<AwsCredentials>,
}

impl CognitoIdentityProvider {
    pub fn new(settings: IdentitySettings, options: CognitoOptions) -> Result<Self, IdentityError> {
        let raw = options
            .endpoint
            .unwrap_or_else(|| format!("https://{SERVICE}.{}.amazonaws.com/", options.region));
        let endpoint = Url::parse(&raw).map_err(|e| IdentityError::Backend(format!("invalid endpoint {raw:?}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IdentityError::Backend(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            region: options.region,
            settings,
            credentials: options.credentials,
        })
    }

    /// POST one action; `signed` calls carry a SigV4 `Authorization` header.
    async fn call(
        &self,
        action: &str,
        body: serde_json::Value,
        signed: bool,
        subject: &str,
    ) -> Result<(), IdentityError> {
        let payload = body.to_string().into_bytes();
        let target = format!("{TARGET_PREFIX}.{action}");

        let mut req = self
            .client
            .post(self.endpoint.clone())
            .header("content-type", CONTENT_TYPE)
            .header("x-amz-target", &target);

        if signed {
            let credentials = self
                .credentials
                .as_ref()
                .ok_or(IdentityError::NotConfigured("AWS_ACCESS_KEY_ID"))?;
            let headers = sign_request(
                credentials,
                &self.region,
                &host_header(&self.endpoint),
                &target,
                &payload,
                Utc::now(),
            )?;
            for (name, value) in headers {
                req = req.header(name, value);
            }
        }

        let resp = req
            .body(payload)
            .send()
            .await
            .map_err(|e| IdentityError::Backend(format!("{action}: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(action, "cognito call succeeded");
            return Ok(());
        }

        let text = resp.text().await.unwrap_or_default();
        Err(map_error(action, status.as_u16(), &text, subject))
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
    async fn sign_up(&self, request: SignUpRequest) -> Result<(), IdentityError> {
        let client_id = self
            .settings
            .app_client_id
            .as_deref()
            .ok_or(IdentityError::NotConfigured("COGNITO_APP_CLIENT_ID"))?;

        let body = json!({
            "ClientId": client_id,
            "Username": request.email,
            "Password": request.password,
            "UserAttributes": [
                { "Name": "email", "Value": request.email },
                { "Name": "custom:profileId", "Value": request.attributes.profile_id.to_string() },
                { "Name": "custom:userType", "Value": request.attributes.user_type },
            ],
        });
        self.call("SignUp", body, false, &request.email).await
    }

    async fn delete_account(&self, email: &str) -> Result<(), IdentityError> {
        let pool_id = self
            .settings
            .user_pool_id
            .as_deref()
            .ok_or(IdentityError::NotConfigured("COGNITO_USER_POOL_ID"))?;

        let body = json!({ "UserPoolId": pool_id, "Username": email });
        self.call("AdminDeleteUser", body, true, email).await
    }

    fn deletion_enabled(&self) -> bool {
        self.settings.user_pool_id.is_some()
    }
}

#[derive(Deserialize)]
struct AwsErrorBody {
    #[serde(rename = "__type", default)]
    kind: String,
    #[serde(alias = "Message", default)]
    message: String,
}

fn map_error(action: &str, status: u16, body: &str, subject: &str) -> IdentityError {
    let parsed: Option<AwsErrorBody> = serde_json::from_str(body).ok();
    let (kind, message) = parsed.map(|b| (b.kind, b.message)).unwrap_or_default();
    // `__type` may carry a namespace prefix: "com.amazonaws...#UsernameExistsException".
    let kind = kind.rsplit('#').next().unwrap_or_default();

    match kind {
        "UsernameExistsException" => IdentityError::AlreadyExists(subject.to_string()),
        "UserNotFoundException" => IdentityError::NotFound(subject.to_string()),
        "" => IdentityError::Backend(format!("{action} failed with status {status}")),
        other => IdentityError::Backend(format!("{action} failed with {other}: {message}")),
    }
}

fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Headers that sign a POST to `/` for the Cognito service.
fn sign_request(
    credentials: &AwsCredentials,
    region: &str,
    host: &str,
    target: &str,
    payload: &[u8],
    now: DateTime<Utc>,
) -> Result<Vec<(&'static str, String)>, IdentityError> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();

    // Canonical headers must be lowercase and sorted by name.
    let mut canonical: Vec<(&'static str, String)> = vec![
        ("content-type", CONTENT_TYPE.to_string()),
        ("host", host.to_string()),
        ("x-amz-date", amz_date.clone()),
    ];
    if let Some(token) = &credentials.session_token {
        canonical.push(("x-amz-security-token", token.clone()));
    }
    canonical.push(("x-amz-target", target.to_string()));

    let signed_headers = canonical.iter().map(|(k, _)| *k).collect::<Vec<_>>().join(";");
    let header_block: String = canonical.iter().map(|(k, v)| format!("{k}:{}\n", v.trim())).collect();
    let canonical_request = format!(
        "POST\n/\n\n{header_block}\n{signed_headers}\n{}",
        sha256_hex(payload)
    );

    let scope = format!("{date}/{region}/{SERVICE}/aws4_request");
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    let key = signing_key(&credentials.secret_access_key, &date, region, SERVICE)?;
    let signature = hex(&hmac_sha256(&key, string_to_sign.as_bytes())?);

    let mut headers = vec![
        ("x-amz-date", amz_date),
        (
            "authorization",
            format!(
                "AWS4-HMAC-SHA256 Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
                credentials.access_key_id
            ),
        ),
    ];
    if let Some(token) = &credentials.session_token {
        headers.push(("x-amz-security-token", token.clone()));
    }
    Ok(headers)
}

fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>, IdentityError> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, IdentityError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| IdentityError::Backend(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Extension, Router};
    use chrono::TimeZone;
    use interviewselect_core::ProfileId;

    use super::*;
    use crate::identity::AccountAttributes;

    fn credentials(session_token: Option<&str>) -> AwsCredentials {
        AwsCredentials {
            access_key_id: "AKIDEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_string(),
            session_token: session_token.map(str::to_string),
        }
    }

    #[test]
    fn hmac_matches_rfc_4231_case_2() {
        let mac = hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(hex(&mac), "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");
    }

    #[test]
    fn sha256_of_empty_payload() {
        assert_eq!(sha256_hex(b""), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }

    #[test]
    fn signing_key_matches_aws_documentation() {
        let key = signing_key("wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY", "20120215", "us-east-1", "iam").unwrap();
        assert_eq!(hex(&key), "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d");
    }

    #[test]
    fn authorization_header_names_scope_and_signed_headers() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let headers = sign_request(
            &credentials(None),
            "eu-west-1",
            "cognito-idp.eu-west-1.amazonaws.com",
            "AWSCognitoIdentityProviderService.AdminDeleteUser",
            b"{}",
            now,
        )
        .unwrap();

        assert_eq!(headers[0], ("x-amz-date", "20240301T123000Z".to_string()));
        let auth = &headers[1].1;
        let prefix = "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240301/eu-west-1/cognito-idp/aws4_request, \
                      SignedHeaders=content-type;host;x-amz-date;x-amz-target, Signature=";
        assert!(auth.starts_with(prefix), "{auth}");
        assert_eq!(auth[prefix.len()..].len(), 64);
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn session_token_is_signed_and_sent() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let headers = sign_request(&credentials(Some("token")), "us-east-1", "localhost:9229", "T", b"{}", now).unwrap();

        assert!(headers[1].1.contains("SignedHeaders=content-type;host;x-amz-date;x-amz-security-token;x-amz-target"));
        assert_eq!(headers[2], ("x-amz-security-token", "token".to_string()));
    }

    #[test]
    fn signatures_depend_on_the_payload() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let a = sign_request(&credentials(None), "us-east-1", "h", "T", b"{\"a\":1}", now).unwrap();
        let b = sign_request(&credentials(None), "us-east-1", "h", "T", b"{\"a\":2}", now).unwrap();
        assert_ne!(a[1], b[1]);
    }

    #[test]
    fn service_errors_map_to_identity_errors() {
        let body = r#"{"__type":"UsernameExistsException","message":"User already exists"}"#;
        assert_eq!(
            map_error("SignUp", 400, body, "a@b.com"),
            IdentityError::AlreadyExists("a@b.com".to_string())
        );

        let body = r#"{"__type":"com.amazonaws.cognito#UserNotFoundException","message":"gone"}"#;
        assert_eq!(
            map_error("AdminDeleteUser", 400, body, "a@b.com"),
            IdentityError::NotFound("a@b.com".to_string())
        );

        assert!(matches!(
            map_error("SignUp", 400, r#"{"__type":"InvalidPasswordException","message":"too weak"}"#, "x"),
            IdentityError::Backend(msg) if msg.contains("InvalidPasswordException")
        ));
        assert!(matches!(map_error("SignUp", 503, "", "x"), IdentityError::Backend(_)));
    }

    #[test]
    fn host_header_keeps_non_default_ports() {
        assert_eq!(host_header(&Url::parse("http://127.0.0.1:9229/").unwrap()), "127.0.0.1:9229");
        assert_eq!(
            host_header(&Url::parse("https://cognito-idp.us-east-1.amazonaws.com/").unwrap()),
            "cognito-idp.us-east-1.amazonaws.com"
        );
    }

    #[test]
    fn credentials_are_redacted_in_debug_output() {
        let rendered = format!("{:?}", credentials(Some("session")));
        assert!(rendered.contains("AKIDEXAMPLE"));
        assert!(!rendered.contains("EXAMPLEKEY"));
        assert!(!rendered.contains("session\""));
    }

    /// One captured request: headers plus the parsed JSON body.
    type Captured = Arc<Mutex<Vec<(HeaderMap, serde_json::Value)>>>;

    struct MockCognito {
        endpoint: String,
        captured: Captured,
        handle: tokio::task::JoinHandle<()>,
    }

    impl MockCognito {
        /// Answers every call with `status` and `body`.
        async fn spawn(status: StatusCode, body: &'static str) -> Self {
            let captured: Captured = Arc::default();
            let app = Router::new()
                .route(
                    "/",
                    post(move |Extension(log): Extension<Captured>, headers: HeaderMap, body_in: String| async move {
                        let json = serde_json::from_str(&body_in).unwrap_or(serde_json::Value::Null);
                        log.lock().unwrap().push((headers, json));
                        (status, body)
                    }),
                )
                .layer(Extension(captured.clone()));

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let handle = tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self {
                endpoint: format!("http://{addr}/"),
                captured,
                handle,
            }
        }

        fn provider(&self, settings: IdentitySettings, credentials: Option<AwsCredentials>) -> CognitoIdentityProvider {
            CognitoIdentityProvider::new(
                settings,
                CognitoOptions {
                    region: "us-east-1".to_string(),
                    endpoint: Some(self.endpoint.clone()),
                    credentials,
                },
            )
            .unwrap()
        }

        fn requests(&self) -> Vec<(HeaderMap, serde_json::Value)> {
            self.captured.lock().unwrap().clone()
        }
    }

    impl Drop for MockCognito {
        fn drop(&mut self) {
            self.handle.abort();
        }
    }

    fn settings() -> IdentitySettings {
        IdentitySettings {
            user_pool_id: Some("us-east-1_pool".to_string()),
            app_client_id: Some("client-123".to_string()),
        }
    }

    fn sign_up_request(email: &str) -> SignUpRequest {
        SignUpRequest {
            email: email.to_string(),
            password: "password123".to_string(),
            attributes: AccountAttributes {
                profile_id: ProfileId::new(),
                user_type: "freelancer".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn sign_up_posts_client_id_and_attributes() {
        let mock = MockCognito::spawn(StatusCode::OK, r#"{"UserConfirmed":false}"#).await;
        let provider = mock.provider(settings(), None);
        let request = sign_up_request("new@example.com");
        let profile_id = request.attributes.profile_id.to_string();

        provider.sign_up(request).await.unwrap();

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        let (headers, body) = &requests[0];
        assert_eq!(headers["x-amz-target"], "AWSCognitoIdentityProviderService.SignUp");
        assert_eq!(headers["content-type"], CONTENT_TYPE);
        assert!(headers.get("authorization").is_none());
        assert_eq!(body["ClientId"], "client-123");
        assert_eq!(body["Username"], "new@example.com");
        assert_eq!(body["Password"], "password123");
        assert_eq!(
            body["UserAttributes"],
            json!([
                { "Name": "email", "Value": "new@example.com" },
                { "Name": "custom:profileId", "Value": profile_id },
                { "Name": "custom:userType", "Value": "freelancer" },
            ])
        );
    }

    #[tokio::test]
    async fn existing_username_is_already_exists() {
        let mock = MockCognito::spawn(
            StatusCode::BAD_REQUEST,
            r#"{"__type":"UsernameExistsException","message":"An account with the given email already exists."}"#,
        )
        .await;
        let provider = mock.provider(settings(), None);

        let err = provider.sign_up(sign_up_request("dup@example.com")).await.unwrap_err();
        assert_eq!(err, IdentityError::AlreadyExists("dup@example.com".to_string()));
    }

    #[tokio::test]
    async fn sign_up_without_client_id_sends_nothing() {
        let mock = MockCognito::spawn(StatusCode::OK, "{}").await;
        let provider = mock.provider(IdentitySettings::default(), None);

        let err = provider.sign_up(sign_up_request("a@example.com")).await.unwrap_err();
        assert_eq!(err, IdentityError::NotConfigured("COGNITO_APP_CLIENT_ID"));
        assert!(mock.requests().is_empty());
        assert!(!provider.deletion_enabled());
    }

    #[tokio::test]
    async fn admin_delete_is_signed() {
        let mock = MockCognito::spawn(StatusCode::OK, "{}").await;
        let provider = mock.provider(settings(), Some(credentials(None)));

        provider.delete_account("gone@example.com").await.unwrap();

        let requests = mock.requests();
        let (headers, body) = &requests[0];
        assert_eq!(headers["x-amz-target"], "AWSCognitoIdentityProviderService.AdminDeleteUser");
        assert!(
            headers["authorization"]
                .to_str()
                .unwrap()
                .starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/")
        );
        assert!(headers.contains_key("x-amz-date"));
        assert_eq!(body, &json!({ "UserPoolId": "us-east-1_pool", "Username": "gone@example.com" }));
    }

    #[tokio::test]
    async fn admin_delete_of_unknown_user_is_not_found() {
        let mock = MockCognito::spawn(
            StatusCode::BAD_REQUEST,
            r#"{"__type":"UserNotFoundException","message":"User does not exist."}"#,
        )
        .await;
        let provider = mock.provider(settings(), Some(credentials(None)));

        let err = provider.delete_account("ghost@example.com").await.unwrap_err();
        assert_eq!(err, IdentityError::NotFound("ghost@example.com".to_string()));
    }

    #[tokio::test]
    async fn admin_delete_needs_credentials() {
        let mock = MockCognito::spawn(StatusCode::OK, "{}").await;
        let provider = mock.provider(settings(), None);

        assert!(provider.deletion_enabled());
        let err = provider.delete_account("a@example.com").await.unwrap_err();
        assert_eq!(err, IdentityError::NotConfigured("AWS_ACCESS_KEY_ID"));
        assert!(mock.requests().is_empty());
    }
}
