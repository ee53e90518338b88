//! Logging in, two-factor authentication and the current user.
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::{
    api::{decode, BaseResponse, Response},
    client::{Client, RequestOptions},
};

/// Appended to the password before hashing it for [`AuthApi::login_hash`].
pub const HASH_SALT: &str = "-https://github.com/alist-org/alist";

/// The password digest expected by `/api/auth/login/hash`: lowercase hex of
/// `SHA-256(password + HASH_SALT)`.
///
/// ```
/// assert_eq!(
///     openlist::auth::hash_password("password123"),
///     "046119821c86ff68c103f32322077b108bde0d58d09c9f85cf98c3471aafa17e",
/// );
/// ```
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(HASH_SALT.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Serialize)]
struct LoginReq<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    otp_code: Option<&'a str>,
}

impl<'a> LoginReq<'a> {
    fn new(username: &'a str, password: &'a str, otp_code: Option<&'a str>) -> Self {
        Self {
            username,
            password,
            otp_code: otp_code.filter(|code| !code.is_empty()),
        }
    }
}

/// Successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    /// JWT to pass to [`Client::set_credential`]. Valid for 48 hours by default.
    pub token: String,
}

impl LoginData {
    /// Read the claims of the token **without verifying its signature**.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::Protocol`](crate::ErrorKind::Protocol) if the
    /// token isn't a JWT or lacks some of the [`Claims`].
    pub fn claims(&self) -> crate::Result<Claims> {
        claims(&self.token)
    }
}

/// JWT claims of a login token.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Username the token was issued to.
    pub username: String,
    /// Bumped when the password changes, invalidating older tokens.
    #[serde(default)]
    pub pwd_ts: i64,
    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    /// Expiration date of the token.
    pub exp: DateTime<Utc>,
}

/// Decode the claims of a token without verifying it.
///
/// # Errors
///
/// Fails with [`ErrorKind::Protocol`](crate::ErrorKind::Protocol) if the
/// token isn't a JWT or lacks some of the [`Claims`].
pub fn claims(token: &str) -> crate::Result<Claims> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| {
            crate::Error::new(crate::ErrorKind::Protocol, format!("malformed token: {e}"))
                .with_source(e)
        })?;

    Ok(data.claims)
}

/// A freshly generated TOTP secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoFactorSecret {
    /// QR code as a `data:image/png;base64,...` URL.
    pub qr: String,
    /// The secret itself, to be passed back to [`AuthApi::verify_2fa`].
    pub secret: String,
}

/// A user, as seen by themselves or by an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// User id.
    pub id: u64,
    /// Username.
    pub username: String,
    /// Usually empty; the server doesn't hand out passwords.
    #[serde(default)]
    pub password: String,
    /// Root folder of the user.
    pub base_path: String,
    /// `0` for regular users, `1` for guests, `2` for admins.
    pub role: i64,
    /// Whether the account is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Permission bit set.
    pub permission: i64,
    /// SSO id, empty if unused.
    #[serde(default)]
    pub sso_id: String,
    /// Whether two-factor authentication is enabled.
    #[serde(default)]
    pub otp: bool,
}

/// Authentication endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a Client,
}

impl<'a> AuthApi<'a> {
    /// Borrow a client.
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Log in with a plaintext password. An empty `otp_code` is the same
    /// as none at all.
    ///
    /// The token is **not** stored; pass it to [`Client::set_credential`].
    ///
    /// # Errors
    ///
    /// - network errors
    /// - wrong username or password (status depends on the server)
    #[instrument(level = "trace", skip(self, password, otp_code))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        otp_code: Option<&str>,
    ) -> crate::Result<Response<LoginData>> {
        let options = RequestOptions::new().json(&LoginReq::new(username, password, otp_code))?;

        decode(self.client.post("/api/auth/login", options).await?)
    }

    /// Log in without sending the plaintext password. It is [hashed](hash_password)
    /// first.
    ///
    /// # Errors
    ///
    /// See [`AuthApi::login`].
    #[instrument(level = "trace", skip(self, password, otp_code))]
    pub async fn login_hash(
        &self,
        username: &str,
        password: &str,
        otp_code: Option<&str>,
    ) -> crate::Result<Response<LoginData>> {
        let hashed = hash_password(password);
        let options = RequestOptions::new().json(&LoginReq::new(username, &hashed, otp_code))?;

        decode(self.client.post("/api/auth/login/hash", options).await?)
    }

    /// Generate a TOTP secret for the current user.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not logged in
    pub async fn generate_2fa(&self) -> crate::Result<Response<TwoFactorSecret>> {
        decode(
            self.client
                .post("/api/auth/2fa/generate", RequestOptions::new())
                .await?,
        )
    }

    /// Enable two-factor authentication by proving possession of `secret`.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - not logged in
    /// - wrong code
    #[instrument(level = "trace", skip(self, secret))]
    pub async fn verify_2fa(&self, code: &str, secret: &str) -> crate::Result<BaseResponse> {
        #[derive(Serialize)]
        struct VerifyReq<'a> {
            code: &'a str,
            secret: &'a str,
        }

        let options = RequestOptions::new().json(&VerifyReq { code, secret })?;

        decode(self.client.post("/api/auth/2fa/verify", options).await?)
    }

    /// The user the current token belongs to. Without a token, this is
    /// the guest user.
    ///
    /// # Errors
    ///
    /// - network errors
    /// - invalid token
    pub async fn me(&self) -> crate::Result<Response<UserInfo>> {
        decode(self.client.get("/api/me", RequestOptions::new()).await?)
    }
}
