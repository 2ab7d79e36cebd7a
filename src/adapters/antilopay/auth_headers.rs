//! Authentication headers for outbound requests.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};

use crate::config::CredentialStore;
use crate::domain::CanonicalPayload;
use crate::ports::{PayloadSigner, Signature, SigningError};

/// Merchant secret identifier.
pub const SECRET_ID_HEADER: &str = "x-apay-secret-id";

/// Signature scheme version, as decimal text.
pub const SIGN_VERSION_HEADER: &str = "x-apay-sign-version";

/// Signature over the exact request body.
pub const SIGNATURE_HEADER: &str = "x-apay-sign";

/// The header set for one request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub secret_id: String,
    pub sign_version: String,
    pub signature: Signature,
}

impl AuthHeaders {
    /// Name/value pairs, independent of any HTTP library.
    pub fn pairs(&self) -> [(&'static str, &str); 3] {
        [
            (SECRET_ID_HEADER, self.secret_id.as_str()),
            (SIGN_VERSION_HEADER, self.sign_version.as_str()),
            (SIGNATURE_HEADER, self.signature.as_str()),
        ]
    }

    pub fn to_header_map(&self) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::with_capacity(3);
        for (name, value) in self.pairs() {
            let mut value = HeaderValue::from_str(value)?;
            if name == SIGNATURE_HEADER {
                value.set_sensitive(true);
            }
            headers.insert(HeaderName::from_static(name), value);
        }
        Ok(headers)
    }
}

/// Builds [`AuthHeaders`] for the body about to be sent.
#[derive(Debug, Clone)]
pub struct AuthHeaderBuilder<S> {
    store: Arc<CredentialStore>,
    signer: S,
}

impl<S: PayloadSigner> AuthHeaderBuilder<S> {
    pub fn new(store: Arc<CredentialStore>, signer: S) -> Self {
        Self { store, signer }
    }

    /// Sign `body` and assemble the headers.
    ///
    /// `body` must be the exact payload that goes on the wire. The scheme
    /// version is read at call time, so reconfiguration shows up on the next
    /// request.
    pub fn build(&self, body: &CanonicalPayload) -> Result<AuthHeaders, SigningError> {
        let signature = self.signer.sign(body)?;
        Ok(AuthHeaders {
            secret_id: self.store.credentials().secret_id().to_string(),
            sign_version: self.store.runtime().sign_version.to_string(),
            signature,
        })
    }
}
