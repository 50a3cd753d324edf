//! TLS configuration for the transport.
//!
//! Native root certificates are loaded from the OS store once per process;
//! the lookup can be slow and every proxied transport built by
//! [`ParameterSet::proxy`](crate::ParameterSet::proxy) needs them again.

use crate::config::TlsRootConfig;
use crate::error::HttpError;
use rustls_pki_types::CertificateDer;
use std::sync::{Arc, OnceLock};

/// Cached native root certificates. Empty means none were found (warned, not errored).
static NATIVE_ROOTS_CACHE: OnceLock<Vec<CertificateDer<'static>>> = OnceLock::new();

#[cfg(test)]
static LOAD_COUNT: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

fn load_native_certs() -> Vec<CertificateDer<'static>> {
    #[cfg(test)]
    LOAD_COUNT.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

    let result = rustls_native_certs::load_native_certs();
    for err in &result.errors {
        tracing::warn!(error = %err, "error loading native root certificate");
    }

    if result.certs.is_empty() {
        tracing::warn!("no native root CA certificates found");
    } else {
        tracing::debug!(count = result.certs.len(), "loaded native root certificates");
    }

    result.certs
}

/// Cached native root certificates, loaded on first use.
#[must_use]
pub fn native_root_certs() -> &'static [CertificateDer<'static>] {
    NATIVE_ROOTS_CACHE.get_or_init(load_native_certs).as_slice()
}

/// Crypto provider for TLS connections.
///
/// Uses the process default if one is installed, otherwise an aws-lc-rs
/// provider that is not installed globally.
#[must_use]
pub fn crypto_provider() -> Arc<rustls::crypto::CryptoProvider> {
    rustls::crypto::CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

fn root_store(roots: TlsRootConfig) -> Result<rustls::RootCertStore, HttpError> {
    match roots {
        TlsRootConfig::WebPki => Ok(rustls::RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        }),
        TlsRootConfig::Native => {
            let certs = native_root_certs();
            if certs.is_empty() {
                return Err(HttpError::Tls(
                    "no native root CA certificates found in OS certificate store".into(),
                ));
            }

            let mut store = rustls::RootCertStore::empty();
            let (added, ignored) = store.add_parsable_certificates(certs.iter().cloned());
            if ignored > 0 {
                tracing::warn!(added, ignored, "some native root certificates could not be parsed");
            }
            if added == 0 {
                return Err(HttpError::Tls(
                    format!(
                        "no valid native root CA certificates parsed (found {}, all failed to parse)",
                        certs.len()
                    )
                    .into(),
                ));
            }
            Ok(store)
        }
    }
}

/// Build a rustls `ClientConfig` trusting the configured roots.
///
/// # Errors
///
/// Returns `HttpError::Tls` if native roots are requested and none are usable,
/// or if the crypto provider rejects the default protocol versions.
pub fn client_config(roots: TlsRootConfig) -> Result<rustls::ClientConfig, HttpError> {
    let store = root_store(roots)?;
    let config = rustls::ClientConfig::builder_with_provider(crypto_provider())
        .with_safe_default_protocol_versions()
        .map_err(|e| HttpError::Tls(Box::new(e)))?
        .with_root_certificates(store)
        .with_no_client_auth();
    Ok(config)
}
