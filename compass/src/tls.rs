//! TLS setup for the enrichment service
//!
//! Builds a rustls server configuration from PEM files. TLS 1.3 only.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use thiserror::Error;

/// TLS error types
#[derive(Debug, Error)]
pub enum TlsError {
    /// Certificate error
    #[error("certificate error: {0}")]
    Certificate(String),

    /// Private key error
    #[error("private key error: {0}")]
    PrivateKey(String),

    /// Configuration error
    #[error("TLS configuration error: {0}")]
    Config(String),
}

/// Build a TLS 1.3 server configuration from certificate and key paths.
pub fn server_config(cert_path: &str, key_path: &str) -> Result<RustlsConfig, TlsError> {
    let certs = load_certs(cert_path)?;
    let key = load_key(key_path)?;

    let config = ServerConfig::builder_with_protocol_versions(&[&rustls::version::TLS13])
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|e| TlsError::Config(format!("failed to build server config: {}", e)))?;

    Ok(RustlsConfig::from_config(Arc::new(config)))
}

/// Load certificates from a PEM file
fn load_certs(path: &str) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let file = File::open(Path::new(path))
        .map_err(|e| TlsError::Certificate(format!("failed to open {}: {}", path, e)))?;
    let mut reader = BufReader::new(file);

    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut reader)
        .filter_map(|result| result.ok())
        .collect();

    if certs.is_empty() {
        return Err(TlsError::Certificate(format!(
            "no certificates found in {}",
            path
        )));
    }

    Ok(certs)
}

/// Load a private key from a PEM file
fn load_key(path: &str) -> Result<PrivateKeyDer<'static>, TlsError> {
    let file = File::open(Path::new(path))
        .map_err(|e| TlsError::PrivateKey(format!("failed to open {}: {}", path, e)))?;
    let mut reader = BufReader::new(file);

    loop {
        match rustls_pemfile::read_one(&mut reader) {
            Ok(Some(rustls_pemfile::Item::Pkcs1Key(key))) => {
                return Ok(PrivateKeyDer::Pkcs1(key));
            }
            Ok(Some(rustls_pemfile::Item::Pkcs8Key(key))) => {
                return Ok(PrivateKeyDer::Pkcs8(key));
            }
            Ok(Some(rustls_pemfile::Item::Sec1Key(key))) => {
                return Ok(PrivateKeyDer::Sec1(key));
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => {
                return Err(TlsError::PrivateKey(format!(
                    "failed to parse key from {}: {}",
                    path, e
                )));
            }
        }
    }

    Err(TlsError::PrivateKey(format!(
        "no private key found in {}",
        path
    )))
}
