//! HashiCorp Vault client for seal management and KV v2 secrets.
//!
//! A thin token-authenticated client: each operation is one HTTP round-trip
//! whose JSON body is returned as an untyped object or mapped to a
//! [`VaultError`].
//!
//! ```no_run
//! use serde_json::{Map, json};
//! use vault_kv_client::VaultClient;
//!
//! # async fn run() -> vault_kv_client::VaultResult<()> {
//! let client = VaultClient::new("s.token", "https://vault.local:8200")?;
//! if !client.is_sealed().await? {
//!     let mut data = Map::new();
//!     data.insert("password".into(), json!("hunter2"));
//!     client.set_secret("app/db", &data).await?;
//!     let secret = client.get_secret("app/db").await?;
//!     println!("{}", secret["data"]["data"]["password"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod response;

pub use client::VaultClient;
pub use config::VaultConfig;
pub use error::{VaultError, VaultResult};
pub use response::{DeleteOutcome, ResponseEnvelope, SecretPayload};
