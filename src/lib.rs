//! Terraform provider for JumpCloud
//!
//! Exposes JumpCloud applications and systems as data sources and
//! user/system associations as a managed resource.
//!
//! # Example
//!
//! ```ignore
//! use terraform_provider_jumpcloud::{config::Config, provider::Provider};
//!
//! async fn example() {
//!     let provider = Provider::new(Config::load().with_env(|k| std::env::var(k).ok()));
//!     let response = provider
//!         .read_data_source("jumpcloud_application", serde_json::json!({"name": "aws"}))
//!         .await;
//!     println!("{}", response.id);
//! }
//! ```

pub mod config;
pub mod jumpcloud;
pub mod provider;
