//! Async client for the Blink home-security REST API with silent token renewal and
//! client-side rate limiting.
//!
//! The core is [`client::RestClient`]: every authenticated call passes the
//! [`limit::RateLimiter`], borrows a fresh session from [`auth::TokenManager`], resolves the
//! account region into a base URL through [`endpoints::Endpoints`], and hands the JSON body
//! to the caller, who feeds it into the matching [`resource`] decoder.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod limit;
pub mod obs;
pub mod resource;

pub use auth::{Credentials, TokenManager};
pub use client::RestClient;
pub use config::ClientConfig;
pub use error::{Error, Result};

mod _prelude {
	pub use std::{
		collections::{BTreeMap, VecDeque},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
