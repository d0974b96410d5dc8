use thiserror::Error;

pub use client::{GraphHttpClient, GraphUserService};
pub use models::{GraphUser, NewGraphUser, PasswordProfile, UserQuery};

mod client;
mod models;

/// Failure talking to Microsoft Graph.
#[derive(Debug, Error)]
pub enum GraphError {
	/// Graph answered with a non-success status.
	#[error("{message}")]
	Service { status: u16, code: Option<String>, message: String },

	#[error("Failed to reach Microsoft Graph: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("Unexpected Microsoft Graph response: {0}")]
	Decode(#[from] serde_json::Error),
}

impl GraphError {
	/// HTTP status Graph responded with, if it responded at all.
	#[must_use]
	pub const fn status(&self) -> Option<u16> {
		match self {
			Self::Service { status, .. } => Some(*status),
			_ => None,
		}
	}
}
