use tracing::info;

use super::{ApiTransport, UsersService};
use crate::dto::CreateUserDto;

/// A failed validation rule on one field of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
	pub field: &'static str,
	pub message: &'static str,
}

///
/// # Create User Form Model
/// What the user types in the create-user form.
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateUserFormModel {
	pub display_name: String,
	pub mail_nick_name: String,
	pub user_principal_name: String,
}

impl CreateUserFormModel {
	///
	/// # Validate
	/// At most one error per field: a blank field only reports that it is
	/// required.
	///
	#[must_use]
	pub fn validate(&self) -> Vec<FieldError> {
		let mut errors = Vec::new();

		if self.display_name.trim().is_empty() {
			errors.push(FieldError { field: "DisplayName", message: "Le nom complet est obligatoire." });
		}

		if self.mail_nick_name.trim().is_empty() {
			errors.push(FieldError { field: "MailNickName", message: "Le surnom (MailNickname) est obligatoire." });
		} else if !self.mail_nick_name.chars().all(|c| c.is_ascii_alphanumeric()) {
			errors.push(FieldError { field: "MailNickName", message: "Le MailNickname ne doit contenir que des lettres et chiffres." });
		}

		if self.user_principal_name.trim().is_empty() {
			errors.push(FieldError { field: "UserPrincipalName", message: "UserPrincipalName est obligatoire." });
		} else if !is_email_address(&self.user_principal_name) {
			errors.push(FieldError { field: "UserPrincipalName", message: "UserPrincipalName doit être un email valide." });
		}

		errors
	}

	fn to_dto(&self) -> CreateUserDto {
		CreateUserDto {
			user_principal_name: self.user_principal_name.clone(),
			display_name: self.display_name.clone(),
			mail_nick_name: self.mail_nick_name.clone(),
		}
	}
}

/// A single `@` that is neither the first nor the last character.
fn is_email_address(value: &str) -> bool {
	let mut parts = value.split('@');
	matches!((parts.next(), parts.next(), parts.next()), (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty())
}

///
/// # Create User Form
/// Form state plus its submit handler.
///
pub struct CreateUserForm<T> {
	service: UsersService<T>,
	pub model: CreateUserFormModel,
	pub result_message: String,
}

impl<T: ApiTransport> CreateUserForm<T> {
	pub fn new(service: UsersService<T>) -> Self {
		Self { service, model: CreateUserFormModel::default(), result_message: String::new() }
	}

	///
	/// # Submit
	/// Validates the model and, when valid, creates the user. The outcome is
	/// left in `result_message`; on success the model is reset.
	///
	/// # Errors
	/// The validation errors, in which case nothing is sent.
	///
	pub async fn submit(&mut self) -> Result<(), Vec<FieldError>> {
		let errors = self.model.validate();
		if !errors.is_empty() {
			return Err(errors);
		}

		match self.service.create_user(&self.model.to_dto()).await {
			Ok(created) => {
				let created = created.unwrap_or_default();
				self.result_message =
					format!("User created: {} ({})", created.user_display_name.unwrap_or_default(), created.user_principal_name.unwrap_or_default());
				info!("{}", self.result_message);
				self.model = CreateUserFormModel::default();
			}
			Err(e) => self.result_message = format!("Error : {e}"),
		}
		Ok(())
	}
}
