use rocket::serde::json::{self, Json};
use rocket::{post, routes, Route, State};
use tracing::{error, info};

use crate::dto::{CreateUserDto, CreateUserResponseDto, GetUserByIdDto, GetUserByPrincipalNameDto, GetUserResponseDto};
use crate::error::{ApiError, CreateUserError};
use crate::graph::{GraphError, NewGraphUser, UserQuery};
use crate::state::Services;
use crate::user_types::GraphAccess;

/// Routes mounted under `/api/users`.
#[must_use]
pub fn routes() -> Vec<Route> {
	routes![get_user_by_id, get_user_by_principal_name, create_user]
}

#[post("/GetUserById", data = "<dto>")]
pub async fn get_user_by_id(access: GraphAccess, services: &State<Services>, dto: Json<GetUserByIdDto>) -> Result<Json<GetUserResponseDto>, ApiError> {
	find_single_user(services, &access, &UserQuery::by_id(&dto.user_id)).await
}

#[post("/GetUserByPrincipalName", data = "<dto>")]
pub async fn get_user_by_principal_name(access: GraphAccess, services: &State<Services>, dto: Json<GetUserByPrincipalNameDto>) -> Result<Json<GetUserResponseDto>, ApiError> {
	find_single_user(services, &access, &UserQuery::by_principal_name(&dto.user_principal_name)).await
}

/// The first user matching `query`; no match is an error.
async fn find_single_user(services: &Services, access: &GraphAccess, query: &UserQuery) -> Result<Json<GetUserResponseDto>, ApiError> {
	let users = match services.graph.list_users(&access.access_token, query).await {
		Ok(users) => users,
		Err(e @ GraphError::Service { .. }) => {
			error!(filter = %query.filter, "Graph API error: {e}");
			return Err(ApiError::Graph(e.to_string()));
		}
		Err(e) => {
			error!(filter = %query.filter, "user lookup failed: {e}");
			return Err(ApiError::TravelBook(e.to_string()));
		}
	};

	match users.into_iter().next() {
		Some(user) => Ok(Json(GetUserResponseDto::found(user))),
		None => Err(ApiError::TravelBook("Graph API error".to_string())),
	}
}

#[post("/CreateUser", data = "<dto>")]
pub async fn create_user(access: GraphAccess, services: &State<Services>, dto: Result<Json<CreateUserDto>, json::Error<'_>>) -> Result<Json<CreateUserResponseDto>, CreateUserError> {
	let Ok(Json(dto)) = dto else {
		return Err(CreateUserError::MissingFields);
	};
	if dto.display_name.trim().is_empty() || dto.mail_nick_name.trim().is_empty() {
		return Err(CreateUserError::MissingFields);
	}

	let new_user = NewGraphUser::new(&dto.display_name, &dto.mail_nick_name, &services.config.azure_ad.domain);

	match services.graph.create_user(&access.access_token, &new_user).await {
		Ok(Some(created)) => {
			info!(display_name = created.display_name.as_deref().unwrap_or_default(), by = %access.user.session.account_id, "User created");
			Ok(Json(CreateUserResponseDto::created(created)))
		}
		Ok(None) => Err(CreateUserError::RegistrationFailed),
		Err(GraphError::Service { status, message, .. }) => {
			error!(status, "Graph API error: {message}");
			Err(CreateUserError::Graph { status, message })
		}
		Err(e) => {
			error!("Error: {e}");
			Err(CreateUserError::Unexpected(e.to_string()))
		}
	}
}
