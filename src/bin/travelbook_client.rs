use std::error::Error;

use clap::{Parser, Subcommand};
use travelbook::client::{CreateUserForm, CreateUserFormModel, HttpApiTransport, UsersService};
use travelbook::dto::{GetUserByIdDto, GetUserByPrincipalNameDto, GetUserResponseDto};

#[derive(Parser)]
#[command(name = "travelbook-client")]
#[command(about = "Look up or create Entra ID users through the TravelBook API", long_about = None)]
struct Cli {
	#[arg(short, long, env = "TRAVELBOOK_URL", default_value = "https://localhost:8000/")]
	base_url: String,

	/// Value of the session cookie of a signed-in user.
	#[arg(short, long, env = "TRAVELBOOK_SESSION")]
	session_cookie: Option<String>,

	#[arg(long, default_value = ".TravelBook.Auth")]
	cookie_name: String,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Look a user up by object id
	GetById { user_id: String },
	/// Look a user up by user principal name
	GetByPrincipalName { user_principal_name: String },
	/// Create a user
	Create {
		#[arg(long)]
		display_name: String,
		#[arg(long)]
		mail_nick_name: String,
		#[arg(long)]
		user_principal_name: String,
	},
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();
	travelbook::logging::init("travelbook=warn");
	let transport = HttpApiTransport::new(&cli.base_url, cli.session_cookie.as_deref().map(|value| (cli.cookie_name.as_str(), value)))?;
	let service = UsersService::new(transport);

	match cli.command {
		Commands::GetById { user_id } => print_user(service.get_user_by_id(&GetUserByIdDto { user_id }).await)?,
		Commands::GetByPrincipalName { user_principal_name } => {
			print_user(service.get_user_by_principal(&GetUserByPrincipalNameDto { user_principal_name }).await)?;
		}
		Commands::Create { display_name, mail_nick_name, user_principal_name } => {
			let mut form = CreateUserForm::new(service);
			form.model = CreateUserFormModel { display_name, mail_nick_name, user_principal_name };

			if let Err(errors) = form.submit().await {
				for error in errors {
					eprintln!("{}: {}", error.field, error.message);
				}
				std::process::exit(2);
			}
			println!("{}", form.result_message);
		}
	}

	Ok(())
}

fn print_user(response: Option<GetUserResponseDto>) -> Result<(), Box<dyn Error>> {
	match response {
		Some(response) => println!("{}", serde_json::to_string_pretty(&response)?),
		None => println!("null"),
	}
	Ok(())
}
