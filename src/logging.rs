use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

///
/// # Init
/// Installs the global subscriber: `RUST_LOG` when set and valid, else
/// `default_directives`. Events go to stderr so a binary's stdout stays its
/// own. A second call is a no-op.
///
pub fn init(default_directives: &str) {
	let filter = env_filter(std::env::var("RUST_LOG").ok().as_deref(), default_directives);
	let _ = tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)).try_init();
}

fn env_filter(env: Option<&str>, default_directives: &str) -> EnvFilter {
	env.and_then(|directives| EnvFilter::try_new(directives).ok()).unwrap_or_else(|| EnvFilter::new(default_directives))
}
