use anyhow::Result;
use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;

#[derive(Default, Debug)]
pub struct Builder {
	filter: Option<EnvFilter>,
}

pub fn builder() -> Builder {
	Builder::default()
}

impl Builder {
	/// Set the log level on the builder
	pub fn with_log_level(self, log_level: &str) -> Result<Self> {
		// RUST_LOG takes precedence over the command line
		let input = std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_owned());
		Ok(self.with_filter(filter_from_value(&input)?))
	}

	/// Set the filter on the builder
	pub fn with_filter(mut self, filter: EnvFilter) -> Self {
		self.filter = Some(filter);
		self
	}

	/// Build a tracing dispatcher with a compact fmt subscriber on stderr
	pub fn build(self) -> Box<dyn Subscriber + Send + Sync + 'static> {
		let registry = tracing_subscriber::registry();
		let registry = registry.with(self.filter.map(|filter| {
			tracing_subscriber::fmt::layer()
				.compact()
				.with_ansi(true)
				.with_target(true)
				.with_span_events(FmtSpan::NONE)
				.with_writer(std::io::stderr)
				.with_filter(filter)
				.boxed()
		}));
		Box::new(registry)
	}

	/// Install the subscriber for the rest of the process
	pub fn init(self) -> Result<()> {
		self.build().try_init()?;
		Ok(())
	}
}

/// Create an EnvFilter from the given value. If the value is not a valid log level, it will be
/// treated as EnvFilter directives.
pub fn filter_from_value(v: &str) -> Result<EnvFilter, ParseError> {
	match v {
		// Don't show any logs at all
		"none" => Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into())),
		// Otherwise, let's show everything including dependencies
		"full" => Ok(EnvFilter::default().add_directive(LevelFilter::TRACE.into())),
		// Otherwise, let's only show errors from dependencies
		"error" | "warn" | "info" | "debug" | "trace" => {
			EnvFilter::builder().parse(format!("error,starguard={v},starguard_core={v}"))
		}
		// Let's try to parse the custom directives
		_ => EnvFilter::builder().parse(v),
	}
}
