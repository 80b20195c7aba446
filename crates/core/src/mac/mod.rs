/// A macro that allows lazily parsing a value from the environment variable,
/// with a fallback default value if the variable is not set or parsing fails.
///
/// # Parameters
///
/// - `$key`: An expression representing the name of the environment variable.
/// - `$t`: The type of the value to be parsed.
/// - `$default`: The default value to fall back to if the environment variable is not set or
///   parsing fails.
///
/// # Return Value
///
/// A lazy static variable of type `std::sync::LazyLock`, which holds the parsed
/// value from the environment variable or the default value.
macro_rules! lazy_env_parse {
	// With a static expression for the default value
	($key:expr, $t:ty, $default:expr) => {
		std::sync::LazyLock::new(|| {
			std::env::var($key).ok().and_then(|s| s.parse::<$t>().ok()).unwrap_or($default)
		})
	};
}

/// Implements `as_str`, `Display` and `FromStr` for a closed, field-less
/// action enum, mapping each variant to its upper-case privilege name.
macro_rules! impl_action_names {
	($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
		impl $name {
			/// All variants, in declaration order
			pub const ALL: &'static [$name] = &[$($name::$variant),+];

			/// The privilege name as it appears in grants and denials
			pub fn as_str(&self) -> &'static str {
				match self {
					$($name::$variant => $text,)+
				}
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl std::str::FromStr for $name {
			type Err = $crate::err::Error;
			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s.to_ascii_uppercase().as_str() {
					$($text => Ok($name::$variant),)+
					_ => Err($crate::err::Error::InvalidAction {
						kind: stringify!($name),
						name: s.to_string(),
					}),
				}
			}
		}
	};
}
