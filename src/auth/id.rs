//! Strongly typed identifiers for users and rate-limited clients.

// std
use std::{borrow::Borrow, net::IpAddr, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;
const UNKNOWN_CLIENT: &str = "unknown";

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (username, client).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (username, client).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed length.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (username, client).
		kind: &'static str,
		/// Maximum permitted length.
		max: usize,
	},
}

def_id! { Username, "Login name of a registered user and `sub` of its tokens.", "Username" }
def_id! { ClientKey, "Identity a rate limiter counts requests against.", "Client" }

impl ClientKey {
	/// Shared key for requests whose peer address is unavailable.
	pub fn unknown() -> Self {
		Self(UNKNOWN_CLIENT.to_owned())
	}
}
impl From<IpAddr> for ClientKey {
	fn from(ip: IpAddr) -> Self {
		// Rendered IP addresses are short and never contain whitespace.
		Self(ip.to_string())
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// std
	use std::net::{Ipv4Addr, Ipv6Addr};
	// self
	use super::*;

	#[test]
	fn usernames_reject_whitespace_and_empty() {
		assert!(Username::new(" alice").is_err(), "Leading whitespace must be rejected.");
		assert!(Username::new("alice ").is_err(), "Trailing whitespace must be rejected.");
		assert!(Username::new("").is_err());

		let user = Username::new("alice").expect("Username fixture should be valid.");

		assert_eq!(user.as_ref(), "alice");
		assert_eq!(format!("{user:?}"), "Username(alice)");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let user: Username =
			serde_json::from_str("\"isfar\"").expect("Username should deserialize successfully.");

		assert_eq!(user.as_ref(), "isfar");
		assert!(serde_json::from_str::<Username>("\"with space\"").is_err());
	}

	#[test]
	fn length_limit_is_inclusive() {
		Username::new("a".repeat(IDENTIFIER_MAX_LEN)).expect("Exact length should succeed.");

		assert_eq!(
			Username::new("a".repeat(IDENTIFIER_MAX_LEN + 1)),
			Err(IdentifierError::TooLong { kind: "Username", max: IDENTIFIER_MAX_LEN })
		);
	}

	#[test]
	fn client_keys_render_ip_addresses() {
		let v4 = ClientKey::from(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
		let v6 = ClientKey::from(IpAddr::V6(Ipv6Addr::LOCALHOST));

		assert_eq!(v4.as_ref(), "127.0.0.1");
		assert_eq!(v6.as_ref(), "::1");
		assert_eq!(ClientKey::unknown().as_ref(), "unknown");
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<Username, u8> = HashMap::from_iter([(
			Username::new("alice").expect("Username used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("alice"), Some(&7));
	}
}
