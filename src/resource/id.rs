//! Resource identifiers and the identity-resolution helper.

// self
use crate::_prelude::*;

/// Identifier of a remote resource; the API uses integers for most and strings for a few.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
	/// Integer identifier.
	Number(i64),
	/// String identifier.
	Text(String),
}
impl ResourceId {
	/// Reads an identifier from a JSON scalar; other kinds yield `None`.
	pub fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Number(number) => number.as_i64().map(Self::Number),
			Value::String(text) if !text.is_empty() => Some(Self::Text(text.clone())),
			_ => None,
		}
	}

	/// Returns the integer form, if any.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Number(number) => Some(*number),
			Self::Text(text) => text.parse().ok(),
		}
	}
}
impl Debug for ResourceId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ResourceId({self})")
	}
}
impl Display for ResourceId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Number(number) => write!(f, "{number}"),
			Self::Text(text) => f.write_str(text),
		}
	}
}
impl From<i64> for ResourceId {
	fn from(value: i64) -> Self {
		Self::Number(value)
	}
}
impl From<i32> for ResourceId {
	fn from(value: i32) -> Self {
		Self::Number(value.into())
	}
}
impl From<u32> for ResourceId {
	fn from(value: u32) -> Self {
		Self::Number(value.into())
	}
}
impl From<String> for ResourceId {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}
impl From<&str> for ResourceId {
	fn from(value: &str) -> Self {
		Self::Text(value.to_owned())
	}
}

/// Values accepted wherever an endpoint needs a resource identifier.
///
/// Raw identifiers resolve to themselves and decoded records resolve through their
/// `identity()`, so call sites can pass either interchangeably.
pub trait AsResourceId {
	/// Resolves the identifier or explains why none is available.
	fn resource_id(&self) -> Result<ResourceId>;
}
impl<T> AsResourceId for &T
where
	T: ?Sized + AsResourceId,
{
	fn resource_id(&self) -> Result<ResourceId> {
		(**self).resource_id()
	}
}
impl AsResourceId for ResourceId {
	fn resource_id(&self) -> Result<ResourceId> {
		Ok(self.clone())
	}
}
impl AsResourceId for i64 {
	fn resource_id(&self) -> Result<ResourceId> {
		Ok(ResourceId::Number(*self))
	}
}
impl AsResourceId for i32 {
	fn resource_id(&self) -> Result<ResourceId> {
		Ok((*self).into())
	}
}
impl AsResourceId for u32 {
	fn resource_id(&self) -> Result<ResourceId> {
		Ok((*self).into())
	}
}
impl AsResourceId for u64 {
	fn resource_id(&self) -> Result<ResourceId> {
		i64::try_from(*self).map(ResourceId::Number).map_err(|_| Error::InvalidIdentifier {
			reason: format!("{self} does not fit a signed 64-bit identifier"),
		})
	}
}
impl AsResourceId for str {
	fn resource_id(&self) -> Result<ResourceId> {
		if self.is_empty() {
			return Err(Error::InvalidIdentifier { reason: "identifier string is empty".into() });
		}

		Ok(self.into())
	}
}
impl AsResourceId for String {
	fn resource_id(&self) -> Result<ResourceId> {
		self.as_str().resource_id()
	}
}
impl AsResourceId for Value {
	fn resource_id(&self) -> Result<ResourceId> {
		match self {
			Value::String(text) => text.resource_id(),
			other => ResourceId::from_value(other).ok_or_else(|| Error::InvalidIdentifier {
				reason: format!("a JSON {} is not an identifier", json_kind(other)),
			}),
		}
	}
}

/// Resolves a raw identifier or a decoded record into a [`ResourceId`].
pub fn resolve_id<T>(value: &T) -> Result<ResourceId>
where
	T: ?Sized + AsResourceId,
{
	value.resource_id()
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(number) if number.is_f64() => "fractional number",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn primitives_resolve_to_themselves() {
		assert_eq!(resolve_id(&7_i64).expect("Integer should resolve."), ResourceId::Number(7));
		assert_eq!(resolve_id("abc").expect("String should resolve."), ResourceId::from("abc"));
		assert_eq!(
			resolve_id(&serde_json::json!(12)).expect("JSON number should resolve."),
			ResourceId::Number(12)
		);
		assert_eq!(ResourceId::from("42").as_i64(), Some(42));
		assert_eq!(ResourceId::Number(5).to_string(), "5");
	}

	#[test]
	fn non_identifiers_are_rejected() {
		for value in [
			serde_json::json!(true),
			Value::Null,
			serde_json::json!([1]),
			serde_json::json!({ "id": 1 }),
			serde_json::json!(1.5),
			serde_json::json!(""),
		] {
			assert!(
				matches!(resolve_id(&value), Err(Error::InvalidIdentifier { .. })),
				"{value} should be rejected"
			);
		}

		assert!(resolve_id(&u64::MAX).is_err());
		assert!(resolve_id("").is_err());
	}

	#[test]
	fn untagged_serde_keeps_the_wire_shape() {
		let ids: Vec<ResourceId> =
			serde_json::from_str(r#"[3, "abc"]"#).expect("Identifiers should deserialize.");

		assert_eq!(ids, [ResourceId::Number(3), ResourceId::from("abc")]);
		assert_eq!(
			serde_json::to_string(&ids).expect("Identifiers should serialize."),
			r#"[3,"abc"]"#
		);
	}
}
