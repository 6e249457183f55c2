//! Decoders mapping raw response payloads into [`ResourceRecord`] variants.
//!
//! Every decoder returns `Ok(None)` for an empty payload (`null`, `{}`, `[]`) or when the
//! wrapper key it looks for is absent; that is "nothing present", not malformed input.
//! Payloads of the wrong JSON kind fail with [`Error::MalformedPayload`]. Device batches
//! dispatch on `device_type` then `type`, failing with [`Error::UnknownDeviceType`] on any
//! unrecognized combination.

// self
use crate::{
	_prelude::*,
	resource::{
		Camera, CameraModel, Event, GenericData, Network, ResourceRecord, SyncModule, Video,
		id::json_kind,
	},
};

const UNKNOWN_DEVICE_TYPE: &str = "Unknown";

/// Result of a lenient device decode: recognized records plus per-element failures.
#[derive(Debug, Default)]
pub struct DevicePartition {
	/// Devices decoded successfully, in payload order.
	pub records: Vec<ResourceRecord>,
	/// Rejected elements as `(index, error)`.
	pub rejected: Vec<(usize, Error)>,
}

/// Decodes networks listed under `networks` or `network`.
///
/// A single object under either key decodes as a one-element sequence.
pub fn decode_networks(payload: &Value) -> Result<Option<Vec<Network>>> {
	decode_wrapped(payload, &["networks", "network"], "networks", Network::new)
}

/// Decodes the `devices` list, failing on the first unrecognized device.
pub fn decode_devices(payload: &Value) -> Result<Option<Vec<ResourceRecord>>> {
	let Some(elements) = wrapped_elements(payload, &["devices"], "devices")? else {
		return Ok(None);
	};

	elements.into_iter().map(decode_device).collect::<Result<Vec<_>>>().map(Some)
}

/// Decodes the `devices` list, collecting unrecognized elements instead of failing.
pub fn partition_devices(payload: &Value) -> Result<Option<DevicePartition>> {
	let Some(elements) = wrapped_elements(payload, &["devices"], "devices")? else {
		return Ok(None);
	};
	let mut partition = DevicePartition::default();

	for (index, element) in elements.iter().enumerate() {
		match decode_device(element) {
			Ok(record) => partition.records.push(record),
			Err(err) => partition.rejected.push((index, err)),
		}
	}

	Ok(Some(partition))
}

/// Classifies a single device element by its `device_type` and `type` discriminators.
pub fn decode_device(element: &Value) -> Result<ResourceRecord> {
	let fields = expect_object(element, "device")?;

	match fields.get("device_type") {
		Some(Value::String(device_type)) => match device_type.as_str() {
			"camera" => {
				let specific = fields.get("type");

				match specific.and_then(Value::as_str).and_then(CameraModel::from_type) {
					Some(model) => Ok(Camera::new(model, fields.clone()).into()),
					None => Err(Error::UnknownDeviceType {
						device_type: device_type.clone(),
						specific: specific.map(describe_discriminator),
					}),
				}
			},
			"sync_module" => Ok(SyncModule::new(fields.clone()).into()),
			_ => Err(Error::UnknownDeviceType { device_type: device_type.clone(), specific: None }),
		},
		Some(Value::Null) | None =>
			Err(Error::UnknownDeviceType { device_type: UNKNOWN_DEVICE_TYPE.into(), specific: None }),
		Some(other) =>
			Err(Error::UnknownDeviceType { device_type: other.to_string(), specific: None }),
	}
}

/// Decodes sync modules listed under `syncmodule` or `syncmodules`.
pub fn decode_sync_modules(payload: &Value) -> Result<Option<Vec<SyncModule>>> {
	decode_wrapped(payload, &["syncmodule", "syncmodules"], "sync modules", SyncModule::new)
}

/// Decodes events listed under `event`.
pub fn decode_events(payload: &Value) -> Result<Option<Vec<Event>>> {
	decode_wrapped(payload, &["event"], "events", Event::new)
}

/// Decodes a bare list of videos.
pub fn decode_videos(payload: &Value) -> Result<Option<Vec<Video>>> {
	if is_empty(payload) {
		return Ok(None);
	}

	let Value::Array(elements) = payload else {
		return Err(Error::malformed(format!(
			"videos payload must be a JSON array, got {}",
			json_kind(payload)
		)));
	};

	elements
		.iter()
		.map(|element| expect_object(element, "video").map(|fields| Video::new(fields.clone())))
		.collect::<Result<Vec<_>>>()
		.map(Some)
}

/// Decodes element 0 of the single-element list under `camera`.
pub fn decode_camera_config(payload: &Value) -> Result<Option<GenericData>> {
	let Some(elements) = wrapped_elements(payload, &["camera"], "camera config")? else {
		return Ok(None);
	};

	elements
		.first()
		.map(|element| expect_object(element, "camera config").map(|f| GenericData::new(f.clone())))
		.transpose()
}

/// Wraps an acknowledgement-style object without structural validation.
pub fn decode_generic(payload: &Value) -> Result<Option<GenericData>> {
	if is_empty(payload) {
		return Ok(None);
	}

	expect_object(payload, "generic").map(|fields| Some(GenericData::new(fields.clone())))
}

fn decode_wrapped<T>(
	payload: &Value,
	keys: &[&str],
	what: &str,
	build: impl Fn(Map<String, Value>) -> T,
) -> Result<Option<Vec<T>>> {
	let Some(elements) = wrapped_elements(payload, keys, what)? else {
		return Ok(None);
	};

	elements
		.iter()
		.map(|element| expect_object(element, what).map(|fields| build(fields.clone())))
		.collect::<Result<Vec<_>>>()
		.map(Some)
}

// Finds the first present wrapper key; a lone object is treated as a one-element list.
fn wrapped_elements<'a>(
	payload: &'a Value,
	keys: &[&str],
	what: &str,
) -> Result<Option<Vec<&'a Value>>> {
	if is_empty(payload) {
		return Ok(None);
	}

	let Value::Object(object) = payload else {
		return Err(Error::malformed(format!(
			"{what} payload must be a JSON object, got {}",
			json_kind(payload)
		)));
	};
	let Some(inner) = keys.iter().find_map(|key| object.get(*key)) else {
		return Ok(None);
	};

	match inner {
		Value::Null => Ok(None),
		Value::Array(elements) => Ok(Some(elements.iter().collect())),
		Value::Object(_) => Ok(Some(vec![inner])),
		other => Err(Error::malformed(format!(
			"{what} entry must be a JSON array or object, got {}",
			json_kind(other)
		))),
	}
}

fn expect_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
	value.as_object().ok_or_else(|| {
		Error::malformed(format!("{what} element must be a JSON object, got {}", json_kind(value)))
	})
}

fn is_empty(payload: &Value) -> bool {
	match payload {
		Value::Null => true,
		Value::Object(object) => object.is_empty(),
		Value::Array(elements) => elements.is_empty(),
		_ => false,
	}
}

fn describe_discriminator(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::resource::ResourceId;

	#[test]
	fn camera_config_takes_the_first_element() {
		let payload = serde_json::json!({ "camera": [{ "id": 4, "motion_sensitivity": 5 }] });
		let config = decode_camera_config(&payload)
			.expect("Config should decode.")
			.expect("Config should be present.");

		assert_eq!(config.identity(), Some(ResourceId::Number(4)));
		assert_eq!(config.get("motion_sensitivity"), Some(&serde_json::json!(5)));
		assert!(
			decode_camera_config(&serde_json::json!({ "camera": [] }))
				.expect("Empty config should decode.")
				.is_none()
		);
	}

	#[test]
	fn generic_requires_a_non_empty_object() {
		let ack = decode_generic(&serde_json::json!({ "id": 88, "command": "arm" }))
			.expect("Acknowledgement should decode.")
			.expect("Acknowledgement should be present.");

		assert_eq!(ack.get("command"), Some(&serde_json::json!("arm")));
		assert!(decode_generic(&serde_json::json!({})).expect("Empty should decode.").is_none());
		assert!(matches!(
			decode_generic(&serde_json::json!("ok")),
			Err(Error::MalformedPayload { .. })
		));
	}

	#[test]
	fn wrong_kinds_are_malformed() {
		assert!(matches!(
			decode_networks(&serde_json::json!([{ "id": 1 }])),
			Err(Error::MalformedPayload { .. })
		));
		assert!(matches!(
			decode_events(&serde_json::json!({ "event": 3 })),
			Err(Error::MalformedPayload { .. })
		));
		assert!(matches!(
			decode_videos(&serde_json::json!({ "videos": [] })),
			Err(Error::MalformedPayload { .. })
		));
	}

	#[test]
	fn non_string_discriminators_are_reported() {
		let err = decode_device(&serde_json::json!({ "device_type": "camera", "type": 2 }))
			.expect_err("Numeric camera type should be rejected.");

		assert!(matches!(
			err,
			Error::UnknownDeviceType { device_type, specific: Some(specific) }
				if device_type == "camera" && specific == "2"
		));

		let err = decode_device(&serde_json::json!({ "device_type": null }))
			.expect_err("Null device type should be rejected.");

		assert!(matches!(
			err,
			Error::UnknownDeviceType { device_type, specific: None } if device_type == "Unknown"
		));
	}

	#[test]
	fn sync_modules_accept_both_keys() {
		let singular = serde_json::json!({ "syncmodule": { "id": 5, "status": "online" } });
		let plural = serde_json::json!({ "syncmodules": [{ "id": 5 }, { "id": 6 }] });

		let modules = decode_sync_modules(&singular)
			.expect("Singular key should decode.")
			.expect("Modules should be present.");

		assert_eq!(modules.len(), 1);
		assert_eq!(modules[0].status(), Some("online"));
		assert_eq!(
			decode_sync_modules(&plural).expect("Plural key should decode.").map(|m| m.len()),
			Some(2)
		);
	}
}
