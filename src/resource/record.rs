//! Typed resource variants over open JSON payloads.
//!
//! Each variant keeps the full field map it was decoded from and adds typed accessors for
//! the fields callers commonly need. Records are value snapshots with no link back to the
//! server.

// self
use crate::{
	_prelude::*,
	resource::{AsResourceId, ResourceId},
};

macro_rules! resource_record {
	($(#[$meta:meta])* $name:ident, $kind:expr, [$($key:literal),+ $(,)?]) => {
		$(#[$meta])*
		#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name {
			fields: Map<String, Value>,
		}
		impl $name {
			/// Keys consulted by `identity()`, most specific first.
			pub const IDENTITY_KEYS: &'static [&'static str] = &[$($key),+];

			/// Wraps a decoded field map.
			pub fn new(fields: Map<String, Value>) -> Self {
				Self { fields }
			}

			/// Identifier from the first identity key carrying a scalar id.
			pub fn identity(&self) -> Option<ResourceId> {
				identity_of(&self.fields, Self::IDENTITY_KEYS)
			}

			/// Raw field lookup.
			pub fn get(&self, key: &str) -> Option<&Value> {
				self.fields.get(key)
			}

			/// Every field as received.
			pub fn fields(&self) -> &Map<String, Value> {
				&self.fields
			}

			/// Consumes the record, returning its field map.
			pub fn into_fields(self) -> Map<String, Value> {
				self.fields
			}
		}
		impl AsResourceId for $name {
			fn resource_id(&self) -> Result<ResourceId> {
				require_identity(self.identity(), $kind)
			}
		}
	};
}

/// Discriminates the variants of [`ResourceRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
	/// Account network (a site with its own arm state).
	Network,
	/// Camera device.
	Camera,
	/// Sync module bridging cameras to the cloud.
	SyncModule,
	/// Motion or system event.
	Event,
	/// Recorded clip.
	Video,
	/// Untyped acknowledgement or configuration payload.
	GenericData,
}
impl ResourceKind {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResourceKind::Network => "network",
			ResourceKind::Camera => "camera",
			ResourceKind::SyncModule => "sync_module",
			ResourceKind::Event => "event",
			ResourceKind::Video => "video",
			ResourceKind::GenericData => "generic_data",
		}
	}
}
impl Display for ResourceKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Camera hardware generation, read from the `type` discriminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraModel {
	/// Outdoor XT camera (`"xt"`).
	Xt,
	/// Indoor camera (`"white"`).
	White,
}
impl CameraModel {
	/// Maps the wire discriminator to a model.
	pub fn from_type(value: &str) -> Option<Self> {
		match value {
			"xt" => Some(CameraModel::Xt),
			"white" => Some(CameraModel::White),
			_ => None,
		}
	}

	/// Returns the wire discriminator.
	pub const fn as_str(self) -> &'static str {
		match self {
			CameraModel::Xt => "xt",
			CameraModel::White => "white",
		}
	}
}

resource_record!(
	/// Account network.
	Network,
	ResourceKind::Network,
	["network_id", "id"]
);
impl Network {
	/// Display name.
	pub fn name(&self) -> Option<&str> {
		str_field(&self.fields, "name")
	}

	/// Whether the network is armed.
	pub fn armed(&self) -> Option<bool> {
		bool_field(&self.fields, "armed")
	}

	/// Owning account.
	pub fn account_id(&self) -> Option<i64> {
		i64_field(&self.fields, "account_id")
	}

	/// IANA time zone configured for the network.
	pub fn time_zone(&self) -> Option<&str> {
		str_field(&self.fields, "time_zone")
	}
}

/// Camera device of a known model.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Camera {
	#[serde(skip)]
	model: CameraModel,
	#[serde(flatten)]
	fields: Map<String, Value>,
}
impl Camera {
	/// Keys consulted by `identity()`, most specific first.
	pub const IDENTITY_KEYS: &'static [&'static str] = &["camera_id", "device_id", "id"];

	/// Wraps a decoded field map for a camera of `model`.
	pub fn new(model: CameraModel, fields: Map<String, Value>) -> Self {
		Self { model, fields }
	}

	/// Hardware generation.
	pub fn model(&self) -> CameraModel {
		self.model
	}

	/// Identifier from the first identity key carrying a scalar id.
	pub fn identity(&self) -> Option<ResourceId> {
		identity_of(&self.fields, Self::IDENTITY_KEYS)
	}

	/// Raw field lookup.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.fields.get(key)
	}

	/// Every field as received.
	pub fn fields(&self) -> &Map<String, Value> {
		&self.fields
	}

	/// Consumes the record, returning its field map.
	pub fn into_fields(self) -> Map<String, Value> {
		self.fields
	}

	/// Display name.
	pub fn name(&self) -> Option<&str> {
		str_field(&self.fields, "name")
	}

	/// Network the camera belongs to.
	pub fn network_id(&self) -> Option<i64> {
		i64_field(&self.fields, "network_id")
	}

	/// Whether motion detection is armed.
	pub fn armed(&self) -> Option<bool> {
		bool_field(&self.fields, "armed")
	}

	/// Whether the camera is enabled.
	pub fn enabled(&self) -> Option<bool> {
		bool_field(&self.fields, "enabled")
	}

	/// Activity state reported under `active`.
	pub fn state(&self) -> Option<&str> {
		str_field(&self.fields, "active")
	}

	/// Battery level as reported (`battery`).
	pub fn battery(&self) -> Option<i64> {
		i64_field(&self.fields, "battery")
	}

	/// Battery state label (`battery_state`).
	pub fn battery_state(&self) -> Option<&str> {
		str_field(&self.fields, "battery_state")
	}

	/// Temperature reading (`temp`).
	pub fn temperature(&self) -> Option<i64> {
		i64_field(&self.fields, "temp")
	}
}
impl AsResourceId for Camera {
	fn resource_id(&self) -> Result<ResourceId> {
		require_identity(self.identity(), ResourceKind::Camera)
	}
}

resource_record!(
	/// Sync module bridging cameras to the cloud.
	SyncModule,
	ResourceKind::SyncModule,
	["sync_module_id", "device_id", "id"]
);
impl SyncModule {
	/// Display name.
	pub fn name(&self) -> Option<&str> {
		str_field(&self.fields, "name")
	}

	/// Connectivity status (e.g. `online`).
	pub fn status(&self) -> Option<&str> {
		str_field(&self.fields, "status")
	}

	/// Network the module serves.
	pub fn network_id(&self) -> Option<i64> {
		i64_field(&self.fields, "network_id")
	}

	/// Hardware serial number.
	pub fn serial(&self) -> Option<&str> {
		str_field(&self.fields, "serial")
	}

	/// Firmware version (`fw_version`).
	pub fn firmware(&self) -> Option<&str> {
		str_field(&self.fields, "fw_version")
	}

	/// Wi-Fi signal strength.
	pub fn wifi_strength(&self) -> Option<i64> {
		i64_field(&self.fields, "wifi_strength")
	}
}

resource_record!(
	/// Motion or system event.
	Event,
	ResourceKind::Event,
	["event_id", "id"]
);
impl Event {
	/// Event category (`type`).
	pub fn event_type(&self) -> Option<&str> {
		str_field(&self.fields, "type")
	}

	/// Camera that raised the event.
	pub fn camera_id(&self) -> Option<i64> {
		i64_field(&self.fields, "camera_id")
	}

	/// Network the event belongs to.
	pub fn network_id(&self) -> Option<i64> {
		i64_field(&self.fields, "network_id")
	}

	/// Creation timestamp as sent by the server.
	pub fn created_at(&self) -> Option<&str> {
		str_field(&self.fields, "created_at")
	}
}

resource_record!(
	/// Recorded clip.
	Video,
	ResourceKind::Video,
	["video_id", "id"]
);
impl Video {
	/// Name of the recording camera.
	pub fn camera_name(&self) -> Option<&str> {
		str_field(&self.fields, "camera_name")
	}

	/// Clip path relative to the regional base URL.
	pub fn address(&self) -> Option<&str> {
		str_field(&self.fields, "address")
	}

	/// Thumbnail path relative to the regional base URL.
	pub fn thumbnail(&self) -> Option<&str> {
		str_field(&self.fields, "thumbnail")
	}

	/// Whether the clip was viewed.
	pub fn watched(&self) -> Option<bool> {
		bool_field(&self.fields, "watched")
	}

	/// Creation timestamp as sent by the server.
	pub fn created_at(&self) -> Option<&str> {
		str_field(&self.fields, "created_at")
	}
}

resource_record!(
	/// Untyped payload for acknowledgements and configuration blobs.
	GenericData,
	ResourceKind::GenericData,
	["id"]
);

/// Closed set of decoded resource variants.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceRecord {
	/// Account network.
	Network(Network),
	/// Camera device.
	Camera(Camera),
	/// Sync module.
	SyncModule(SyncModule),
	/// Event.
	Event(Event),
	/// Recorded clip.
	Video(Video),
	/// Untyped payload.
	GenericData(GenericData),
}
impl ResourceRecord {
	/// Variant discriminator.
	pub fn kind(&self) -> ResourceKind {
		match self {
			Self::Network(_) => ResourceKind::Network,
			Self::Camera(_) => ResourceKind::Camera,
			Self::SyncModule(_) => ResourceKind::SyncModule,
			Self::Event(_) => ResourceKind::Event,
			Self::Video(_) => ResourceKind::Video,
			Self::GenericData(_) => ResourceKind::GenericData,
		}
	}

	/// Identifier resolved with the variant's key priority.
	pub fn identity(&self) -> Option<ResourceId> {
		match self {
			Self::Network(record) => record.identity(),
			Self::Camera(record) => record.identity(),
			Self::SyncModule(record) => record.identity(),
			Self::Event(record) => record.identity(),
			Self::Video(record) => record.identity(),
			Self::GenericData(record) => record.identity(),
		}
	}

	/// Every field as received.
	pub fn fields(&self) -> &Map<String, Value> {
		match self {
			Self::Network(record) => record.fields(),
			Self::Camera(record) => record.fields(),
			Self::SyncModule(record) => record.fields(),
			Self::Event(record) => record.fields(),
			Self::Video(record) => record.fields(),
			Self::GenericData(record) => record.fields(),
		}
	}

	/// Raw field lookup.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.fields().get(key)
	}

	/// Returns the camera when this record is one.
	pub fn as_camera(&self) -> Option<&Camera> {
		match self {
			Self::Camera(camera) => Some(camera),
			_ => None,
		}
	}

	/// Returns the sync module when this record is one.
	pub fn as_sync_module(&self) -> Option<&SyncModule> {
		match self {
			Self::SyncModule(module) => Some(module),
			_ => None,
		}
	}
}
impl AsResourceId for ResourceRecord {
	fn resource_id(&self) -> Result<ResourceId> {
		require_identity(self.identity(), self.kind())
	}
}
impl From<Network> for ResourceRecord {
	fn from(value: Network) -> Self {
		Self::Network(value)
	}
}
impl From<Camera> for ResourceRecord {
	fn from(value: Camera) -> Self {
		Self::Camera(value)
	}
}
impl From<SyncModule> for ResourceRecord {
	fn from(value: SyncModule) -> Self {
		Self::SyncModule(value)
	}
}
impl From<Event> for ResourceRecord {
	fn from(value: Event) -> Self {
		Self::Event(value)
	}
}
impl From<Video> for ResourceRecord {
	fn from(value: Video) -> Self {
		Self::Video(value)
	}
}
impl From<GenericData> for ResourceRecord {
	fn from(value: GenericData) -> Self {
		Self::GenericData(value)
	}
}

fn identity_of(fields: &Map<String, Value>, keys: &[&str]) -> Option<ResourceId> {
	keys.iter().find_map(|key| fields.get(*key).and_then(ResourceId::from_value))
}

fn require_identity(identity: Option<ResourceId>, kind: ResourceKind) -> Result<ResourceId> {
	identity.ok_or_else(|| Error::InvalidIdentifier {
		reason: format!("{kind} record carries no identifier"),
	})
}

fn str_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
	fields.get(key).and_then(Value::as_str)
}

fn bool_field(fields: &Map<String, Value>, key: &str) -> Option<bool> {
	fields.get(key).and_then(Value::as_bool)
}

fn i64_field(fields: &Map<String, Value>, key: &str) -> Option<i64> {
	fields.get(key).and_then(Value::as_i64)
}
