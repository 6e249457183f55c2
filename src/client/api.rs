//! Endpoint helpers on [`RestClient`], each pairing one path template with one decoder.

// self
use crate::{
	_prelude::*,
	client::RestClient,
	http::{HttpMethod, RestHttpClient},
	resource::{self, AsResourceId, Event, GenericData, Network, ResourceRecord, SyncModule, Video},
};

impl<C> RestClient<C>
where
	C: ?Sized + RestHttpClient,
{
	/// Lists the account's networks (`GET /networks`).
	pub async fn networks(&self) -> Result<Vec<Network>> {
		let payload = self.call(HttpMethod::Get, "/networks", &[], None).await?;

		Ok(resource::decode_networks(&payload)?.unwrap_or_default())
	}

	/// Fetches one network (`GET /network/{network_id}`).
	pub async fn network(&self, network: impl AsResourceId) -> Result<Option<Network>> {
		let payload = self.network_call(HttpMethod::Get, "/network/{network_id}", network).await?;

		Ok(resource::decode_networks(&payload)?.and_then(|networks| networks.into_iter().next()))
	}

	/// Lists cameras and sync modules from the home screen (`GET /homescreen`).
	///
	/// Fails on the first unrecognized device; use [`resource::partition_devices`] on the raw
	/// payload from [`RestClient::call`] for a lenient decode.
	pub async fn devices(&self) -> Result<Vec<ResourceRecord>> {
		let payload = self.call(HttpMethod::Get, "/homescreen", &[], None).await?;

		Ok(resource::decode_devices(&payload)?.unwrap_or_default())
	}

	/// Lists a network's sync modules (`GET /network/{network_id}/syncmodules`).
	pub async fn sync_modules(&self, network: impl AsResourceId) -> Result<Vec<SyncModule>> {
		let payload =
			self.network_call(HttpMethod::Get, "/network/{network_id}/syncmodules", network).await?;

		Ok(resource::decode_sync_modules(&payload)?.unwrap_or_default())
	}

	/// Lists a network's events (`GET /events/network/{network_id}`).
	pub async fn events(&self, network: impl AsResourceId) -> Result<Vec<Event>> {
		let payload =
			self.network_call(HttpMethod::Get, "/events/network/{network_id}", network).await?;

		Ok(resource::decode_events(&payload)?.unwrap_or_default())
	}

	/// Lists one page of recorded clips (`GET /api/v2/videos/page/{page}`).
	pub async fn videos(&self, page: u32) -> Result<Vec<Video>> {
		let page = page.to_string();
		let payload = self
			.call(HttpMethod::Get, "/api/v2/videos/page/{page}", &[("page", page.as_str())], None)
			.await?;

		Ok(resource::decode_videos(&payload)?.unwrap_or_default())
	}

	/// Reads a camera's configuration (`GET /network/{network_id}/camera/{camera_id}/config`).
	pub async fn camera_config(
		&self,
		network: impl AsResourceId,
		camera: impl AsResourceId,
	) -> Result<Option<GenericData>> {
		let payload = self
			.camera_call(
				HttpMethod::Get,
				"/network/{network_id}/camera/{camera_id}/config",
				network,
				camera,
			)
			.await?;

		resource::decode_camera_config(&payload)
	}

	/// Arms a network (`POST /network/{network_id}/arm`).
	pub async fn arm_network(&self, network: impl AsResourceId) -> Result<Option<GenericData>> {
		let payload =
			self.network_call(HttpMethod::Post, "/network/{network_id}/arm", network).await?;

		resource::decode_generic(&payload)
	}

	/// Disarms a network (`POST /network/{network_id}/disarm`).
	pub async fn disarm_network(&self, network: impl AsResourceId) -> Result<Option<GenericData>> {
		let payload =
			self.network_call(HttpMethod::Post, "/network/{network_id}/disarm", network).await?;

		resource::decode_generic(&payload)
	}

	/// Enables motion detection on a camera
	/// (`POST /network/{network_id}/camera/{camera_id}/enable`).
	pub async fn enable_camera(
		&self,
		network: impl AsResourceId,
		camera: impl AsResourceId,
	) -> Result<Option<GenericData>> {
		let payload = self
			.camera_call(
				HttpMethod::Post,
				"/network/{network_id}/camera/{camera_id}/enable",
				network,
				camera,
			)
			.await?;

		resource::decode_generic(&payload)
	}

	/// Disables motion detection on a camera
	/// (`POST /network/{network_id}/camera/{camera_id}/disable`).
	pub async fn disable_camera(
		&self,
		network: impl AsResourceId,
		camera: impl AsResourceId,
	) -> Result<Option<GenericData>> {
		let payload = self
			.camera_call(
				HttpMethod::Post,
				"/network/{network_id}/camera/{camera_id}/disable",
				network,
				camera,
			)
			.await?;

		resource::decode_generic(&payload)
	}

	async fn network_call(
		&self,
		method: HttpMethod,
		template: &str,
		network: impl AsResourceId,
	) -> Result<Value> {
		let network_id = network.resource_id()?.to_string();

		self.call(method, template, &[("network_id", network_id.as_str())], None).await
	}

	async fn camera_call(
		&self,
		method: HttpMethod,
		template: &str,
		network: impl AsResourceId,
		camera: impl AsResourceId,
	) -> Result<Value> {
		let network_id = network.resource_id()?.to_string();
		let camera_id = camera.resource_id()?.to_string();
		let params = [("network_id", network_id.as_str()), ("camera_id", camera_id.as_str())];

		self.call(method, template, &params, None).await
	}
}
