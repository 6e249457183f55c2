//! Logs in with `BLINK_EMAIL` / `BLINK_PASSWORD` and prints every network and device.
//!
//! ```sh
//! BLINK_EMAIL=owner@example.com BLINK_PASSWORD=... cargo run --example list_devices
//! ```

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::WrapErr};
// self
use blink_rest::{ClientConfig, Credentials, RestClient, resource::ResourceRecord};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let email = env::var("BLINK_EMAIL").wrap_err("BLINK_EMAIL must be set")?;
	let password = env::var("BLINK_PASSWORD").wrap_err("BLINK_PASSWORD must be set")?;
	let client = RestClient::new(Credentials::new(email, password), ClientConfig::default())?;

	println!("Region base URL: {}", client.base_url().await?);

	for network in client.networks().await? {
		println!(
			"network {} {:?} armed={:?}",
			network.identity().map(|id| id.to_string()).unwrap_or_default(),
			network.name().unwrap_or("<unnamed>"),
			network.armed(),
		);
	}

	for device in client.devices().await? {
		match &device {
			ResourceRecord::Camera(camera) => println!(
				"camera {:?} model={} battery={:?}",
				camera.name().unwrap_or("<unnamed>"),
				camera.model().as_str(),
				camera.battery_state(),
			),
			other => println!(
				"{} {}",
				other.kind(),
				other.identity().map(|id| id.to_string()).unwrap_or_default()
			),
		}
	}

	let logins = client.token_manager().metrics().snapshot();

	println!("logins: {} attempted, {} succeeded", logins.attempts, logins.successes);

	Ok(())
}
