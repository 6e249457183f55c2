//! Path template rendering (`/network/{network_id}/arm`).

// self
use crate::error::ConfigError;

/// Substitutes `{name}` placeholders and splits the template into raw path segments.
///
/// Values are returned unencoded; [`Endpoints::resolve`](crate::endpoints::Endpoints::resolve)
/// percent-encodes each segment, so a substituted value can never add path segments.
pub fn render_path(template: &str, params: &[(&str, &str)]) -> Result<Vec<String>, ConfigError> {
	template
		.split('/')
		.filter(|segment| !segment.is_empty())
		.map(|segment| render_segment(template, segment, params))
		.collect()
}

fn render_segment(
	template: &str,
	segment: &str,
	params: &[(&str, &str)],
) -> Result<String, ConfigError> {
	let invalid = || ConfigError::InvalidPathTemplate { template: template.to_owned() };
	let mut rendered = String::with_capacity(segment.len());
	let mut rest = segment;

	while let Some(open) = rest.find(['{', '}']) {
		if rest[open..].starts_with('}') {
			return Err(invalid());
		}

		rendered.push_str(&rest[..open]);

		let after = &rest[open + 1..];
		let close = after.find('}').ok_or_else(invalid)?;
		let name = &after[..close];

		if name.is_empty() || name.contains('{') {
			return Err(invalid());
		}

		let value = params
			.iter()
			.find(|(key, _)| *key == name)
			.map(|(_, value)| *value)
			.ok_or_else(|| ConfigError::MissingPathParam {
				template: template.to_owned(),
				name: name.to_owned(),
			})?;

		rendered.push_str(value);
		rest = &after[close + 1..];
	}

	rendered.push_str(rest);

	Ok(rendered)
}
