use url::Url;

/// Whether a browser-declared `Origin` may submit feedback for a form
/// registered at `registered_url`.
///
/// Both sides are reduced to their (scheme, host, port) origin, so
/// `https://example.com` matches a registered `https://Example.com:443/app/`.
/// Anything that does not parse to a tuple origin (`null`, bare hosts,
/// `data:` URLs, empty strings) is rejected.
pub fn is_allowed(declared_origin: &str, registered_url: &str) -> bool {
    let Some(declared) = tuple_origin(declared_origin) else {
        return false;
    };
    let Some(registered) = tuple_origin(registered_url) else {
        return false;
    };
    declared == registered
}

fn tuple_origin(raw: &str) -> Option<url::Origin> {
    let parsed = Url::parse(raw.trim()).ok()?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return None;
    }
    Some(origin)
}
