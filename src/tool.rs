const MOBILE_MARKERS: [&str; 6] = [
    "Android",
    "iPhone",
    "SymbianOS",
    "Windows Phone",
    "iPad",
    "iPod",
];

/// Keyboard play needs a desktop client; mobile and tablet identifiers are refused.
pub fn is_supported_platform(client: &str) -> bool {
    !MOBILE_MARKERS.iter().any(|marker| client.contains(marker))
}
