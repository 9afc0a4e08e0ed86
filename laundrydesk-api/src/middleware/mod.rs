/// Response-shaping middleware
///
/// - `cache`: no-store headers for identity-bearing responses

pub mod cache;
