/// Success response envelope
///
/// Every successful endpoint returns `{success: true, data}`, list endpoints
/// additionally carry `count`. One convention across the whole API; the
/// error side of the envelope lives in [`crate::error`].

use serde::Serialize;

/// Standard success envelope
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Always true on the success path
    pub success: bool,

    /// Payload
    pub data: T,

    /// Element count, present on list endpoints only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> Envelope<T> {
    /// Wraps a single payload
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            count: None,
        }
    }
}

impl<T> Envelope<Vec<T>> {
    /// Wraps a list payload, recording its length
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            success: true,
            data,
            count: Some(count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_envelope() {
        let json = serde_json::to_value(Envelope::new("hello")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "hello");
        assert!(json.get("count").is_none());
    }

    #[test]
    fn test_list_envelope() {
        let json = serde_json::to_value(Envelope::list(vec![1, 2, 3])).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 3);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }
}
