//! Derivation of concrete HTTP requests from a description.

use super::types::{HttpMethod, RequestDescription};

/// A concrete request against the recommendation service.
///
/// Two descriptions that derive the same request are considered equivalent;
/// the query client only starts a new attempt when this value changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecommendationRequest {
    pub method: HttpMethod,
    /// Path relative to the service base URL, including any query string.
    pub path: String,
    /// JSON body, only present for POST.
    pub body: Option<String>,
}

impl RecommendationRequest {
    /// Derive the request for a description.
    ///
    /// GET encodes the non-null parameters into the query string; POST sends
    /// the whole parameter bag as a JSON body and never appends a query string.
    pub fn from_description(description: &RequestDescription) -> Self {
        let endpoint = format!("/recommend/{}", description.algorithm.path_segment());

        match description.method {
            HttpMethod::Get => {
                let query = description.params.to_query_string();
                let path = if query.is_empty() {
                    endpoint
                } else {
                    format!("{}?{}", endpoint, query)
                };
                Self {
                    method: HttpMethod::Get,
                    path,
                    body: None,
                }
            }
            HttpMethod::Post => Self {
                method: HttpMethod::Post,
                path: endpoint,
                body: Some(description.params.to_json_body()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendations::{Algorithm, RequestDescription};

    #[test]
    fn test_popular_get() {
        let request =
            RecommendationRequest::from_description(&RequestDescription::popular(10));
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/recommend/popular?k=10");
        assert!(request.body.is_none());
    }

    #[test]
    fn test_get_without_params_has_no_question_mark() {
        let description = RequestDescription::new(Algorithm::Popular);
        let request = RecommendationRequest::from_description(&description);
        assert_eq!(request.path, "/recommend/popular");
    }

    #[test]
    fn test_get_only_null_params_has_no_question_mark() {
        let description =
            RequestDescription::new(Algorithm::CollaborativeFilter).with_param("user_id", None::<u32>);
        let request = RecommendationRequest::from_description(&description);
        assert_eq!(request.path, "/recommend/itemcf");
    }

    #[test]
    fn test_item_cf_order_follows_params() {
        let description = RequestDescription::new(Algorithm::CollaborativeFilter)
            .with_param("k", 5)
            .with_param("user_id", 42);
        let request = RecommendationRequest::from_description(&description);
        assert_eq!(request.path, "/recommend/itemcf?k=5&user_id=42");
    }

    #[test]
    fn test_post_body_and_no_query_string() {
        let description = RequestDescription::by_titles(vec![
            "Toy Story".to_string(),
            "Matrix".to_string(),
        ]);
        let request = RecommendationRequest::from_description(&description);
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "/recommend/by-titles");
        assert_eq!(
            request.body.as_deref(),
            Some(r#"{"titles":["Toy Story","Matrix"]}"#)
        );
    }

    #[test]
    fn test_post_ignores_params_in_path() {
        let description = RequestDescription::new(Algorithm::ByTitles)
            .with_method(HttpMethod::Post)
            .with_param("titles", vec!["Heat"])
            .with_param("k", 5);
        let request = RecommendationRequest::from_description(&description);
        assert!(!request.path.contains('?'));
        assert_eq!(request.body.as_deref(), Some(r#"{"titles":["Heat"],"k":5}"#));
    }

    #[test]
    fn test_equal_descriptions_derive_equal_requests() {
        let a = RecommendationRequest::from_description(&RequestDescription::popular(10));
        let b = RecommendationRequest::from_description(
            &RequestDescription::popular(10).with_enabled(false),
        );
        assert_eq!(a, b);

        let c = RecommendationRequest::from_description(&RequestDescription::popular(20));
        assert_ne!(a, c);
    }
}
