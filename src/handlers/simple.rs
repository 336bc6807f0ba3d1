use serde_json::json;

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// `GET /simple`: always `{"name":"teste"}`.
pub fn simple(_req: &HandlerRequest) -> HandlerResponse {
    HandlerResponse::json(200, json!({ "name": "teste" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::ResponseBody;
    use crate::handlers::test_support::request;
    use http::Method;

    #[test]
    fn test_fixed_body_ignores_query() {
        let resp = simple(&request(Method::GET, "/simple", &[], &[("x", "1")]));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, ResponseBody::Json(json!({ "name": "teste" })));
    }
}
