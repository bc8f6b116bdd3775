use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{
    header::{self, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN},
    http::HeaderValue,
    Method, Request, Response, StatusCode,
};
use log::debug;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use super::ServerContext;
use crate::models::token::TokenFilter;

mod blackpaper;
mod dashboard;
mod streams;
mod wallet;

pub type HttpResponse = Response<Full<Bytes>>;

pub async fn route(
    req: Request<hyper::body::Incoming>,
    ctx: Arc<ServerContext>,
) -> Result<HttpResponse, hyper::Error> {
    debug!("{} {}", req.method(), req.uri());

    let query = req.uri().query().map(String::from);
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/api/v1/dashboard") => match filter_param(query.as_deref()) {
            Ok(filter) => dashboard::handle_get_dashboard(&ctx.state, filter).await,
            Err(response) => response,
        },
        (&Method::GET, "/api/v1/tokens") => match filter_param(query.as_deref()) {
            Ok(filter) => dashboard::handle_get_tokens(&ctx.state, filter).await,
            Err(response) => response,
        },
        (&Method::GET, "/api/v1/price") => streams::handle_get_price(&ctx.state).await,
        (&Method::GET, "/api/v1/network") => streams::handle_get_network(&ctx.state).await,
        (&Method::GET, "/api/v1/status") => streams::handle_get_status(&ctx.state).await,
        (&Method::GET, "/api/v1/wallet") => wallet::handle_get_wallet(&ctx.state).await,
        (&Method::POST, "/api/v1/wallet/connect") => {
            let body = req.into_body().collect().await?.to_bytes();
            wallet::handle_connect(&ctx.state, &body).await
        }
        (&Method::POST, "/api/v1/wallet/disconnect") => {
            wallet::handle_disconnect(&ctx.state).await
        }
        (&Method::GET, "/api/v1/blackpaper") => {
            blackpaper::handle_get_blackpaper(&ctx.asset_root).await
        }
        _ => error_response(StatusCode::NOT_FOUND, "Not Found"),
    };

    Ok(response)
}

/// `?filter=` value; absent means all tokens.
fn filter_param(query: Option<&str>) -> Result<TokenFilter, HttpResponse> {
    let value = query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "filter")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default();

    value
        .parse::<TokenFilter>()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, &e.to_string()))
}

fn with_cors(mut response: HttpResponse) -> HttpResponse {
    let headers = response.headers_mut();

    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST"),
    );

    response
}

pub(crate) fn json_response<T: Serialize>(status: StatusCode, value: &T) -> HttpResponse {
    let body = match serde_json::to_vec(value) {
        Ok(body) => body,
        Err(e) => return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    };
    let mut response = Response::new(Full::new(Bytes::from(body)));

    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    with_cors(response)
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    let body = json!({
        "code": -1,
        "message": message
    });
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));

    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    with_cors(response)
}


#[cfg(test)]
mod tests {
    use super::test_support::body_json;
    use super::*;
    use crate::models::token::SourceTag;

    #[test]
    fn test_filter_param() {
        assert_eq!(filter_param(None).unwrap(), TokenFilter::All);
        assert_eq!(filter_param(Some("filter=all")).unwrap(), TokenFilter::All);
        assert_eq!(
            filter_param(Some("foo=1&filter=raydium")).unwrap(),
            TokenFilter::Source(SourceTag::DexListing)
        );
        assert_eq!(
            filter_param(Some("filter=newLaunch")).unwrap(),
            TokenFilter::Source(SourceTag::NewLaunch)
        );
    }

    #[tokio::test]
    async fn test_unknown_filter_is_bad_request() {
        let response = filter_param(Some("filter=nft")).unwrap_err();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        let body = body_json(response).await;
        assert_eq!(body["code"], -1);
        assert_eq!(body["message"], "unknown token filter: nft");
    }
}
