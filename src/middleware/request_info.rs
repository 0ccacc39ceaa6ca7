use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use futures_util::future::{Ready, ready};

/// Client details recorded alongside team audit entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestInfo {
    pub user_agent: String,
    pub ip_address: String,
}

impl RequestInfo {
    pub fn from_http_request(req: &HttpRequest) -> Self {
        RequestInfo {
            user_agent: req
                .headers()
                .get(header::USER_AGENT)
                .and_then(|h| h.to_str().ok())
                .unwrap_or("unknown")
                .to_string(),
            // Forwarding headers are client-controlled
            ip_address: req
                .peer_addr()
                .map(|addr| addr.ip().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

impl FromRequest for RequestInfo {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // The extensions borrow must end before falling back
        let existing = req.extensions().get::<RequestInfo>().cloned();
        let info = existing.unwrap_or_else(|| RequestInfo::from_http_request(req));

        ready(Ok(info))
    }
}

// Middleware factory
pub struct RequestInfoMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestInfoMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestInfoMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestInfoMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestInfoMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestInfoMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let info = RequestInfo::from_http_request(req.request());
            req.extensions_mut().insert(info);

            service.call(req).await
        })
    }
}
