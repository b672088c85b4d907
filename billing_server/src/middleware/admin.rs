//! Admin token middleware for the billing server.
//! This middleware can be placed on any route or service, and is used to guard the `/api` scope.
//!
//! It checks the incoming request for an `Authorization: Bearer <token>` header and compares the token against the
//! configured admin token. If they match, the request is allowed to continue. Otherwise, a 401 Unauthorized response is
//! returned.
use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error,
};
use billing_common::Secret;
use futures::{
    future::{ok, Ready},
    Future,
};
use log::*;

use crate::errors::ServerError;

pub struct AdminAuthMiddlewareFactory {
    token: Secret<String>,
}

impl AdminAuthMiddlewareFactory {
    pub fn new(token: Secret<String>) -> Self {
        AdminAuthMiddlewareFactory { token }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AdminAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AdminAuthMiddlewareService { token: Rc::new(self.token.clone()), service: Rc::new(service) })
    }
}

pub struct AdminAuthMiddlewareService<S> {
    token: Rc<Secret<String>>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddlewareService<S>
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
        let token = Rc::clone(&self.token);
        Box::pin(async move {
            match bearer_token(&req) {
                // An empty admin token would match an empty bearer value, so it never grants access.
                Some(candidate) if !token.is_empty() && token.matches(candidate.as_bytes()) => {
                    trace!("🔐️ Admin token accepted for {}", req.path());
                    service.call(req).await
                },
                Some(_) => {
                    warn!("🔐️ Invalid admin token presented for {}", req.path());
                    Err(ServerError::Unauthorized("The admin token is not valid.".into()).into())
                },
                None => {
                    debug!("🔐️ No admin token in request for {}", req.path());
                    Err(ServerError::Unauthorized("An admin bearer token is required.".into()).into())
                },
            }
        })
    }
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ").map(|t| t.trim().to_string())
}
