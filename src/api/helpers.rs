use std::net::IpAddr;

use poem::Request;

use crate::coordinators::LoginCoordinator;
use crate::errors::InternalError;
use crate::errors::internal::AccessError;
use crate::types::internal::context::RequestContext;

/// Extract the client IP address from the request
///
/// Prefers `X-Forwarded-For` (first hop), then `X-Real-IP`, then the socket
/// peer address.
pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
    // Check X-Forwarded-For header (proxy/load balancer)
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().parse().ok();
        }
    }

    // Check X-Real-IP header (nginx)
    if let Some(real_ip) = req.header("X-Real-IP") {
        return real_ip.trim().parse().ok();
    }

    req.remote_addr().as_socket_addr().map(|addr| addr.ip())
}

/// Token from an `Authorization: Bearer <token>` (or `Token <token>`) header
///
/// Header extraction is done by hand so a missing token maps to our own
/// `not_authenticated` body instead of the framework's bare 401.
pub fn bearer_token(req: &Request) -> Option<String> {
    let header = req.header("Authorization")?;
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") && !scheme.eq_ignore_ascii_case("token") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Build an anonymous request context from the request metadata
pub fn request_context(req: &Request) -> RequestContext {
    RequestContext::for_api(extract_ip_address(req))
}

/// Build a request context for an authenticated endpoint
///
/// # Returns
/// * `Ok(RequestContext)` - Context carrying the caller's projection
/// * `Err(InternalError)` - NotAuthenticated when the header is missing;
///   InvalidToken, AccountDisabled or PendingApproval from token resolution
pub async fn authenticated_context(req: &Request, login_coordinator: &LoginCoordinator) -> Result<RequestContext, InternalError> {
    let ctx = request_context(req);
    let Some(token) = bearer_token(req) else {
        tracing::debug!(request_id = %ctx.request_id, "Request without bearer token");
        return Err(AccessError::NotAuthenticated.into());
    };

    login_coordinator.authenticate(ctx, &token).await
}
