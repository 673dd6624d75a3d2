//! Scenario implementations
//!
//! One module per user journey, plus the calls they share.

pub mod auth;
pub mod menu;
pub mod order;

use crate::common::Result;
use crate::scenario::payload::{LoginRequest, RegisterRequest};

use super::context::ScenarioContext;

pub const REGISTER_PATH: &str = "/api/Auth/register";
pub const LOGIN_PATH: &str = "/api/Auth/login";
pub const MENU_PATH: &str = "/api/Menu";
pub const ORDERS_PATH: &str = "/api/Orders";

/// Register a user; the server answers 200
pub(crate) async fn register(ctx: &mut ScenarioContext<'_>, request: &RegisterRequest) -> Result<()> {
    ctx.trace.detail(format!("Email: {}", request.email));
    let response = ctx
        .session
        .post_json(REGISTER_PATH, request)
        .await?
        .expect_status("Registration", 200)?;
    ctx.trace.detail(format!("Response: {}", response.body()));
    Ok(())
}

/// Log in; the server answers 200 and issues the session cookie
pub(crate) async fn login(ctx: &mut ScenarioContext<'_>, step: &str, request: &LoginRequest) -> Result<()> {
    ctx.trace.detail(format!("Email: {}", request.email));
    let response = ctx
        .session
        .post_json(LOGIN_PATH, request)
        .await?
        .expect_status(step, 200)?;
    ctx.trace.detail(format!("Response: {}", response.body()));
    Ok(())
}
