//! Authentication: register, log in, check the session cookie

use async_trait::async_trait;
use tracing::debug;

use crate::common::{Error, Result};
use crate::scenario::context::{Scenario, ScenarioContext, ScenarioInfo};

pub static INFO: ScenarioInfo = ScenarioInfo {
    id: "auth",
    name: "Authentication Test",
    description: "Register a new user, log in with the same credentials and check the session cookie",
    steps: 3,
};

pub struct AuthScenario;

#[async_trait]
impl Scenario for AuthScenario {
    fn info(&self) -> &ScenarioInfo {
        &INFO
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<()> {
        let templates = ctx.templates;
        let user = &templates.auth.user;
        let registration = user.registration(ctx.stamp);
        let login = user.login(ctx.stamp);

        ctx.begin_step("Registering a new user");
        super::register(ctx, &registration).await?;
        ctx.trace.ok("User registration successful");

        ctx.begin_step("Logging in with the new user");
        super::login(ctx, "Login", &login).await?;
        ctx.trace.ok("User login successful");

        ctx.begin_step("Checking the session cookie");
        let prefix = &templates.auth.cookie_prefix;
        if !ctx.session.has_cookie_with_prefix(prefix) {
            let names = ctx.session.cookie_names();
            debug!(?names, "session cookies");
            return Err(Error::TestAssertion(format!(
                "Failed to receive authentication cookie (no cookie named '{}*', got {:?})",
                prefix, names
            )));
        }
        ctx.trace.ok("Authentication cookie received");

        Ok(())
    }
}
