//! Menu management: admin login, create an item, read it back

use async_trait::async_trait;
use serde_json::Value;

use crate::common::{Error, Result};
use crate::http::session::id_field;
use crate::scenario::context::{Scenario, ScenarioContext, ScenarioInfo};
use crate::scenario::payload::MenuItemRequest;

use super::MENU_PATH;

pub static INFO: ScenarioInfo = ScenarioInfo {
    id: "menu",
    name: "Menu Management Test",
    description: "Log in as the admin account, create a menu item and verify it by ID",
    steps: 3,
};

pub struct MenuScenario;

#[async_trait]
impl Scenario for MenuScenario {
    fn info(&self) -> &ScenarioInfo {
        &INFO
    }

    async fn run(&self, ctx: &mut ScenarioContext<'_>) -> Result<()> {
        let templates = ctx.templates;
        let login = templates.admin.login();
        let item = templates.menu.item(ctx.stamp);

        ctx.begin_step("Logging in as admin");
        super::login(ctx, "Admin login", &login).await?;
        ctx.trace.ok("Admin login successful");

        ctx.begin_step("Creating a new menu item");
        ctx.trace.detail(format!("Item: {} (${})", item.name, item.price));
        let response = ctx
            .session
            .post_json(MENU_PATH, &item)
            .await?
            .expect_status("Menu item creation", 201)?;
        ctx.trace.detail(format!("Response: {}", response.body()));
        let created = response.json()?;
        let id = id_field(&created)
            .ok_or_else(|| Error::IndeterminateIdentifier("menu item".to_string()))?;
        ctx.trace.ok(format!("Menu item created successfully, ID: {}", id));

        ctx.begin_step("Verifying menu item");
        let fetched = ctx
            .session
            .get(&format!("{}/{}", MENU_PATH, id))
            .await?
            .expect_status("Menu item retrieval", 200)?
            .json()?;
        ctx.trace.info(format!(
            "Retrieved item: {}, Price: ${}",
            display_field(&fetched, "name"),
            display_field(&fetched, "price")
        ));
        verify_item(&item, &fetched)?;
        ctx.trace.ok("Menu item data verification successful");

        Ok(())
    }
}

/// Compare the fetched item with what was submitted
///
/// `name` must match exactly and `price` must be numerically equal.
fn verify_item(submitted: &MenuItemRequest, fetched: &Value) -> Result<()> {
    let name_matches = fetched.get("name").and_then(Value::as_str) == Some(submitted.name.as_str());
    let price_matches = fetched.get("price").and_then(Value::as_f64) == Some(submitted.price);

    if name_matches && price_matches {
        Ok(())
    } else {
        Err(Error::TestAssertion(format!(
            "Menu item data does not match expected values: expected name '{}' and price {}, got name {} and price {}",
            submitted.name,
            submitted.price,
            display_field(fetched, "name"),
            display_field(fetched, "price")
        )))
    }
}

fn display_field(body: &Value, key: &str) -> String {
    match body.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "<missing>".to_string(),
    }
}
