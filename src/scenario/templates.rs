//! Payload templates
//!
//! Templates hold the field values each scenario submits. Fields that must be
//! unique on the server (emails, menu item names) contain a `{ts}`
//! placeholder that is replaced by the run stamp, so reruns never collide
//! with records left by earlier runs.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::common::{Error, Result};

use super::payload::{LoginRequest, MenuItemRequest, OrderLine, OrderRequest, RegisterRequest};

/// Most menu items a single order references
pub const MAX_ORDER_LINES: usize = 2;

/// Placeholder replaced by the run stamp
pub const STAMP_PLACEHOLDER: &str = "{ts}";

/// Substitute the run stamp into a template string
pub fn apply_stamp(pattern: &str, stamp: u64) -> String {
    pattern.replace(STAMP_PLACEHOLDER, &stamp.to_string())
}

/// All scenario templates
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Templates {
    #[serde(default)]
    pub auth: AuthTemplate,

    #[serde(default)]
    pub admin: Credentials,

    #[serde(default)]
    pub menu: MenuTemplate,

    #[serde(default)]
    pub order: OrderTemplate,
}

impl Templates {
    /// Reject templates no scenario could run with
    pub fn validate(&self) -> Result<()> {
        if self.order.quantities.is_empty() {
            return Err(Error::Config(
                "order.quantities must list at least one quantity".to_string(),
            ));
        }
        if self.order.quantities.len() > MAX_ORDER_LINES {
            return Err(Error::Config(format!(
                "order.quantities lists {} quantities, at most {} items are ordered",
                self.order.quantities.len(),
                MAX_ORDER_LINES
            )));
        }
        if self.order.quantities.contains(&0) {
            return Err(Error::Config(
                "order.quantities must all be greater than zero".to_string(),
            ));
        }
        if !self.menu.price.is_finite() || self.menu.price < 0.0 {
            return Err(Error::Config(format!(
                "menu.price must be a non-negative number, got {}",
                self.menu.price
            )));
        }
        Ok(())
    }
}

/// A user account created by a scenario
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct UserTemplate {
    pub first_name: String,
    pub last_name: String,
    /// Email pattern, usually containing `{ts}`
    pub email: String,
    pub password: String,
    pub phone_number: String,
}

impl UserTemplate {
    fn new(first_name: &str, last_name: &str, email: &str, phone_number: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password: "Test123!".to_string(),
            phone_number: phone_number.to_string(),
        }
    }

    /// Email address for this run
    pub fn email_for(&self, stamp: u64) -> String {
        apply_stamp(&self.email, stamp)
    }

    /// Registration body for this run
    pub fn registration(&self, stamp: u64) -> RegisterRequest {
        RegisterRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email_for(stamp),
            password: self.password.clone(),
            confirm_password: self.password.clone(),
            phone_number: self.phone_number.clone(),
        }
    }

    /// Login body for the account registered in this run
    pub fn login(&self, stamp: u64) -> LoginRequest {
        LoginRequest {
            email: self.email_for(stamp),
            password: self.password.clone(),
            remember_me: false,
        }
    }
}

/// User fields as written in a config or suite file
///
/// Missing fields keep the value of the section's default user.
#[derive(Deserialize)]
struct UserFields {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    phone_number: Option<String>,
}

impl UserFields {
    fn over(self, base: UserTemplate) -> UserTemplate {
        UserTemplate {
            first_name: self.first_name.unwrap_or(base.first_name),
            last_name: self.last_name.unwrap_or(base.last_name),
            email: self.email.unwrap_or(base.email),
            password: self.password.unwrap_or(base.password),
            phone_number: self.phone_number.unwrap_or(base.phone_number),
        }
    }
}

fn auth_user<'de, D>(deserializer: D) -> std::result::Result<UserTemplate, D::Error>
where
    D: Deserializer<'de>,
{
    UserFields::deserialize(deserializer).map(|fields| fields.over(default_auth_user()))
}

fn order_customer<'de, D>(deserializer: D) -> std::result::Result<UserTemplate, D::Error>
where
    D: Deserializer<'de>,
{
    UserFields::deserialize(deserializer).map(|fields| fields.over(default_order_customer()))
}

/// Authentication scenario settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AuthTemplate {
    /// Name prefix of the session cookie issued on login
    #[serde(default = "default_cookie_prefix")]
    pub cookie_prefix: String,

    #[serde(default = "default_auth_user", deserialize_with = "auth_user")]
    pub user: UserTemplate,
}

impl Default for AuthTemplate {
    fn default() -> Self {
        Self {
            cookie_prefix: default_cookie_prefix(),
            user: default_auth_user(),
        }
    }
}

fn default_cookie_prefix() -> String {
    ".AspNetCore".to_string()
}

fn default_auth_user() -> UserTemplate {
    UserTemplate::new("Test", "User", "test_user_{ts}@example.com", "1234567890")
}

/// Credentials of a pre-provisioned account
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: "admin@restaurant.com".to_string(),
            password: "Admin123!".to_string(),
        }
    }
}

impl Credentials {
    pub fn login(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            remember_me: false,
        }
    }
}

/// Menu item created by the menu scenario
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MenuTemplate {
    /// Name pattern, usually containing `{ts}`
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image_url: String,
    pub is_available: bool,
}

impl Default for MenuTemplate {
    fn default() -> Self {
        Self {
            name: "Test Item {ts}".to_string(),
            description: "Created by API test".to_string(),
            price: 12.99,
            category: "Test".to_string(),
            image_url: "/images/menu/default.jpg".to_string(),
            is_available: true,
        }
    }
}

impl MenuTemplate {
    pub fn item(&self, stamp: u64) -> MenuItemRequest {
        MenuItemRequest {
            name: apply_stamp(&self.name, stamp),
            description: self.description.clone(),
            price: self.price,
            category: self.category.clone(),
            image_url: self.image_url.clone(),
            is_available: self.is_available,
        }
    }
}

/// Order placed by the order scenario
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OrderTemplate {
    #[serde(default = "default_order_customer", deserialize_with = "order_customer")]
    pub customer: UserTemplate,

    /// Quantity per ordered item; also sets how many menu items are ordered
    #[serde(default = "default_quantities")]
    pub quantities: Vec<u32>,
}

impl Default for OrderTemplate {
    fn default() -> Self {
        Self {
            customer: default_order_customer(),
            quantities: default_quantities(),
        }
    }
}

fn default_order_customer() -> UserTemplate {
    UserTemplate::new("Order", "Tester", "order_test_{ts}@example.com", "5556667777")
}

fn default_quantities() -> Vec<u32> {
    vec![2, 1]
}

impl OrderTemplate {
    /// Build the order body from the leading menu items
    ///
    /// Takes one item per configured quantity, or fewer when the menu is
    /// shorter, and never more than [`MAX_ORDER_LINES`]. Every selected item must carry an `id`.
    pub fn order_for(&self, menu_items: &[Value]) -> Result<OrderRequest> {
        let items = menu_items
            .iter()
            .zip(&self.quantities)
            .take(MAX_ORDER_LINES)
            .map(|(item, &quantity)| {
                let id = item.get("id").filter(|id| !id.is_null()).ok_or_else(|| {
                    Error::TestAssertion(format!("Menu item has no 'id' field: {}", item))
                })?;
                Ok(OrderLine {
                    menu_item_id: id.clone(),
                    quantity,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if items.is_empty() {
            return Err(Error::TestAssertion("No menu items available".to_string()));
        }

        Ok(OrderRequest {
            reservation_id: None,
            items,
        })
    }
}
