//! Request bodies sent to the server
//!
//! Field names follow the server's camelCase JSON contract.

use serde::Serialize;
use serde_json::Value;

/// `POST /api/Auth/register`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: String,
}

/// `POST /api/Auth/login`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

/// `POST /api/Menu`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub image_url: String,
    pub is_available: bool,
}

/// `POST /api/Orders`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Always serialized, `null` for walk-in orders
    pub reservation_id: Option<i64>,
    pub items: Vec<OrderLine>,
}

/// One line item of an order
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Identifier exactly as the menu listing returned it
    pub menu_item_id: Value,
    pub quantity: u32,
}
