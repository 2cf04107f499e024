// ABOUTME: Common data models for restaurant domain objects
// ABOUTME: Staff users and roles, reservations, contact messages, menu, orders, time entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Domain models shared by the database layer, routes, and the hub

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Coarse permission tag for staff accounts.
///
/// Admin outranks employee everywhere a role gate applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access: dashboard, staff management, reports, backups
    Admin,
    /// Floor staff: time clock, orders, tables
    Employee,
}

impl Role {
    /// Stable string form, as stored in SQLite and sent on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }

    /// Whether this role satisfies a required role (admin outranks employee)
    #[must_use]
    pub const fn meets(self, required: Self) -> bool {
        match required {
            Self::Admin => matches!(self, Self::Admin),
            Self::Employee => true,
        }
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            other => Err(anyhow::anyhow!("unknown role: {other}")),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staff account (admin or employee)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Stable identity, also the hub registry key
    pub id: Uuid,
    /// Unique login email
    pub email: String,
    /// Optional display name shown in dashboards
    pub display_name: Option<String>,
    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Permission tag
    pub role: Role,
    /// Deactivated accounts cannot log in
    pub is_active: bool,
    /// Account creation time
    pub created_at: DateTime<Utc>,
    /// Last successful login or request
    pub last_active: DateTime<Utc>,
}

impl User {
    /// Create a new active user with a fresh id
    #[must_use]
    pub fn new(
        email: String,
        password_hash: String,
        display_name: Option<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash,
            role,
            is_active: true,
            created_at: now,
            last_active: now,
        }
    }
}

/// Lifecycle of a reservation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Submitted, awaiting a decision
    Pending,
    /// Accepted by an admin
    Confirmed,
    /// Rejected by an admin
    Declined,
    /// Withdrawn by the guest or the house
    Cancelled,
    /// Party has arrived
    Seated,
}

impl ReservationStatus {
    /// Stable string form, as stored in SQLite
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Declined => "declined",
            Self::Cancelled => "cancelled",
            Self::Seated => "seated",
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "declined" => Ok(Self::Declined),
            "cancelled" => Ok(Self::Cancelled),
            "seated" => Ok(Self::Seated),
            other => Err(anyhow::anyhow!("unknown reservation status: {other}")),
        }
    }
}

/// A table reservation submitted from the public site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    /// Row id
    pub id: Uuid,
    /// Guest name
    pub name: String,
    /// Guest email, used for confirmation mail
    pub email: String,
    /// Optional phone number
    pub phone: Option<String>,
    /// Number of guests
    pub party_size: i64,
    /// Requested arrival time
    pub reserved_for: DateTime<Utc>,
    /// Free-form note from the guest
    pub note: Option<String>,
    /// Current lifecycle state
    pub status: ReservationStatus,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

/// A message submitted through the public contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Row id
    pub id: Uuid,
    /// Sender name
    pub name: String,
    /// Sender email
    pub email: String,
    /// Subject line
    pub subject: String,
    /// Message body
    pub body: String,
    /// Whether an admin has read it
    pub is_read: bool,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

/// A dish or drink on the menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    /// Row id
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Optional description for the public menu
    pub description: Option<String>,
    /// Category heading ("starters", "mains", ...)
    pub category: String,
    /// Price in cents to avoid float money
    pub price_cents: i64,
    /// Unavailable items are hidden from the public menu
    pub available: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Taken, not yet sent to the kitchen
    Open,
    /// Kitchen is working on it
    Preparing,
    /// Ready for pickup; triggers the table-ready signal
    Ready,
    /// Delivered to the table
    Served,
    /// Settled; counts toward sales reports
    Paid,
    /// Voided
    Cancelled,
}

impl OrderStatus {
    /// Stable string form, as stored in SQLite
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Served => "served",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "served" => Ok(Self::Served),
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(anyhow::anyhow!("unknown order status: {other}")),
        }
    }
}

/// An order for one table, placed by an employee
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Row id
    pub id: Uuid,
    /// Physical table number
    pub table_number: i64,
    /// Employee who took the order
    pub placed_by: Uuid,
    /// Current lifecycle state
    pub status: OrderStatus,
    /// Free-form kitchen note
    pub note: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last status change
    pub updated_at: DateTime<Utc>,
}

/// One line of an order; price is snapshotted at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Row id
    pub id: Uuid,
    /// Owning order
    pub order_id: Uuid,
    /// Referenced menu item
    pub menu_item_id: Uuid,
    /// Quantity ordered
    pub quantity: i64,
    /// Unit price in cents at order time
    pub price_cents: i64,
}

/// A single shift on the time clock; `clock_out` is open until punch-out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Row id
    pub id: Uuid,
    /// Employee on the clock
    pub employee_id: Uuid,
    /// Punch-in time
    pub clock_in: DateTime<Utc>,
    /// Punch-out time, None while the shift is open
    pub clock_out: Option<DateTime<Utc>>,
}

/// Discriminator for business events pushed to staff clients.
///
/// The string form is the `type` field of the outgoing WebSocket frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new order was placed
    OrderCreated,
    /// An order changed status
    OrderUpdated,
    /// A guest submitted a reservation
    ReservationCreated,
    /// An employee clocked in or out
    EmployeeClock,
    /// A kitchen order is ready for its table
    TableReady,
    /// Server-side error frame
    Error,
}

impl EventKind {
    /// Wire discriminator, exactly as sent in the `type` field
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrderCreated => "order_created",
            Self::OrderUpdated => "order_updated",
            Self::ReservationCreated => "reservation_created",
            Self::EmployeeClock => "employee_clock",
            Self::TableReady => "table_ready",
            Self::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Admin.meets(Role::Admin));
        assert!(Role::Admin.meets(Role::Employee));
        assert!(Role::Employee.meets(Role::Employee));
        assert!(!Role::Employee.meets(Role::Admin));
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Declined,
            ReservationStatus::Cancelled,
            ReservationStatus::Seated,
        ] {
            assert_eq!(status.as_str().parse::<ReservationStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_event_kind_wire_names() {
        assert_eq!(EventKind::OrderCreated.as_str(), "order_created");
        assert_eq!(EventKind::TableReady.as_str(), "table_ready");
        assert_eq!(EventKind::EmployeeClock.as_str(), "employee_clock");
    }
}
