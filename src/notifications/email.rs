// ABOUTME: Templated guest email over an HTTP mail gateway
// ABOUTME: Best-effort reservation mail; disabled entirely when no gateway is configured
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Brasserie Software

//! Guest email service
//!
//! A thin templated wrapper over an HTTP mail gateway. Sending is
//! best-effort: failures are logged by callers and never fail the request
//! that triggered the mail. When no gateway is configured the service
//! logs the would-be mail at debug level and reports success.

use crate::config::environment::EmailConfig;
use crate::models::{Reservation, ReservationStatus};
use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{debug, info};

/// Outgoing message for the gateway API
#[derive(Debug, Serialize)]
struct OutboundMail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Templated guest email sender
#[derive(Clone)]
pub struct EmailService {
    client: reqwest::Client,
    config: EmailConfig,
}

impl EmailService {
    /// Create the service; disabled when the gateway URL is unset
    #[must_use]
    pub fn new(config: EmailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Whether a gateway is configured
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    /// Acknowledge a newly submitted reservation
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the message.
    pub async fn send_reservation_received(&self, reservation: &Reservation) -> Result<()> {
        let subject = "We received your reservation request";
        let body = format!(
            "Hello {},\n\n\
             Thanks for your reservation request for {} guest(s) on {}.\n\
             We will confirm it shortly.\n\n\
             Brasserie",
            reservation.name,
            reservation.party_size,
            reservation.reserved_for.format("%Y-%m-%d %H:%M UTC"),
        );
        self.send(&reservation.email, subject, &body).await
    }

    /// Tell the guest their reservation was confirmed or declined
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the message.
    pub async fn send_reservation_decision(&self, reservation: &Reservation) -> Result<()> {
        let (subject, verdict) = match reservation.status {
            ReservationStatus::Confirmed => ("Your reservation is confirmed", "confirmed"),
            ReservationStatus::Declined => ("About your reservation request", "declined"),
            // Other transitions (seated, cancelled) are internal and send no mail
            _ => return Ok(()),
        };

        let body = format!(
            "Hello {},\n\n\
             Your reservation for {} guest(s) on {} has been {}.\n\n\
             Brasserie",
            reservation.name,
            reservation.party_size,
            reservation.reserved_for.format("%Y-%m-%d %H:%M UTC"),
            verdict,
        );
        self.send(&reservation.email, subject, &body).await
    }

    /// POST one message to the gateway
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<()> {
        let Some(api_url) = &self.config.api_url else {
            debug!(to, subject, "email disabled, skipping send");
            return Ok(());
        };

        let mail = OutboundMail {
            from: &self.config.from_address,
            to,
            subject,
            text,
        };

        let mut request = self.client.post(api_url).json(&mail);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "mail gateway returned {} for message to {to}",
                response.status()
            ));
        }

        info!(to, subject, "guest email sent");
        Ok(())
    }
}
