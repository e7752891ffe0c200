//! Event sink with a fixed message catalog.
//!
//! Delivery is best-effort: a failed write is logged and never fails the
//! mutation that produced it. Callers emit only after their own transaction
//! has committed.

use std::sync::Arc;

use shared::{Clock, NotificationKind};

use crate::domain::repositories::NotificationRepository;

pub struct Notifier {
    notification_repo: Arc<dyn NotificationRepository>,
    clock: Arc<dyn Clock>,
}

impl Notifier {
    pub fn new(notification_repo: Arc<dyn NotificationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            notification_repo,
            clock,
        }
    }

    async fn emit(&self, username: &str, message: String, kind: NotificationKind) {
        let now = self.clock.now();
        if let Err(error) = self
            .notification_repo
            .create(username, &message, kind, now)
            .await
        {
            tracing::warn!(username, ?kind, %error, "Failed to enqueue notification");
        }
    }

    pub async fn clock_in(&self, username: &str, shift_details: &str) {
        let message = format!("You clocked in for your {} shift.", shift_details);
        self.emit(username, message, NotificationKind::ClockIn).await;
    }

    pub async fn clock_out(&self, username: &str, shift_details: &str, auto_completed: bool) {
        let message = if auto_completed {
            format!(
                "Your shift for {} has ended and you've been automatically clocked out.",
                shift_details
            )
        } else {
            format!("You clocked out for your {} shift.", shift_details)
        };
        self.emit(username, message, NotificationKind::ClockOut).await;
    }

    pub async fn missed_shift(&self, username: &str, shift_details: &str) {
        let message = format!("You missed your {} shift.", shift_details);
        self.emit(username, message, NotificationKind::Missed).await;
    }

    pub async fn schedule_published(&self, username: &str, date_range: Option<&str>) {
        let message = match date_range {
            Some(range) => format!(
                "A new schedule for {} has been published. Check out your shifts.",
                range
            ),
            None => "A new schedule has been published. Check out your shifts for the upcoming period."
                .to_string(),
        };
        self.emit(username, message, NotificationKind::Schedule).await;
    }

    pub async fn request_submitted(&self, username: &str, shift_details: &str) {
        let message = format!(
            "Your request for {} was submitted and is pending approval.",
            shift_details
        );
        self.emit(username, message, NotificationKind::Request).await;
    }

    pub async fn request_approved(&self, username: &str, shift_details: &str) {
        let message = format!("Your shift change request for {} was approved.", shift_details);
        self.emit(username, message, NotificationKind::Approval).await;
    }

    pub async fn request_rejected(&self, username: &str, shift_details: &str) {
        let message = format!("Your shift change request for {} was rejected.", shift_details);
        self.emit(username, message, NotificationKind::Rejection).await;
    }

    pub async fn admin_new_request(
        &self,
        admin_username: &str,
        student_name: &str,
        student_id: &str,
        shift_details: &str,
    ) {
        let message = format!(
            "New request from {} ({}) for {}.",
            student_name, student_id, shift_details
        );
        self.emit(admin_username, message, NotificationKind::Request)
            .await;
    }
}
