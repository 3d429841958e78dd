//! Domain model: entities, status enums, and the pure rules that govern
//! their transitions.
//!
//! Everything here is plain data. Database access lives in [`crate::store`],
//! HTTP concerns in [`crate::api`]. Keeping the transition guards as pure
//! functions makes the workflow rules testable without a database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

// ═══════════════════════════════════════════════════════════════════════
// Status enums
// ═══════════════════════════════════════════════════════════════════════

/// Account role. Admins moderate, organizers own events and exhibitors,
/// customers register and review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular attendee.
    Customer,
    /// Event and exhibitor owner.
    Organizer,
    /// Moderator.
    Admin,
}

impl Role {
    /// Roles that may pass an organizer-or-admin gate.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Organizer | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Customer => "customer",
            Self::Organizer => "organizer",
            Self::Admin => "admin",
        };
        f.write_str(s)
    }
}

/// Moderation status of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Awaiting admin review. Not open for registration.
    Pending,
    /// Visible and open for registration.
    Approved,
    /// Rejected by an admin. Terminal.
    Rejected,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Lifecycle of a registration.
///
/// ```text
/// pending ──> approved ──> attended
///    └──────> denied
/// (cancelled exists in the schema but is never produced by a handler)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "registration_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Submitted, awaiting an admin decision.
    Pending,
    /// Seat granted. The only status that consumes capacity.
    Approved,
    /// Refused by an admin. Terminal.
    Denied,
    /// Checked in at the venue. Terminal.
    Attended,
    /// Withdrawn. Terminal.
    Cancelled,
}

impl RegistrationStatus {
    /// Whether an admin may still decide (approve or deny) this registration.
    #[must_use]
    pub const fn is_decidable(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Terminal states admit no further transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Denied | Self::Attended | Self::Cancelled)
    }

    /// Whether this registration holds a seat against event capacity.
    #[must_use]
    pub const fn consumes_seat(self) -> bool {
        matches!(self, Self::Approved)
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
            Self::Attended => "attended",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Moderation status of an exhibitor profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "exhibitor_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExhibitorStatus {
    /// Awaiting review.
    Pending,
    /// Publicly listed.
    Approved,
    /// Rejected.
    Rejected,
}

/// Severity of an in-app notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// Neutral update.
    Info,
    /// Positive outcome (e.g. approval).
    Success,
    /// Needs attention.
    Warning,
    /// Negative outcome (e.g. denial).
    Error,
}

/// Entity a notification points back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "related_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RelatedKind {
    /// An event.
    Event,
    /// A registration.
    Registration,
    /// A review.
    Review,
}

// ═══════════════════════════════════════════════════════════════════════
// Capacity rule
// ═══════════════════════════════════════════════════════════════════════

/// Whether an event with the given capacity has no seat left.
///
/// Capacity is defined over *approved* registrations only; `0` means
/// unlimited.
#[must_use]
pub const fn capacity_reached(capacity: i32, approved_count: i64) -> bool {
    capacity > 0 && approved_count >= capacity as i64
}

// ═══════════════════════════════════════════════════════════════════════
// Entities
// ═══════════════════════════════════════════════════════════════════════

/// A user account row.
///
/// Never serialized to clients directly; see [`UserPublic`]. The hash and
/// refresh token stay server-side.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Primary key.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique login email.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Account role.
    pub role: Role,
    /// Blocked users cannot log in.
    pub is_blocked: bool,
    /// Gamification points (leaderboard).
    pub points: i32,
    /// Self-declared interest categories.
    pub interests: Vec<String>,
    /// Optional avatar image URL.
    pub avatar_url: Option<String>,
    /// Currently active opaque refresh token, if any. Single session per user.
    pub refresh_token: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Client-facing projection of a [`User`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    /// User id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role.
    pub role: Role,
    /// Points balance.
    pub points: i32,
    /// Interest categories.
    pub interests: Vec<String>,
    /// Avatar URL.
    pub avatar_url: Option<String>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            points: user.points,
            interests: user.interests,
            avatar_url: user.avatar_url,
        }
    }
}

/// An event row.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Primary key.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Long description.
    pub description: String,
    /// Free-form category tag.
    pub category: String,
    /// When the event takes place.
    pub date: DateTime<Utc>,
    /// Venue.
    pub location: String,
    /// Maximum number of approved registrations; `0` = unlimited.
    pub capacity: i32,
    /// Owning organizer.
    pub organizer_id: Uuid,
    /// Moderation status.
    pub status: EventStatus,
    /// Derived mean review rating, one decimal place, `0` when unreviewed.
    pub average_rating: f64,
    /// Optional poster image URL.
    pub poster_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// An [`Event`] joined with its organizer's display name, for listings.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventWithOrganizer {
    /// The event itself.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    /// Organizer display name.
    pub organizer_name: String,
}

/// A registration row: one user's request to attend one event.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Primary key.
    pub id: Uuid,
    /// Registrant.
    pub user_id: Uuid,
    /// Target event.
    pub event_id: Uuid,
    /// Workflow state.
    pub status: RegistrationStatus,
    /// Ticket QR image as a data URL; set only on approval.
    pub qr_code_data_url: Option<String>,
    /// When the participant was checked in.
    pub checked_in_at: Option<DateTime<Utc>>,
    /// Admin who decided the registration.
    pub approved_by: Option<Uuid>,
    /// When the decision (approval or denial) was made.
    pub approved_at: Option<DateTime<Utc>>,
    /// Optional reason recorded on denial.
    pub denial_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A registration joined with summary fields of its event, for "my
/// registrations" listings.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationWithEvent {
    /// The registration itself.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub registration: Registration,
    /// Event title.
    pub event_title: String,
    /// Event date.
    pub event_date: DateTime<Utc>,
    /// Event location.
    pub event_location: String,
    /// Event category.
    pub event_category: String,
}

/// A registration joined with registrant identity, for admin queues and
/// participant lists.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationWithParties {
    /// The registration itself.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub registration: Registration,
    /// Registrant name.
    pub user_name: String,
    /// Registrant email.
    pub user_email: String,
    /// Event title.
    pub event_title: String,
    /// Event date.
    pub event_date: DateTime<Utc>,
    /// Event location.
    pub event_location: String,
}

/// A review row. At most one per (user, event).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Primary key.
    pub id: Uuid,
    /// Author.
    pub user_id: Uuid,
    /// Reviewed event.
    pub event_id: Uuid,
    /// Rating, 1 to 5 inclusive.
    pub rating: i32,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A review joined with its author's display name.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithAuthor {
    /// The review itself.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: Review,
    /// Author display name.
    pub user_name: String,
}

/// A review joined with the title of the event it rates, for "my reviews".
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithEvent {
    /// The review itself.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub review: Review,
    /// Event title.
    pub event_title: String,
}

/// A conference talk (programme session, distinct from an auth session).
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Talk {
    /// Primary key.
    pub id: Uuid,
    /// Title.
    pub title: String,
    /// Abstract.
    pub description: String,
    /// Speaker name.
    pub speaker: String,
    /// Room or stage.
    pub location: String,
    /// Scheduled start.
    pub starts_at: DateTime<Utc>,
    /// Duration in minutes, at least 15.
    pub duration_minutes: i32,
    /// Optional illustration URL.
    pub image_url: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// An exhibitor profile row.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Exhibitor {
    /// Primary key.
    pub id: Uuid,
    /// Company name.
    pub company_name: String,
    /// Company description.
    pub description: String,
    /// What the exhibitor shows.
    pub products: String,
    /// Category tag.
    pub category: String,
    /// Contact email.
    pub contact_email: String,
    /// Contact phone.
    pub contact_phone: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Logo URL.
    pub logo_url: Option<String>,
    /// Booth number.
    pub booth_number: Option<String>,
    /// Booth row.
    pub booth_row: Option<String>,
    /// Booth size class.
    pub booth_size: Option<String>,
    /// Moderation status.
    pub status: ExhibitorStatus,
    /// Owning organizer.
    pub organizer_id: Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// An in-app notification row.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Primary key.
    pub id: Uuid,
    /// Recipient.
    pub user_id: Uuid,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Severity.
    pub kind: NotificationKind,
    /// Whether the recipient has read it.
    pub read: bool,
    /// Optional id of the related entity.
    pub related_id: Option<Uuid>,
    /// Optional type of the related entity.
    pub related_type: Option<RelatedKind>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A feedback submission row.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Primary key.
    pub id: Uuid,
    /// Submitting user.
    pub user_id: Uuid,
    /// Feedback category (bug, suggestion, ...).
    pub kind: String,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub message: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A feedback submission joined with its author, for the admin listing.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackWithUser {
    /// The feedback itself.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub feedback: Feedback,
    /// Author name.
    pub user_name: String,
    /// Author email.
    pub user_email: String,
    /// Author role.
    pub user_role: Role,
}

// ═══════════════════════════════════════════════════════════════════════
// Pagination
// ═══════════════════════════════════════════════════════════════════════

/// Sanitized pagination input: 1-indexed page, bounded page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-indexed page number.
    pub number: i64,
    /// Rows per page.
    pub size: i64,
}

impl Page {
    /// Largest accepted page size.
    pub const MAX_SIZE: i64 = 100;
    /// Page size applied when the client sends none.
    pub const DEFAULT_SIZE: i64 = 10;

    /// Clamp raw query values into a valid page.
    #[must_use]
    pub fn new(number: Option<i64>, size: Option<i64>) -> Self {
        Self {
            number: number.unwrap_or(1).max(1),
            size: size
                .unwrap_or(Self::DEFAULT_SIZE)
                .clamp(1, Self::MAX_SIZE),
        }
    }

    /// Offset of the first row of this page.
    #[must_use]
    pub const fn offset(self) -> i64 {
        (self.number - 1) * self.size
    }
}

/// Pagination metadata returned alongside a listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-indexed current page.
    pub current_page: i64,
    /// Total number of pages (at least 1).
    pub total_pages: i64,
    /// Total matching rows.
    pub total: i64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl Pagination {
    /// Compute metadata for `total` rows viewed through `page`.
    #[must_use]
    pub const fn compute(total: i64, page: Page) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            (total + page.size - 1) / page.size
        };
        Self {
            current_page: page.number,
            total_pages,
            total,
            has_next: page.offset() + page.size < total,
            has_prev: page.number > 1,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn registration_status_guards() {
        assert!(RegistrationStatus::Pending.is_decidable());
        for status in [
            RegistrationStatus::Approved,
            RegistrationStatus::Denied,
            RegistrationStatus::Attended,
            RegistrationStatus::Cancelled,
        ] {
            assert!(!status.is_decidable(), "{status} must not be decidable");
        }
    }

    #[test]
    fn terminal_states() {
        assert!(RegistrationStatus::Denied.is_terminal());
        assert!(RegistrationStatus::Attended.is_terminal());
        assert!(RegistrationStatus::Cancelled.is_terminal());
        assert!(!RegistrationStatus::Pending.is_terminal());
        // Approved can still move to attended.
        assert!(!RegistrationStatus::Approved.is_terminal());
    }

    #[test]
    fn only_approved_consumes_capacity() {
        assert!(RegistrationStatus::Approved.consumes_seat());
        assert!(!RegistrationStatus::Pending.consumes_seat());
        assert!(!RegistrationStatus::Attended.consumes_seat());
    }

    #[test]
    fn capacity_zero_is_unlimited() {
        assert!(!capacity_reached(0, 0));
        assert!(!capacity_reached(0, 10_000));
    }

    #[test]
    fn capacity_boundary() {
        assert!(!capacity_reached(3, 2));
        assert!(capacity_reached(3, 3));
        assert!(capacity_reached(3, 4));
        assert!(capacity_reached(1, 1));
        assert!(!capacity_reached(1, 0));
    }

    #[test]
    fn page_sanitizes_input() {
        let page = Page::new(None, None);
        assert_eq!(page.number, 1);
        assert_eq!(page.size, Page::DEFAULT_SIZE);

        let page = Page::new(Some(0), Some(0));
        assert_eq!(page.number, 1);
        assert_eq!(page.size, 1);

        let page = Page::new(Some(-5), Some(1_000));
        assert_eq!(page.number, 1);
        assert_eq!(page.size, Page::MAX_SIZE);
    }

    #[test]
    fn page_offset_is_one_indexed() {
        assert_eq!(Page::new(Some(1), Some(10)).offset(), 0);
        assert_eq!(Page::new(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn pagination_math() {
        let meta = Pagination::compute(25, Page::new(Some(2), Some(10)));
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total, 25);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let last = Pagination::compute(25, Page::new(Some(3), Some(10)));
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn pagination_empty_result() {
        let meta = Pagination::compute(0, Page::new(Some(1), Some(10)));
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Organizer).unwrap(), "\"organizer\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn status_display_matches_wire_form() {
        assert_eq!(RegistrationStatus::Approved.to_string(), "approved");
        assert_eq!(EventStatus::Pending.to_string(), "pending");
        assert_eq!(Role::Customer.to_string(), "customer");
    }
}
